//! # セキュアキーストア抽象化
//!
//! ハードウェア保護されたキーストアの鍵生成・署名を抽象化するトレイト。
//! 秘密鍵はキーストア外に出ず、呼び出し側が扱うのはタグと公開鍵のみ。
//!
//! 現在のキーストア実装:
//! - `software` — 開発・テスト用（プロセス内のP-256鍵、任意でディレクトリ永続化）
//! - `callback` — 完了コールバック型のプラットフォームAPIを非同期呼び出しに変換するアダプタ
//!
//! ユーザー存在確認（生体認証）は [`crate::presence::UserPresence`] が担い、
//! [`crate::EnclaveService`] が各操作の前に実行する。

pub mod callback;
pub mod software;

pub use callback::{CallbackKeystore, Completion, PlatformKeystore};
pub use software::SoftwareKeystore;

use async_trait::async_trait;
use biowallet_crypto::Digest32;

use crate::EnclaveError;

/// セキュアキーストアのトレイト。
#[async_trait]
pub trait SecureKeystore: Send + Sync {
    /// キーストア種別（ログ出力用）。
    fn backend(&self) -> &str;

    /// `tag` に永続的に紐づく書き出し不可のP-256鍵ペアを生成する。
    ///
    /// 戻り値は公開鍵の外部表現 `0x04 ‖ X ‖ Y`（65バイト）。
    async fn generate(&self, tag: &str) -> Result<Vec<u8>, EnclaveError>;

    /// `tag` の秘密鍵で、ハッシュ済みの `digest` にECDSA署名する。
    ///
    /// 戻り値はDERエンコードされた署名。
    async fn sign_raw(&self, tag: &str, digest: &Digest32) -> Result<Vec<u8>, EnclaveError>;
}
