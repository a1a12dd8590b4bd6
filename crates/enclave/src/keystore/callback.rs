//! # 完了コールバック → 非同期呼び出し変換
//!
//! OSのキーストアAPIは結果を完了コールバックで返す。
//! [`Completion`] は値で消費されるため、同じ完了を二度呼ぶコードはコンパイルできない。
//! 完了が呼ばれないまま破棄された場合は `KeystoreError` として待機側に届く。

use async_trait::async_trait;
use tokio::sync::oneshot;

use biowallet_crypto::Digest32;

use super::SecureKeystore;
use crate::EnclaveError;

/// 一度だけ呼べる完了ハンドル。
pub struct Completion<T> {
    tx: oneshot::Sender<Result<T, EnclaveError>>,
}

impl<T> Completion<T> {
    /// 結果を待機側へ渡す。待機側が既に破棄されていれば結果は捨てられる。
    pub fn complete(self, result: Result<T, EnclaveError>) {
        if self.tx.send(result).is_err() {
            tracing::debug!("完了の受信側が既に破棄されています");
        }
    }
}

/// コールバック型の呼び出しを開始し、完了まで待機する。
///
/// `start` は同期的に呼ばれ、受け取った [`Completion`] を任意のスレッドから完了させてよい。
pub async fn suspend<T, F>(start: F) -> Result<T, EnclaveError>
where
    F: FnOnce(Completion<T>),
{
    let (tx, rx) = oneshot::channel();
    start(Completion { tx });
    rx.await.map_err(|_| {
        EnclaveError::KeystoreError("完了コールバックが呼ばれないまま破棄されました".to_string())
    })?
}

/// 完了コールバックで結果を返すプラットフォームキーストアAPI。
pub trait PlatformKeystore: Send + Sync {
    /// プラットフォーム名（ログ出力用）。
    fn name(&self) -> &str;

    /// 鍵ペアを生成し、公開鍵の外部表現（`0x04 ‖ X ‖ Y`）で完了させる。
    fn generate_key_pair(&self, tag: &str, done: Completion<Vec<u8>>);

    /// ハッシュ済みダイジェストに署名し、DER署名で完了させる。
    fn create_signature(&self, tag: &str, digest: Digest32, done: Completion<Vec<u8>>);
}

/// [`PlatformKeystore`] を [`SecureKeystore`] として使うアダプタ。
pub struct CallbackKeystore<P> {
    platform: P,
}

impl<P> CallbackKeystore<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl<P: PlatformKeystore> SecureKeystore for CallbackKeystore<P> {
    fn backend(&self) -> &str {
        self.platform.name()
    }

    async fn generate(&self, tag: &str) -> Result<Vec<u8>, EnclaveError> {
        suspend(|done| self.platform.generate_key_pair(tag, done)).await
    }

    async fn sign_raw(&self, tag: &str, digest: &Digest32) -> Result<Vec<u8>, EnclaveError> {
        let digest = *digest;
        suspend(|done| self.platform.create_signature(tag, digest, done)).await
    }
}
