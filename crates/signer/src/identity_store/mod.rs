//! # Identity Store
//!
//! ユーザー名 → `{tag, publicKey}` の永続化を抽象化するトレイト。
//! サインイン時に読み出し、アイデンティティ作成時に一度だけ書き込む。
//!
//! 現在の実装:
//! - `memory` — プロセス内のマップ（テスト用）
//! - `file` — JSONファイル（`{username: {tag, publicKey}}`）

pub mod file;
pub mod memory;

pub use file::JsonFileIdentityStore;
pub use memory::MemoryIdentityStore;

use biowallet_types::StoredIdentity;

use crate::error::SignerError;

/// Identity Storeの抽象インターフェース。
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// `username` に紐づくアイデンティティを取得する。未登録なら `None`。
    async fn get(&self, username: &str) -> Result<Option<StoredIdentity>, SignerError>;

    /// `username` にアイデンティティを保存する。既存のレコードは上書きされる。
    async fn put(&self, username: &str, identity: StoredIdentity) -> Result<(), SignerError>;
}
