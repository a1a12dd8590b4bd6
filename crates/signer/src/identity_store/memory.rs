//! # メモリ Identity Store

use tokio::sync::RwLock;

use biowallet_types::{IdentityMap, StoredIdentity};

use super::IdentityStore;
use crate::error::SignerError;

/// プロセス内マップによるIdentity Store。
#[derive(Default)]
pub struct MemoryIdentityStore {
    entries: RwLock<IdentityMap>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get(&self, username: &str) -> Result<Option<StoredIdentity>, SignerError> {
        Ok(self.entries.read().await.get(username).cloned())
    }

    async fn put(&self, username: &str, identity: StoredIdentity) -> Result<(), SignerError> {
        self.entries
            .write()
            .await
            .insert(username.to_string(), identity);
        Ok(())
    }
}
