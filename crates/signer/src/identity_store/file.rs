//! # JSONファイル Identity Store
//!
//! ```json
//! { "alice": { "tag": "…", "publicKey": "<base64>" } }
//! ```
//!
//! 書き込みは一時ファイルへの書き出し → rename で行い、
//! 途中で中断しても既存のファイルは壊れない。

use std::path::PathBuf;

use tokio::sync::Mutex;

use biowallet_types::{IdentityMap, StoredIdentity};

use super::IdentityStore;
use crate::error::SignerError;

/// JSONファイルによるIdentity Store。
pub struct JsonFileIdentityStore {
    path: PathBuf,
    /// 読み込み→更新→書き込みを直列化する
    lock: Mutex<()>,
}

impl JsonFileIdentityStore {
    /// `path` のファイルを使用する。ファイルは最初の書き込みで作成される。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<IdentityMap, SignerError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SignerError::Store(format!("JSONのパースに失敗 ({}): {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IdentityMap::new()),
            Err(e) => Err(SignerError::Store(format!(
                "ファイルの読み込みに失敗 ({}): {e}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, map: &IdentityMap) -> Result<(), SignerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SignerError::Store(format!("ディレクトリの作成に失敗 ({}): {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_vec_pretty(map)
            .map_err(|e| SignerError::Store(format!("JSONのシリアライズに失敗: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            SignerError::Store(format!("一時ファイルの書き込みに失敗 ({}): {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            SignerError::Store(format!("ファイルの置き換えに失敗 ({}): {e}", self.path.display()))
        })
    }
}

#[async_trait::async_trait]
impl IdentityStore for JsonFileIdentityStore {
    async fn get(&self, username: &str) -> Result<Option<StoredIdentity>, SignerError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(username))
    }

    async fn put(&self, username: &str, identity: StoredIdentity) -> Result<(), SignerError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        map.insert(username.to_string(), identity);
        self.save(&map).await?;
        tracing::debug!(path = %self.path.display(), username, "Identity Storeに保存しました");
        Ok(())
    }
}
