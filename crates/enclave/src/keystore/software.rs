//! # ソフトウェアキーストア
//!
//! ハードウェアキーストアが利用できない開発環境・テストで使用する実装。
//! P-256秘密鍵をプロセス内に保持し、署名はprehash ECDSAでDERを返す。
//!
//! ディレクトリを指定した場合は `{dir}/{tag}.key` に秘密スカラーを
//! hexで保存し、次回起動時に読み込む。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use tokio::sync::RwLock;

use biowallet_crypto::Digest32;

use super::SecureKeystore;
use crate::EnclaveError;

const KEY_FILE_EXTENSION: &str = "key";

/// ソフトウェアキーストア。開発・テスト用。
pub struct SoftwareKeystore {
    /// タグ → 秘密鍵
    keys: RwLock<HashMap<String, SigningKey>>,
    /// 永続化ディレクトリ（Noneならメモリのみ）
    dir: Option<PathBuf>,
}

impl SoftwareKeystore {
    /// メモリのみのキーストアを作成する。
    pub fn in_memory() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            dir: None,
        }
    }

    /// ディレクトリに永続化するキーストアを開く。既存の鍵ファイルを読み込む。
    pub fn persistent(dir: impl Into<PathBuf>) -> Result<Self, EnclaveError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            EnclaveError::KeystoreError(format!(
                "キーストアディレクトリの作成に失敗 ({}): {e}",
                dir.display()
            ))
        })?;

        let keys = load_keys(&dir)?;
        tracing::debug!(dir = %dir.display(), count = keys.len(), "ソフトウェアキーストアを読み込みました");
        Ok(Self {
            keys: RwLock::new(keys),
            dir: Some(dir),
        })
    }

    /// 保持している鍵の数。
    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SecureKeystore for SoftwareKeystore {
    fn backend(&self) -> &str {
        "software"
    }

    async fn generate(&self, tag: &str) -> Result<Vec<u8>, EnclaveError> {
        validate_tag(tag)?;

        let mut keys = self.keys.write().await;
        if keys.contains_key(tag) {
            return Err(EnclaveError::KeystoreError(format!(
                "タグは既に使用されています: {tag}"
            )));
        }

        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        if let Some(dir) = &self.dir {
            let path = key_path(dir, tag);
            tokio::fs::write(&path, hex::encode(signing_key.to_bytes()))
                .await
                .map_err(|e| {
                    EnclaveError::KeystoreError(format!(
                        "鍵ファイルの書き込みに失敗 ({}): {e}",
                        path.display()
                    ))
                })?;
        }

        let external = VerifyingKey::from(&signing_key)
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        keys.insert(tag.to_string(), signing_key);
        Ok(external)
    }

    async fn sign_raw(&self, tag: &str, digest: &Digest32) -> Result<Vec<u8>, EnclaveError> {
        let keys = self.keys.read().await;
        let signing_key = keys
            .get(tag)
            .ok_or_else(|| EnclaveError::KeyNotFound(tag.to_string()))?;
        let signature: Signature = signing_key
            .sign_prehash(digest)
            .map_err(|e| EnclaveError::SigningError(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

// ─────────────────────────────────────────────
// 内部関数
// ─────────────────────────────────────────────

/// タグはファイル名に使うため英数字・`-`・`_` のみ許可する。
fn validate_tag(tag: &str) -> Result<(), EnclaveError> {
    let valid = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(EnclaveError::KeystoreError(format!("不正なタグ: {tag:?}")));
    }
    Ok(())
}

fn key_path(dir: &Path, tag: &str) -> PathBuf {
    dir.join(format!("{tag}.{KEY_FILE_EXTENSION}"))
}

fn load_keys(dir: &Path) -> Result<HashMap<String, SigningKey>, EnclaveError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        EnclaveError::KeystoreError(format!(
            "キーストアディレクトリの読み込みに失敗 ({}): {e}",
            dir.display()
        ))
    })?;

    let mut keys = HashMap::new();
    for entry in entries {
        let path = entry
            .map_err(|e| EnclaveError::KeystoreError(e.to_string()))?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some(KEY_FILE_EXTENSION) {
            continue;
        }
        let Some(tag) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            EnclaveError::KeystoreError(format!("鍵ファイルの読み込みに失敗 ({}): {e}", path.display()))
        })?;
        let scalar = hex::decode(contents.trim()).map_err(|e| {
            EnclaveError::KeystoreError(format!("鍵ファイルのhexデコードに失敗 ({}): {e}", path.display()))
        })?;
        let signing_key = SigningKey::from_slice(&scalar).map_err(|e| {
            EnclaveError::KeystoreError(format!("不正な秘密鍵 ({}): {e}", path.display()))
        })?;
        keys.insert(tag.to_string(), signing_key);
    }
    Ok(keys)
}
