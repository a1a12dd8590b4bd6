//! # Signing Orchestrator
//!
//! アクティブなアイデンティティ（タグ + 圧縮公開鍵）を保持し、
//! チェーン固有のプリイメージを構築してエンクレーブに署名させる。
//!
//! ## 状態遷移
//! ```text
//! Uninitialized → Identity Set → [署名 × 任意回数] → Identity Cleared → Uninitialized
//! ```
//!
//! アクティブなハンドルは `Arc<KeyHandle>` 単位で差し替える。署名呼び出しは
//! 開始時にハンドルを一度だけ取得するため、途中で差し替えがあっても
//! 旧タグと新公開鍵が混ざることはない。

use std::sync::{Arc, RwLock};

use base64::Engine;

use biowallet_crypto::intent::{personal_message_preimage, signing_digest, transaction_preimage};
use biowallet_crypto::wire::derive_address;
use biowallet_crypto::{b64, CompressedPublicKey, SerializedSignature};
use biowallet_enclave::EnclaveService;

use crate::error::SignerError;

/// エンクレーブ内の鍵ペア1つを表すハンドル。秘密鍵は保持しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHandle {
    /// キーストア内の鍵を識別するタグ
    pub tag: String,
    /// 生成時に取得した圧縮公開鍵
    pub public_key: CompressedPublicKey,
}

impl KeyHandle {
    pub fn new(tag: impl Into<String>, public_key: CompressedPublicKey) -> Self {
        Self {
            tag: tag.into(),
            public_key,
        }
    }

    /// 保存済みのタグとBase64公開鍵からハンドルを復元する。
    pub fn from_stored(tag: impl Into<String>, public_key_b64: &str) -> Result<Self, SignerError> {
        let public_key = CompressedPublicKey::from_base64(public_key_b64)
            .map_err(|e| SignerError::InvalidPublicKey(e.to_string()))?;
        Ok(Self::new(tag, public_key))
    }

    /// このハンドルの公開鍵から導出したアドレス
    pub fn address(&self) -> String {
        derive_address(&self.public_key)
    }
}

/// トランザクション署名の結果。チェーンプロバイダにそのまま渡せる形式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Base64エンコードされたトランザクションバイト列
    pub tx_bytes_b64: String,
    /// Base64エンコードされたシリアライズ済み署名
    pub signature: String,
}

/// Signing Orchestrator。
pub struct SigningOrchestrator {
    enclave: EnclaveService,
    active: RwLock<Option<Arc<KeyHandle>>>,
}

impl SigningOrchestrator {
    /// アイデンティティ未設定の状態で作成する。
    pub fn new(enclave: EnclaveService) -> Self {
        Self {
            enclave,
            active: RwLock::new(None),
        }
    }

    /// 新しいタグ（UUIDv4）で鍵ペアを生成する。アクティブなアイデンティティは変えない。
    ///
    /// タグは呼び出しごとに新規に発行するため、失敗後の再試行でも
    /// 同じタグが再利用されることはない。
    pub async fn generate_identity(&self) -> Result<KeyHandle, SignerError> {
        let tag = uuid::Uuid::new_v4().to_string();
        let public_key = self.enclave.generate_key_pair(&tag).await?;
        let handle = KeyHandle::new(tag, public_key);
        tracing::info!(tag = %handle.tag, address = %handle.address(), "アイデンティティを作成しました");
        Ok(handle)
    }

    /// 新しい鍵ペアを生成し、アクティブなアイデンティティにする。
    pub async fn create_identity(&self) -> Result<Arc<KeyHandle>, SignerError> {
        let handle = self.generate_identity().await?;
        Ok(self.set_active_identity(handle))
    }

    /// アクティブなアイデンティティを差し替える。
    pub fn set_active_identity(&self, handle: KeyHandle) -> Arc<KeyHandle> {
        let handle = Arc::new(handle);
        tracing::info!(tag = %handle.tag, "アクティブなアイデンティティを切り替えました");
        self.swap(Some(handle.clone()));
        handle
    }

    /// アクティブなアイデンティティを解除する（サインアウト）。
    pub fn clear_identity(&self) {
        if self.swap(None).is_some() {
            tracing::info!("アイデンティティを解除しました");
        }
    }

    /// 現在のアクティブなハンドル
    pub fn active_identity(&self) -> Option<Arc<KeyHandle>> {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// アクティブなアイデンティティのアドレス
    pub fn address(&self) -> Result<String, SignerError> {
        Ok(self.require_identity()?.address())
    }

    /// 個人メッセージに署名し、Base64のシリアライズ済み署名を返す。
    ///
    /// ペイロードが255バイトを超える場合はエンクレーブを呼ばずに
    /// `PayloadTooLarge` を返す。
    pub async fn sign_message(&self, payload: &[u8]) -> Result<String, SignerError> {
        let preimage = personal_message_preimage(payload)?;
        let handle = self.require_identity()?;
        self.sign_preimage(&handle, &preimage).await
    }

    /// トランザクションのプリイメージに署名する。長さプレフィックスは付けない。
    pub async fn sign_transaction_preimage(
        &self,
        tx_bytes: &[u8],
    ) -> Result<SignedTransaction, SignerError> {
        let handle = self.require_identity()?;
        let preimage = transaction_preimage(tx_bytes);
        let signature = self.sign_preimage(&handle, &preimage).await?;
        Ok(SignedTransaction {
            tx_bytes_b64: b64().encode(tx_bytes),
            signature,
        })
    }

    // ─── 内部関数 ───

    fn require_identity(&self) -> Result<Arc<KeyHandle>, SignerError> {
        self.active_identity().ok_or(SignerError::IdentityNotSet)
    }

    fn swap(&self, next: Option<Arc<KeyHandle>>) -> Option<Arc<KeyHandle>> {
        let mut guard = match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }

    async fn sign_preimage(&self, handle: &KeyHandle, preimage: &[u8]) -> Result<String, SignerError> {
        let digest = signing_digest(preimage);
        tracing::debug!(tag = %handle.tag, preimage_len = preimage.len(), "ダイジェストに署名します");
        let signature = self.enclave.sign(&digest, &handle.tag).await?;
        Ok(SerializedSignature::new(signature, handle.public_key).to_base64())
    }
}
