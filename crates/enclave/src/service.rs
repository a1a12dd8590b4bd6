//! # Enclave Key & Signature Service
//!
//! キーストアとユーザー存在確認を組み合わせ、チェーン非依存の形式で
//! 結果を返す。
//!
//! ## 鍵生成
//! 1. 生体認証
//! 2. キーストアでP-256鍵ペアを生成（`tag` に紐づけ）
//! 3. 外部表現 `0x04 ‖ X ‖ Y` を33バイトの圧縮形式に変換
//!
//! ## 署名
//! 1. 生体認証
//! 2. キーストアで `digest` に署名（DER）
//! 3. DERデコード → 32バイト幅に揃える → low-S正規化

use std::sync::Arc;

use biowallet_crypto::{CompressedPublicKey, CryptoError, Digest32, NormalizedSignature};

use crate::keystore::SecureKeystore;
use crate::presence::{UserPresence, GENERATE_REASON, SIGN_REASON};
use crate::EnclaveError;

/// エンクレーブ鍵・署名サービス。
#[derive(Clone)]
pub struct EnclaveService {
    keystore: Arc<dyn SecureKeystore>,
    presence: Arc<dyn UserPresence>,
}

impl EnclaveService {
    pub fn new(keystore: Arc<dyn SecureKeystore>, presence: Arc<dyn UserPresence>) -> Self {
        Self { keystore, presence }
    }

    /// 生体認証の後、`tag` に紐づく鍵ペアを生成し、圧縮公開鍵を返す。
    ///
    /// `tag` は呼び出しごとに新規である必要がある。
    pub async fn generate_key_pair(&self, tag: &str) -> Result<CompressedPublicKey, EnclaveError> {
        self.presence.authenticate(GENERATE_REASON).await?;

        let external = self.keystore.generate(tag).await?;
        let public_key = CompressedPublicKey::from_external_representation(&external)
            .map_err(|e| EnclaveError::KeyAccessError(e.to_string()))?;

        tracing::info!(
            backend = self.keystore.backend(),
            tag,
            public_key = %public_key,
            "鍵ペアを生成しました"
        );
        Ok(public_key)
    }

    /// 生体認証の後、`tag` の鍵で `digest` に署名し、正規化済み署名を返す。
    pub async fn sign(&self, digest: &Digest32, tag: &str) -> Result<NormalizedSignature, EnclaveError> {
        self.presence.authenticate(SIGN_REASON).await?;

        let der = self.keystore.sign_raw(tag, digest).await?;
        tracing::debug!(tag, der_len = der.len(), "キーストアが署名を返しました");

        NormalizedSignature::from_der(&der).map_err(|e| {
            tracing::error!(
                backend = self.keystore.backend(),
                tag,
                der = %hex::encode(&der),
                error = %e,
                "キーストアの署名出力をデコードできません"
            );
            match e {
                CryptoError::MalformedSignature(msg) => EnclaveError::MalformedSignature(msg),
                other => EnclaveError::MalformedSignature(other.to_string()),
            }
        })
    }
}
