//! # Signer エラー型
//!
//! エンクレーブ由来の失敗は [`SignerError::Enclave`] としてそのまま呼び出し元へ届く。

use biowallet_crypto::CryptoError;
use biowallet_enclave::EnclaveError;

/// Signing Orchestrator・ウォレットのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// エンクレーブサービスの失敗（変更せずに伝播）
    #[error(transparent)]
    Enclave(#[from] EnclaveError),
    /// 1バイト長プレフィックスで表現できないペイロード
    #[error("ペイロードサイズが上限を超えています: {size} bytes (上限: {limit} bytes)")]
    PayloadTooLarge { size: usize, limit: usize },
    /// アクティブなアイデンティティが未設定
    #[error("アイデンティティが設定されていません")]
    IdentityNotSet,
    /// 保存済み公開鍵の復元に失敗
    #[error("不正な公開鍵: {0}")]
    InvalidPublicKey(String),
    /// シリアライズ済み署名の復元に失敗
    #[error("不正な署名: {0}")]
    InvalidSignature(String),
    /// Identity Storeの読み書きに失敗
    #[error("Identity Storeの操作に失敗: {0}")]
    Store(String),
    /// ブリッジサービスとの通信に失敗
    #[error("ブリッジサービスとの通信に失敗: {0}")]
    Bridge(String),
    /// チェーンプロバイダとの通信・実行に失敗
    #[error("チェーンプロバイダエラー: {0}")]
    Provider(String),
    /// フォーセットとの通信に失敗、または送金が拒否された
    #[error("フォーセットエラー: {0}")]
    Faucet(String),
}

impl From<CryptoError> for SignerError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::PayloadTooLarge { size, limit } => SignerError::PayloadTooLarge { size, limit },
            CryptoError::MalformedSignature(msg) => {
                SignerError::Enclave(EnclaveError::MalformedSignature(msg))
            }
            CryptoError::InvalidPublicKey(msg) => SignerError::InvalidPublicKey(msg),
            // 保存済み公開鍵のbase64デコード失敗
            CryptoError::Base64Error(msg) => SignerError::InvalidPublicKey(msg),
            CryptoError::InvalidSerializedSignature(msg) => SignerError::InvalidSignature(msg),
        }
    }
}
