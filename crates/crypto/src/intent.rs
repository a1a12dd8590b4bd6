//! # Intent（ドメイン分離）と署名プリイメージ
//!
//! 署名対象のバイト列の先頭に3バイトのIntent `[scope, version, app_id]` を付与し、
//! 個人メッセージ用の署名がトランザクション承認として再利用されることを防ぐ。
//!
//! ## プリイメージ
//! ```text
//! PersonalMessage: [3, 0, 0] ‖ len(payload):u8 ‖ payload
//! TransactionData: [0, 0, 0] ‖ tx_bytes
//! digest = BLAKE2b-256(preimage)
//! ```

use crate::{blake2b256, CryptoError, Digest32};

/// Intentのスコープ。チェーン側の検証器と一致させる必要がある。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    PersonalMessage = 3,
}

/// Intentバージョン
pub const INTENT_VERSION_V0: u8 = 0;

/// アプリケーションID（Sui）
pub const APP_ID_SUI: u8 = 0;

/// 1バイト長プレフィックスで表現できる最大ペイロード長
pub const MAX_PERSONAL_MESSAGE_LEN: usize = u8::MAX as usize;

/// 3バイトのIntent。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: u8,
    pub app_id: u8,
}

impl Intent {
    pub const fn personal_message() -> Self {
        Self {
            scope: IntentScope::PersonalMessage,
            version: INTENT_VERSION_V0,
            app_id: APP_ID_SUI,
        }
    }

    pub const fn transaction_data() -> Self {
        Self {
            scope: IntentScope::TransactionData,
            version: INTENT_VERSION_V0,
            app_id: APP_ID_SUI,
        }
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.scope as u8, self.version, self.app_id]
    }
}

/// Intentをメッセージの先頭に付与する。
pub fn message_with_intent(intent: Intent, message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + message.len());
    out.extend_from_slice(&intent.to_bytes());
    out.extend_from_slice(message);
    out
}

/// 個人メッセージ署名のプリイメージを構築する。
///
/// 長さプレフィックスは1バイト固定。255バイトを超えるペイロードは
/// 切り詰めずに `PayloadTooLarge` で拒否する。
pub fn personal_message_preimage(payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if payload.len() > MAX_PERSONAL_MESSAGE_LEN {
        return Err(CryptoError::PayloadTooLarge {
            size: payload.len(),
            limit: MAX_PERSONAL_MESSAGE_LEN,
        });
    }
    let mut framed = Vec::with_capacity(1 + payload.len());
    framed.push(payload.len() as u8);
    framed.extend_from_slice(payload);
    Ok(message_with_intent(Intent::personal_message(), &framed))
}

/// トランザクション署名のプリイメージを構築する（長さプレフィックスなし）。
pub fn transaction_preimage(tx_bytes: &[u8]) -> Vec<u8> {
    message_with_intent(Intent::transaction_data(), tx_bytes)
}

/// プリイメージから署名対象ダイジェストを計算する。
pub fn signing_digest(preimage: &[u8]) -> Digest32 {
    blake2b256(preimage)
}
