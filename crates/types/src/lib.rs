//! # BioWallet 共有型定義
//!
//! クレート間および外部サービスとの間でやり取りされるデータ構造を
//! Rust構造体として提供する。
//!
//! ## エンコーディング規則
//! - Base64: 圧縮公開鍵、シリアライズ済み署名、トランザクションバイト列
//! - JSON配列（数値）: ブリッジサービスが返す未署名トランザクション
//! - フィールド名は外部サービスに合わせてcamelCase

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity Store
// ---------------------------------------------------------------------------

/// ユーザー名に紐づく署名用アイデンティティの永続化レコード。
///
/// 秘密鍵はキーストア外に出ないため、保持するのはタグと公開鍵のみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIdentity {
    /// キーストア内の鍵を識別する不透明なタグ
    pub tag: String,
    /// Base64エンコードされた圧縮公開鍵（33バイト）
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// ユーザー名 → アイデンティティのマップ。Identity Storeの保存形式。
pub type IdentityMap = BTreeMap<String, StoredIdentity>;

// ---------------------------------------------------------------------------
// ブリッジサービス
// ---------------------------------------------------------------------------

/// `POST /prepareTransactionBlock` のリクエストボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareTransactionBlockRequest {
    /// 送金先チェーン名（例: "Sepolia"）
    pub recipient_chain: String,
    /// 送金元アドレス（本ウォレットのアドレス）
    pub sender_address: String,
    /// 送金先チェーン上の受取アドレス
    pub receiver_address: String,
    /// 送金額（十進文字列、ネイティブトークン単位）
    pub amount_to_send: String,
}

/// `POST /prepareTransactionBlock` のレスポンスボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareTransactionBlockResponse {
    /// 未署名トランザクションのプリイメージ（符号なしバイトの配列）
    pub transaction_block: Vec<u8>,
}

// ---------------------------------------------------------------------------
// チェーンプロバイダ
// ---------------------------------------------------------------------------

/// トランザクション実行結果。必要なフィールドのみ定義し、その他は無視する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    /// トランザクション識別子
    pub digest: String,
    /// 実行エフェクト（リクエストオプションによっては省略される）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
}

/// 実行エフェクト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEffects {
    /// 実行ステータス
    pub status: ExecutionStatus,
}

/// 実行ステータス。`status` は "success" または "failure"。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResponse {
    /// `effects.status.error` を返す。存在しなければ `None`。
    pub fn error(&self) -> Option<&str> {
        self.effects
            .as_ref()
            .and_then(|e| e.status.error.as_deref())
    }
}

/// `sui_dryRunTransactionBlock` の結果。送信前の実行シミュレーション。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunResponse {
    pub effects: TransactionEffects,
}

impl DryRunResponse {
    /// `effects.status.error` を返す。
    pub fn error(&self) -> Option<&str> {
        self.effects.status.error.as_deref()
    }
}

// ---------------------------------------------------------------------------
// フォーセット
// ---------------------------------------------------------------------------

/// `POST /gas` のリクエストボディ。
///
/// ```json
/// { "FixedAmountRequest": { "recipient": "0x…" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetRequest {
    #[serde(rename = "FixedAmountRequest")]
    pub fixed_amount_request: FixedAmountRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAmountRequest {
    /// 受取アドレス
    pub recipient: String,
}

impl FaucetRequest {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            fixed_amount_request: FixedAmountRequest {
                recipient: recipient.into(),
            },
        }
    }
}

/// `POST /gas` のレスポンスボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetResponse {
    #[serde(default)]
    pub transferred_gas_objects: Vec<FaucetCoinInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// フォーセットが送金したガスコイン1つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetCoinInfo {
    /// 送金額（MIST）
    pub amount: u64,
    /// コインのオブジェクトID
    pub id: String,
    /// 送金トランザクションのダイジェスト
    pub transfer_tx_digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_identity_uses_public_key_field_name() {
        let identity = StoredIdentity {
            tag: "7F0C-tag".to_string(),
            public_key: "AgAA".to_string(),
        };
        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["tag"], "7F0C-tag");
        assert_eq!(value["publicKey"], "AgAA");
    }

    #[test]
    fn test_prepare_request_is_camel_case() {
        let req = PrepareTransactionBlockRequest {
            recipient_chain: "Sepolia".to_string(),
            sender_address: "0xabc".to_string(),
            receiver_address: "0xdef".to_string(),
            amount_to_send: "0.1".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["recipientChain"], "Sepolia");
        assert_eq!(value["senderAddress"], "0xabc");
        assert_eq!(value["receiverAddress"], "0xdef");
        assert_eq!(value["amountToSend"], "0.1");
    }

    /// ブリッジサービスは数値配列でバイト列を返す
    #[test]
    fn test_prepare_response_from_byte_array() {
        let resp: PrepareTransactionBlockResponse =
            serde_json::from_str(r#"{"transactionBlock":[0,1,255]}"#).unwrap();
        assert_eq!(resp.transaction_block, vec![0, 1, 255]);
    }

    /// 255を超える要素はバイトとして不正
    #[test]
    fn test_prepare_response_rejects_out_of_range() {
        let result: Result<PrepareTransactionBlockResponse, _> =
            serde_json::from_str(r#"{"transactionBlock":[256]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_execution_response_error_extraction() {
        let ok: ExecutionResponse = serde_json::from_str(
            r#"{"digest":"D1","effects":{"status":{"status":"success"}},"extra":1}"#,
        )
        .unwrap();
        assert_eq!(ok.digest, "D1");
        assert_eq!(ok.error(), None);

        let failed: ExecutionResponse = serde_json::from_str(
            r#"{"digest":"D2","effects":{"status":{"status":"failure","error":"InsufficientGas"}}}"#,
        )
        .unwrap();
        assert_eq!(failed.error(), Some("InsufficientGas"));

        let bare: ExecutionResponse = serde_json::from_str(r#"{"digest":"D3"}"#).unwrap();
        assert!(bare.effects.is_none());
        assert_eq!(bare.error(), None);
    }

    #[test]
    fn test_dry_run_response_error_extraction() {
        let failed: DryRunResponse = serde_json::from_str(
            r#"{"effects":{"status":{"status":"failure","error":"InsufficientCoinBalance"},"transactionDigest":"D"},"events":[]}"#,
        )
        .unwrap();
        assert_eq!(failed.error(), Some("InsufficientCoinBalance"));

        let ok: DryRunResponse =
            serde_json::from_str(r#"{"effects":{"status":{"status":"success"}}}"#).unwrap();
        assert_eq!(ok.error(), None);
    }

    #[test]
    fn test_faucet_request_shape() {
        let value = serde_json::to_value(FaucetRequest::new("0xabc")).unwrap();
        assert_eq!(value, serde_json::json!({ "FixedAmountRequest": { "recipient": "0xabc" } }));
    }

    #[test]
    fn test_faucet_response_is_camel_case() {
        let resp: FaucetResponse = serde_json::from_str(
            r#"{"transferredGasObjects":[{"amount":10000000000,"id":"0xc0in","transferTxDigest":"T1"}],"error":null}"#,
        )
        .unwrap();
        assert_eq!(resp.error, None);
        assert_eq!(
            resp.transferred_gas_objects,
            vec![FaucetCoinInfo {
                amount: 10_000_000_000,
                id: "0xc0in".to_string(),
                transfer_tx_digest: "T1".to_string(),
            }]
        );
    }
}
