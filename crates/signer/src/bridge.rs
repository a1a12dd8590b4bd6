//! # ブリッジサービスクライアント
//!
//! `POST {bridge_url}/prepareTransactionBlock` で未署名トランザクションを取得する。
//!
//! ## リクエスト
//! ```json
//! { "recipientChain": "Sepolia", "senderAddress": "0x…", "receiverAddress": "0x…", "amountToSend": "0.1" }
//! ```
//!
//! ## レスポンス（HTTP 200）
//! ```json
//! { "transactionBlock": [0, 0, 3, …] }
//! ```
//!
//! 200以外のステータスや不正なボディはすべて `SignerError::Bridge`。

use biowallet_types::{PrepareTransactionBlockRequest, PrepareTransactionBlockResponse};

use crate::config::SignerConfig;
use crate::error::SignerError;

const PREPARE_PATH: &str = "/prepareTransactionBlock";

/// ブリッジサービスのHTTPクライアント。
#[derive(Clone)]
pub struct BridgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl BridgeClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 設定からクライアントを構築する。
    pub fn from_config(config: &SignerConfig) -> Result<Self, SignerError> {
        let client = config
            .http_client()
            .map_err(|e| SignerError::Bridge(format!("HTTPクライアントの構築に失敗: {e}")))?;
        Ok(Self::new(client, config.bridge_url.clone()))
    }

    /// 未署名トランザクションのプリイメージを取得する。
    pub async fn prepare_transaction_block(
        &self,
        request: &PrepareTransactionBlockRequest,
    ) -> Result<Vec<u8>, SignerError> {
        let url = format!("{}{PREPARE_PATH}", self.base_url);
        tracing::debug!(%url, recipient_chain = %request.recipient_chain, "ブリッジサービスへリクエスト");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SignerError::Bridge(format!("リクエスト送信に失敗 ({url}): {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SignerError::Bridge(format!(
                "HTTPエラー: ステータス {} ({url}): {body}",
                status.as_u16()
            )));
        }

        let body: PrepareTransactionBlockResponse = response
            .json()
            .await
            .map_err(|e| SignerError::Bridge(format!("レスポンスのパースに失敗 ({url}): {e}")))?;
        if body.transaction_block.is_empty() {
            return Err(SignerError::Bridge(format!("空のトランザクションブロック ({url})")));
        }
        Ok(body.transaction_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{start_mock_bridge, start_mock_server};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Json;

    fn request() -> PrepareTransactionBlockRequest {
        PrepareTransactionBlockRequest {
            recipient_chain: "Sepolia".to_string(),
            sender_address: "0xsender".to_string(),
            receiver_address: "0xreceiver".to_string(),
            amount_to_send: "0.1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_prepare_returns_transaction_bytes() {
        let base = start_mock_bridge(
            StatusCode::OK,
            serde_json::json!({ "transactionBlock": [0, 1, 2, 255] }),
        )
        .await;
        let client = BridgeClient::new(reqwest::Client::new(), format!("{base}/"));
        let bytes = client.prepare_transaction_block(&request()).await.unwrap();
        assert_eq!(bytes, vec![0, 1, 2, 255]);
    }

    /// リクエストボディはcamelCaseで送られる
    #[tokio::test]
    async fn test_request_body_is_camel_case() {
        let app = axum::Router::new().route(
            "/prepareTransactionBlock",
            post(|Json(req): Json<serde_json::Value>| async move {
                assert_eq!(req["recipientChain"], "Sepolia");
                assert_eq!(req["senderAddress"], "0xsender");
                assert_eq!(req["receiverAddress"], "0xreceiver");
                assert_eq!(req["amountToSend"], "0.1");
                Json(serde_json::json!({ "transactionBlock": [7] }))
            }),
        );
        let base = start_mock_server(app).await;
        let client = BridgeClient::new(reqwest::Client::new(), base);
        assert_eq!(client.prepare_transaction_block(&request()).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_non_200_is_bridge_error() {
        let base = start_mock_bridge(
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "boom" }),
        )
        .await;
        let client = BridgeClient::new(reqwest::Client::new(), base);
        assert!(matches!(
            client.prepare_transaction_block(&request()).await,
            Err(SignerError::Bridge(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bridge_error() {
        let base = start_mock_bridge(
            StatusCode::OK,
            serde_json::json!({ "transactionBlock": [256, -1] }),
        )
        .await;
        let client = BridgeClient::new(reqwest::Client::new(), base);
        assert!(matches!(
            client.prepare_transaction_block(&request()).await,
            Err(SignerError::Bridge(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_is_bridge_error() {
        let client = BridgeClient::new(reqwest::Client::new(), "http://127.0.0.1:1");
        assert!(matches!(
            client.prepare_transaction_block(&request()).await,
            Err(SignerError::Bridge(_))
        ));
    }
}
