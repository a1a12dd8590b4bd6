//! # フォーセットクライアント
//!
//! `POST {faucet_url}/gas` でテストネット用のガスコインを受け取る。
//!
//! ## リクエスト
//! ```json
//! { "FixedAmountRequest": { "recipient": "0x…" } }
//! ```
//!
//! ## レスポンス（HTTP 2xx）
//! ```json
//! { "transferredGasObjects": [{ "amount": 10000000000, "id": "0x…", "transferTxDigest": "…" }], "error": null }
//! ```
//!
//! 2xx以外のステータス、`error` の存在、空の `transferredGasObjects` は `SignerError::Faucet`。

use biowallet_types::{FaucetCoinInfo, FaucetRequest, FaucetResponse};

use crate::config::SignerConfig;
use crate::error::SignerError;

const GAS_PATH: &str = "/gas";

/// フォーセットのHTTPクライアント。
#[derive(Clone)]
pub struct FaucetClient {
    client: reqwest::Client,
    base_url: String,
}

impl FaucetClient {
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
            .map_err(|e| SignerError::Faucet(format!("HTTPクライアントの構築に失敗: {e}")))?;
        Ok(Self::new(client, config.faucet_url.clone()))
    }

    /// `recipient` へのガスコイン送金を依頼し、最初に送金されたコインを返す。
    pub async fn request_gas(&self, recipient: &str) -> Result<FaucetCoinInfo, SignerError> {
        let url = format!("{}{GAS_PATH}", self.base_url);
        tracing::debug!(%url, recipient, "フォーセットへリクエスト");

        let response = self
            .client
            .post(&url)
            .json(&FaucetRequest::new(recipient))
            .send()
            .await
            .map_err(|e| SignerError::Faucet(format!("リクエスト送信に失敗 ({url}): {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SignerError::Faucet(format!(
                "HTTPエラー: ステータス {} ({url}): {body}",
                status.as_u16()
            )));
        }

        let body: FaucetResponse = response
            .json()
            .await
            .map_err(|e| SignerError::Faucet(format!("レスポンスのパースに失敗 ({url}): {e}")))?;
        if let Some(err) = body.error {
            return Err(SignerError::Faucet(err));
        }
        let coin = body
            .transferred_gas_objects
            .into_iter()
            .next()
            .ok_or_else(|| SignerError::Faucet(format!("送金されたコインがありません ({url})")))?;
        tracing::info!(
            recipient,
            amount = coin.amount,
            digest = %coin.transfer_tx_digest,
            "フォーセットからガスを受け取りました"
        );
        Ok(coin)
    }
}
