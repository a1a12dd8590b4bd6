//! # チェーンプロバイダ
//!
//! 署名済みトランザクションをチェーンへ送信し、送信前の実行シミュレーションを行う。
//!
//! `SuiRpcProvider` は JSON-RPC 2.0 を使用する:
//! ```json
//! {"jsonrpc":"2.0","id":1,"method":"sui_executeTransactionBlock",
//!  "params":["<tx_bytes_b64>",["<signature>"],{"showEffects":true},"WaitForLocalExecution"]}
//! {"jsonrpc":"2.0","id":1,"method":"sui_dryRunTransactionBlock","params":["<tx_bytes_b64>"]}
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;

use biowallet_types::{DryRunResponse, ExecutionResponse};

use crate::config::SignerConfig;
use crate::error::SignerError;

const EXECUTE_METHOD: &str = "sui_executeTransactionBlock";
const DRY_RUN_METHOD: &str = "sui_dryRunTransactionBlock";
const REQUEST_TYPE: &str = "WaitForLocalExecution";

/// チェーンプロバイダの抽象インターフェース。
#[async_trait::async_trait]
pub trait ChainProvider: Send + Sync {
    /// Base64トランザクションとシリアライズ済み署名を送信し、実行結果を返す。
    async fn execute_transaction_block(
        &self,
        tx_bytes_b64: &str,
        signature: &str,
    ) -> Result<ExecutionResponse, SignerError>;

    /// 署名なしでトランザクションの実行をシミュレートする。
    async fn dry_run_transaction_block(
        &self,
        tx_bytes_b64: &str,
    ) -> Result<DryRunResponse, SignerError>;
}

/// JSON-RPCレスポンスのエンベロープ。
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct RpcEnvelope<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Sui フルノードの JSON-RPC プロバイダ。
#[derive(Clone)]
pub struct SuiRpcProvider {
    client: reqwest::Client,
    rpc_url: String,
}

impl SuiRpcProvider {
    pub fn new(client: reqwest::Client, rpc_url: impl Into<String>) -> Self {
        Self {
            client,
            rpc_url: rpc_url.into(),
        }
    }

    pub fn from_config(config: &SignerConfig) -> Result<Self, SignerError> {
        let client = config
            .http_client()
            .map_err(|e| SignerError::Provider(format!("HTTPクライアントの構築に失敗: {e}")))?;
        Ok(Self::new(client, config.rpc_url.clone()))
    }

    /// JSON-RPCメソッドを呼び出し、`result` をデシリアライズする。
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, SignerError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, rpc_url = %self.rpc_url, "RPCリクエスト");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SignerError::Provider(format!("RPC送信に失敗 ({}): {e}", self.rpc_url)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SignerError::Provider(format!(
                "RPC HTTPエラー: ステータス {}: {text}",
                status.as_u16()
            )));
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| SignerError::Provider(format!("RPCレスポンスのパースに失敗: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(SignerError::Provider(format!(
                "RPCエラー (code {}): {}",
                err.code, err.message
            )));
        }
        envelope
            .result
            .ok_or_else(|| SignerError::Provider("RPCレスポンスにresultがありません".to_string()))
    }
}

#[async_trait::async_trait]
impl ChainProvider for SuiRpcProvider {
    async fn execute_transaction_block(
        &self,
        tx_bytes_b64: &str,
        signature: &str,
    ) -> Result<ExecutionResponse, SignerError> {
        let params = serde_json::json!([
            tx_bytes_b64,
            [signature],
            { "showEffects": true },
            REQUEST_TYPE,
        ]);
        let result: ExecutionResponse = self.call(EXECUTE_METHOD, params).await?;
        tracing::info!(digest = %result.digest, "トランザクションを送信しました");
        Ok(result)
    }

    async fn dry_run_transaction_block(
        &self,
        tx_bytes_b64: &str,
    ) -> Result<DryRunResponse, SignerError> {
        let result: DryRunResponse = self
            .call(DRY_RUN_METHOD, serde_json::json!([tx_bytes_b64]))
            .await?;
        tracing::info!(
            status = %result.effects.status.status,
            error = ?result.error(),
            "ドライランが完了しました"
        );
        Ok(result)
    }
}
