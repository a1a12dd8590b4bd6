//! # Signer設定
//!
//! HTTPクライアント（ブリッジサービス・チェーンプロバイダ・フォーセット）の接続設定。

use std::time::Duration;

/// ブリッジサービスのデフォルトURL
pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:3000";

/// チェーンJSON-RPCエンドポイントのデフォルトURL（Sui devnet）
pub const DEFAULT_SUI_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";

/// フォーセットのデフォルトURL（Sui devnet）
pub const DEFAULT_FAUCET_URL: &str = "https://faucet.devnet.sui.io";

/// HTTPリクエストのデフォルトタイムアウト（秒）
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// HTTPクライアントの接続設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    /// ブリッジサービスのベースURL（末尾スラッシュなし）
    pub bridge_url: String,
    /// チェーンJSON-RPCエンドポイント
    pub rpc_url: String,
    /// フォーセットのベースURL
    pub faucet_url: String,
    /// HTTPリクエストのタイムアウト
    pub http_timeout: Duration,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            bridge_url: DEFAULT_BRIDGE_URL.to_string(),
            rpc_url: DEFAULT_SUI_RPC_URL.to_string(),
            faucet_url: DEFAULT_FAUCET_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl SignerConfig {
    /// 設定に従ったreqwestクライアントを構築する。
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.http_timeout).build()
    }
}
