//! # CLI設定
//!
//! 起動時に環境変数から一度だけ読み込む。コマンドラインフラグが優先される。
//!
//! | 環境変数 | デフォルト |
//! |----------|-----------|
//! | `BIOWALLET_HOME` | `./.biowallet` |
//! | `BRIDGE_URL` | `http://127.0.0.1:3000` |
//! | `SUI_RPC_URL` | `https://fullnode.devnet.sui.io:443` |
//! | `FAUCET_URL` | `https://faucet.devnet.sui.io` |
//! | `HTTP_TIMEOUT_SECS` | `120` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use biowallet_signer::config::{
    SignerConfig, DEFAULT_BRIDGE_URL, DEFAULT_FAUCET_URL, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_SUI_RPC_URL,
};

const DEFAULT_HOME: &str = ".biowallet";
const IDENTITY_FILE: &str = "identities.json";
const KEY_DIR: &str = "keys";

/// CLIの実行設定。
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// データディレクトリ（Identity Store・ソフトウェアキーストア）
    pub home: PathBuf,
    pub signer: SignerConfig,
}

impl CliConfig {
    /// 環境変数から設定を読み込む。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let home = lookup("BIOWALLET_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));
        let bridge_url = lookup("BRIDGE_URL").unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string());
        let rpc_url = lookup("SUI_RPC_URL").unwrap_or_else(|| DEFAULT_SUI_RPC_URL.to_string());
        let faucet_url = lookup("FAUCET_URL").unwrap_or_else(|| DEFAULT_FAUCET_URL.to_string());
        let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS が不正です: {raw:?}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            home,
            signer: SignerConfig {
                bridge_url,
                rpc_url,
                faucet_url,
                http_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn identity_path(&self) -> PathBuf {
        self.home.join(IDENTITY_FILE)
    }

    pub fn key_dir(&self) -> PathBuf {
        self.home.join(KEY_DIR)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.home(), Path::new(".biowallet"));
        assert_eq!(config.signer, SignerConfig::default());
        assert_eq!(config.identity_path(), Path::new(".biowallet/identities.json"));
        assert_eq!(config.key_dir(), Path::new(".biowallet/keys"));
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_lookup(lookup(&[
            ("BIOWALLET_HOME", "/tmp/bw"),
            ("BRIDGE_URL", "http://bridge:3000"),
            ("SUI_RPC_URL", "http://rpc:9000"),
            ("FAUCET_URL", "http://faucet:5003"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.home(), Path::new("/tmp/bw"));
        assert_eq!(config.signer.bridge_url, "http://bridge:3000");
        assert_eq!(config.signer.rpc_url, "http://rpc:9000");
        assert_eq!(config.signer.faucet_url, "http://faucet:5003");
        assert_eq!(config.signer.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(CliConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).is_err());
    }
}
