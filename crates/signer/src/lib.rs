//! # BioWallet Signer
//!
//! エンクレーブサービスの上に立つ署名オーケストレーション層。
//!
//! ## モジュール構成
//! - [`orchestrator`] — アクティブなアイデンティティの保持、プリイメージ構築、署名のシリアライズ
//! - [`identity_store`] — ユーザー名 → `{tag, publicKey}` の永続化
//! - [`bridge`] — ブリッジサービス（`POST /prepareTransactionBlock`）クライアント
//! - [`provider`] — チェーンへのトランザクション送信・ドライラン
//! - [`faucet`] — フォーセットからのガス受け取り
//! - [`wallet`] — サインイン・サインアウト・ブリッジ送金・ドライラン・フォーセット
//! - [`config`] — HTTPクライアント設定

pub mod bridge;
pub mod config;
pub mod error;
pub mod faucet;
pub mod identity_store;
pub mod orchestrator;
pub mod provider;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use bridge::BridgeClient;
pub use config::SignerConfig;
pub use error::SignerError;
pub use faucet::FaucetClient;
pub use identity_store::{IdentityStore, JsonFileIdentityStore, MemoryIdentityStore};
pub use orchestrator::{KeyHandle, SignedTransaction, SigningOrchestrator};
pub use provider::{ChainProvider, SuiRpcProvider};
pub use wallet::{BridgeTransfer, Wallet};
