//! # BioWallet CLI
//!
//! ファイル永続化したソフトウェアキーストアとIdentity Storeの上で
//! サインイン・署名・ブリッジ送金を行う。
//!
//! ## コマンド
//! - `sign-in <username>` — アイデンティティの作成または読み込み、アドレス表示
//! - `sign-message <username> <message> [--hex]` — 個人メッセージ署名
//! - `sign-tx <username> <tx_bytes_b64>` — トランザクション署名
//! - `address <username>` — アドレス表示
//! - `bridge <username> --chain --to --amount` — ブリッジ送金
//! - `dry-run <tx_bytes_b64>` — トランザクションの実行シミュレーション
//! - `faucet <username>` — フォーセットからガスを受け取る

mod config;
mod prompt;

use std::sync::Arc;

use anyhow::Context;
use base64::Engine;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use biowallet_enclave::{AlwaysPresent, EnclaveService, SoftwareKeystore, UserPresence};
use biowallet_signer::{
    BridgeClient, BridgeTransfer, FaucetClient, JsonFileIdentityStore, SigningOrchestrator,
    SuiRpcProvider, Wallet,
};

use crate::config::CliConfig;
use crate::prompt::TerminalPresence;

#[derive(Parser)]
#[command(name = "biowallet")]
#[command(about = "Enclave-backed P-256 wallet", long_about = None)]
struct Cli {
    /// データディレクトリ（BIOWALLET_HOME より優先）
    #[arg(long, global = true)]
    home: Option<std::path::PathBuf>,

    /// ユーザー存在確認のプロンプトを省略する
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// サインイン（未登録なら新しいアイデンティティを作成）
    SignIn { username: String },

    /// 個人メッセージに署名する（最大255バイト）
    SignMessage {
        username: String,
        /// 署名するメッセージ
        message: String,
        /// メッセージをhexとして解釈する
        #[arg(long)]
        hex: bool,
    },

    /// Base64トランザクションバイト列に署名する
    SignTx { username: String, tx_bytes: String },

    /// アドレスを表示する
    Address { username: String },

    /// ブリッジサービス経由で送金する
    Bridge {
        username: String,
        /// 送金先チェーン名
        #[arg(long)]
        chain: String,
        /// 送金先チェーン上の受取アドレス
        #[arg(long)]
        to: String,
        /// 送金額（十進文字列）
        #[arg(long)]
        amount: String,
    },

    /// Base64トランザクションバイト列の実行をシミュレートする
    DryRun { tx_bytes: String },

    /// フォーセットからガスを受け取る
    Faucet { username: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env()?;
    if let Some(home) = cli.home {
        config.home = home;
    }

    let presence: Arc<dyn UserPresence> = if cli.yes {
        Arc::new(AlwaysPresent)
    } else {
        Arc::new(TerminalPresence)
    };
    let wallet = build_wallet(&config, presence)?;

    match cli.command {
        Commands::SignIn { username } => {
            let handle = wallet.sign_in(&username).await?;
            println!("{}", handle.address());
        }
        Commands::SignMessage {
            username,
            message,
            hex,
        } => {
            let payload = if hex {
                hex::decode(&message).context("メッセージのhexデコードに失敗")?
            } else {
                message.into_bytes()
            };
            wallet.resume(&username).await?;
            println!("{}", wallet.orchestrator().sign_message(&payload).await?);
        }
        Commands::SignTx { username, tx_bytes } => {
            let tx_bytes = decode_tx_bytes(&tx_bytes)?;
            wallet.resume(&username).await?;
            let signed = wallet.orchestrator().sign_transaction_preimage(&tx_bytes).await?;
            println!("{}", signed.signature);
        }
        Commands::Address { username } => {
            let handle = wallet.resume(&username).await?;
            println!("{}", handle.address());
        }
        Commands::Bridge {
            username,
            chain,
            to,
            amount,
        } => {
            wallet.resume(&username).await?;
            let result = wallet
                .bridge_transfer(&BridgeTransfer {
                    recipient_chain: chain,
                    receiver_address: to,
                    amount,
                })
                .await?;
            println!("{}", result.digest);
        }
        Commands::DryRun { tx_bytes } => {
            let tx_bytes = decode_tx_bytes(&tx_bytes)?;
            let result = wallet.dry_run_transaction_block(&tx_bytes).await?;
            match result.error() {
                Some(err) => anyhow::bail!("ドライランが失敗しました: {err}"),
                None => println!("{}", result.effects.status.status),
            }
        }
        Commands::Faucet { username } => {
            wallet.resume(&username).await?;
            let coin = wallet.request_faucet().await?;
            println!("{} {} {}", coin.id, coin.amount, coin.transfer_tx_digest);
        }
    }

    Ok(())
}

fn decode_tx_bytes(tx_bytes: &str) -> anyhow::Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(tx_bytes.trim())
        .context("トランザクションのBase64デコードに失敗")
}

fn build_wallet(config: &CliConfig, presence: Arc<dyn UserPresence>) -> anyhow::Result<Wallet> {
    let keystore = SoftwareKeystore::persistent(config.key_dir())
        .context("キーストアを開けません")?;
    tracing::debug!(home = %config.home().display(), "データディレクトリ");

    let enclave = EnclaveService::new(Arc::new(keystore), presence);
    let store = JsonFileIdentityStore::new(config.identity_path());
    let bridge = BridgeClient::from_config(&config.signer)?;
    let provider = SuiRpcProvider::from_config(&config.signer)?;
    let faucet = FaucetClient::from_config(&config.signer)?;

    Ok(Wallet::new(
        Arc::new(SigningOrchestrator::new(enclave)),
        Arc::new(store),
        bridge,
        Arc::new(provider),
        faucet,
    ))
}
