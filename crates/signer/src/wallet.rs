//! # ウォレットセッション
//!
//! サインイン・サインアウト、ブリッジ送金、ドライラン、フォーセットをまとめる。
//!
//! ## サインイン
//! 1. Identity Storeからユーザー名のレコードを取得
//! 2. あれば `{tag, publicKey}` からハンドルを復元してアクティブにする
//! 3. なければ新しい鍵ペアを生成してIdentity Storeに保存し、保存できた場合のみアクティブにする
//!
//! ## ブリッジ送金
//! 1. ブリッジサービスから未署名トランザクションを取得
//! 2. トランザクションプリイメージとして署名
//! 3. チェーンプロバイダで実行し、`effects.status.error` があれば失敗とする
//!
//! ドライランは署名もアイデンティティも必要としない。結果の `effects.status.error` は
//! 呼び出し元が判断する。

use std::sync::Arc;

use base64::Engine;

use biowallet_crypto::b64;
use biowallet_types::{
    DryRunResponse, ExecutionResponse, FaucetCoinInfo, PrepareTransactionBlockRequest,
    StoredIdentity,
};

use crate::bridge::BridgeClient;
use crate::error::SignerError;
use crate::faucet::FaucetClient;
use crate::identity_store::IdentityStore;
use crate::orchestrator::{KeyHandle, SigningOrchestrator};
use crate::provider::ChainProvider;

/// ブリッジ送金のパラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTransfer {
    /// 送金先チェーン名
    pub recipient_chain: String,
    /// 送金先チェーン上の受取アドレス
    pub receiver_address: String,
    /// 送金額（十進文字列）
    pub amount: String,
}

/// ウォレットセッション。
pub struct Wallet {
    orchestrator: Arc<SigningOrchestrator>,
    store: Arc<dyn IdentityStore>,
    bridge: BridgeClient,
    provider: Arc<dyn ChainProvider>,
    faucet: FaucetClient,
}

impl Wallet {
    pub fn new(
        orchestrator: Arc<SigningOrchestrator>,
        store: Arc<dyn IdentityStore>,
        bridge: BridgeClient,
        provider: Arc<dyn ChainProvider>,
        faucet: FaucetClient,
    ) -> Self {
        Self {
            orchestrator,
            store,
            bridge,
            provider,
            faucet,
        }
    }

    pub fn orchestrator(&self) -> &SigningOrchestrator {
        &self.orchestrator
    }

    /// `username` でサインインする。未登録なら新しいアイデンティティを作成して保存する。
    ///
    /// 保存に失敗した場合、それまでのアクティブなアイデンティティはそのまま残る。
    pub async fn sign_in(&self, username: &str) -> Result<Arc<KeyHandle>, SignerError> {
        if let Some(handle) = self.restore(username).await? {
            return Ok(handle);
        }

        let handle = self.orchestrator.generate_identity().await?;
        let record = StoredIdentity {
            tag: handle.tag.clone(),
            public_key: handle.public_key.to_base64(),
        };
        self.store.put(username, record).await?;
        tracing::info!(username, tag = %handle.tag, "新しいアイデンティティでサインアップしました");
        Ok(self.orchestrator.set_active_identity(handle))
    }

    /// 保存済みのアイデンティティでのみサインインする。未登録なら `IdentityNotSet`。
    pub async fn resume(&self, username: &str) -> Result<Arc<KeyHandle>, SignerError> {
        self.restore(username).await?.ok_or(SignerError::IdentityNotSet)
    }

    /// サインアウトする。アクティブなアイデンティティを解除する。
    pub fn sign_out(&self) {
        self.orchestrator.clear_identity();
    }

    /// ブリッジサービス経由で送金する。
    pub async fn bridge_transfer(
        &self,
        transfer: &BridgeTransfer,
    ) -> Result<ExecutionResponse, SignerError> {
        let sender_address = self.orchestrator.address()?;
        let request = PrepareTransactionBlockRequest {
            recipient_chain: transfer.recipient_chain.clone(),
            sender_address,
            receiver_address: transfer.receiver_address.clone(),
            amount_to_send: transfer.amount.clone(),
        };

        let tx_bytes = self.bridge.prepare_transaction_block(&request).await?;
        let signed = self.orchestrator.sign_transaction_preimage(&tx_bytes).await?;
        let result = self
            .provider
            .execute_transaction_block(&signed.tx_bytes_b64, &signed.signature)
            .await?;

        if let Some(err) = result.error() {
            return Err(SignerError::Provider(format!(
                "トランザクションの実行に失敗 (digest {}): {err}",
                result.digest
            )));
        }
        Ok(result)
    }

    /// 未署名トランザクションの実行をシミュレートする。
    pub async fn dry_run_transaction_block(
        &self,
        tx_bytes: &[u8],
    ) -> Result<DryRunResponse, SignerError> {
        self.provider
            .dry_run_transaction_block(&b64().encode(tx_bytes))
            .await
    }

    /// アクティブなアイデンティティのアドレスへフォーセットからガスを受け取る。
    pub async fn request_faucet(&self) -> Result<FaucetCoinInfo, SignerError> {
        let address = self.orchestrator.address()?;
        self.faucet.request_gas(&address).await
    }

    // ─── 内部関数 ───

    async fn restore(&self, username: &str) -> Result<Option<Arc<KeyHandle>>, SignerError> {
        let Some(stored) = self.store.get(username).await? else {
            return Ok(None);
        };
        let handle = KeyHandle::from_stored(stored.tag, &stored.public_key)?;
        tracing::info!(username, tag = %handle.tag, "保存済みのアイデンティティでサインインしました");
        Ok(Some(self.orchestrator.set_active_identity(handle)))
    }
}
