//! # ユーザー存在確認（生体認証）
//!
//! 鍵生成・署名の前に実行されるゲート。プラットフォームの生体認証APIは
//! ユーザーによる拒否とタイムアウトを区別しないため、失敗はすべて
//! `AuthenticationDenied` として扱う。

use async_trait::async_trait;

use crate::keystore::callback::{suspend, Completion};
use crate::EnclaveError;

/// 鍵生成時に表示する理由
pub const GENERATE_REASON: &str = "Authenticate to generate key pair";

/// 署名時に表示する理由
pub const SIGN_REASON: &str = "Authenticate to sign data";

/// ユーザー存在確認のトレイト。
#[async_trait]
pub trait UserPresence: Send + Sync {
    /// 確認を要求する。成功なら `Ok(())`、それ以外は `AuthenticationDenied`。
    async fn authenticate(&self, reason: &str) -> Result<(), EnclaveError>;
}

/// 常に成功する実装。開発・テスト用。
pub struct AlwaysPresent;

#[async_trait]
impl UserPresence for AlwaysPresent {
    async fn authenticate(&self, _reason: &str) -> Result<(), EnclaveError> {
        Ok(())
    }
}

/// 常に拒否する実装。テスト用。
pub struct AlwaysDenied;

#[async_trait]
impl UserPresence for AlwaysDenied {
    async fn authenticate(&self, reason: &str) -> Result<(), EnclaveError> {
        Err(EnclaveError::AuthenticationDenied(reason.to_string()))
    }
}

// ─────────────────────────────────────────────
// 完了コールバック型プラットフォームAPI
// ─────────────────────────────────────────────

/// 完了コールバックで結果を返す生体認証API。
///
/// `done` は成功なら `Ok(())`、拒否・キャンセルなら任意のエラーで完了させる。
pub trait PlatformPresence: Send + Sync {
    fn evaluate_policy(&self, reason: &str, done: Completion<()>);
}

/// [`PlatformPresence`] を [`UserPresence`] として使うアダプタ。
pub struct CallbackPresence<P> {
    platform: P,
}

impl<P> CallbackPresence<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl<P: PlatformPresence> UserPresence for CallbackPresence<P> {
    async fn authenticate(&self, reason: &str) -> Result<(), EnclaveError> {
        suspend(|done| self.platform.evaluate_policy(reason, done))
            .await
            .map_err(|e| match e {
                EnclaveError::AuthenticationDenied(_) => e,
                other => EnclaveError::AuthenticationDenied(other.to_string()),
            })
    }
}
