//! # 端末でのユーザー存在確認
//!
//! 鍵操作の前に理由を表示し、`y` の入力で承認する。
//! それ以外の入力・EOFはすべて拒否として扱う。

use std::io::{BufRead, Write};

use async_trait::async_trait;
use biowallet_enclave::{EnclaveError, UserPresence};

/// 標準入力で承認を求める [`UserPresence`] 実装。
pub struct TerminalPresence;

#[async_trait]
impl UserPresence for TerminalPresence {
    async fn authenticate(&self, reason: &str) -> Result<(), EnclaveError> {
        let reason = reason.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{reason} [y/N]: ");
            let _ = stderr.flush();
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await
        .map_err(|e| EnclaveError::AuthenticationDenied(e.to_string()))?
        .map_err(|e| EnclaveError::AuthenticationDenied(e.to_string()))?;

        if is_approval(&answer) {
            Ok(())
        } else {
            Err(EnclaveError::AuthenticationDenied("ユーザーが拒否しました".to_string()))
        }
    }
}

fn is_approval(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes")
}
