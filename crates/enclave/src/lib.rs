//! # BioWallet エンクレーブサービス
//!
//! ハードウェア保護されたキーストアでP-256鍵ペアを生成し、ダイジェストに署名する。
//! 出力はチェーン非依存の形式（33バイト圧縮公開鍵、64バイト low-S 署名）。
//!
//! ## モジュール構成
//! - [`keystore`] — キーストア抽象化と実装（software / callback）
//! - [`presence`] — 鍵操作前のユーザー存在確認
//! - [`service`] — 上記を組み合わせた [`EnclaveService`]
//! - [`error`] — [`EnclaveError`]

pub mod error;
pub mod keystore;
pub mod presence;
pub mod service;

pub use error::EnclaveError;
pub use keystore::{CallbackKeystore, Completion, PlatformKeystore, SecureKeystore, SoftwareKeystore};
pub use presence::{AlwaysDenied, AlwaysPresent, CallbackPresence, PlatformPresence, UserPresence};
pub use service::EnclaveService;
