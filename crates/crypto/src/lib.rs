//! # BioWallet 暗号処理
//!
//! エンクレーブ署名サブシステムが使用する純粋関数群を提供する。
//! ハードウェアキーストアには依存せず、入出力はすべてバイト列。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 署名 | ECDSA P-256 (secp256r1)、low-S正規化 |
//! | 署名出力のデコード | ASN.1 DER (SEQUENCE of INTEGER r, s) |
//! | 公開鍵 | SEC1 圧縮形式（33バイト） |
//! | ダイジェスト | BLAKE2b-256 |
//! | ワイヤ形式 | `scheme_flag ‖ r ‖ s ‖ compressed_pubkey`（Base64） |

pub mod intent;
pub mod pubkey;
pub mod signature;
pub mod wire;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

pub use intent::{Intent, IntentScope};
pub use pubkey::CompressedPublicKey;
pub use signature::NormalizedSignature;
pub use wire::{SerializedSignature, SignatureScheme};

/// 暗号処理のエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// DER署名の構造が不正（タグ不一致、長さフィールドの欠落、バッファ不足）
    #[error("DER署名のデコードに失敗: {0}")]
    MalformedSignature(String),
    /// 公開鍵の形式が不正
    #[error("不正な公開鍵: {0}")]
    InvalidPublicKey(String),
    /// 1バイト長プレフィックスで表現できないペイロード
    #[error("ペイロードサイズが上限を超えています: {size} bytes (上限: {limit} bytes)")]
    PayloadTooLarge { size: usize, limit: usize },
    /// シリアライズ済み署名の形式が不正
    #[error("不正なシリアライズ済み署名: {0}")]
    InvalidSerializedSignature(String),
    /// Base64デコードに失敗
    #[error("Base64デコードに失敗: {0}")]
    Base64Error(String),
}

/// ダイジェスト長（BLAKE2b-256の出力、署名対象）
pub const DIGEST_LEN: usize = 32;

/// 署名対象ダイジェスト（32バイト）
pub type Digest32 = [u8; DIGEST_LEN];

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b-256ハッシュ計算。
pub fn blake2b256(data: &[u8]) -> Digest32 {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; DIGEST_LEN];
    hash.copy_from_slice(&result);
    hash
}

/// Base64エンジン（Standard）
pub fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 出力長32バイトの既知ベクタ
    #[test]
    fn test_blake2b256_empty_vector() {
        assert_eq!(
            hex::encode(blake2b256(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn test_blake2b256_abc_vector() {
        assert_eq!(
            hex::encode(blake2b256(b"abc")),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }
}
