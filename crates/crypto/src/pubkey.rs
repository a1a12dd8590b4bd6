//! # SEC1 公開鍵圧縮
//!
//! キーストアは公開鍵を非圧縮の外部表現（`0x04 ‖ X ‖ Y`、65バイト）で返す。
//! チェーン側は圧縮形式（`0x02|0x03 ‖ X`、33バイト）を要求する。
//!
//! 圧縮規則: Y が偶数なら `0x02`、奇数なら `0x03`。

use std::fmt;

use base64::Engine;

use crate::{b64, CryptoError};

/// 座標長（X, Y 各32バイト）
pub const COORDINATE_LEN: usize = 32;

/// 圧縮公開鍵長
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 1 + COORDINATE_LEN;

/// 非圧縮外部表現長（ヘッダ含む）
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 1 + 2 * COORDINATE_LEN;

/// 非圧縮点のSEC1ヘッダ
pub const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

const EVEN_Y_TAG: u8 = 0x02;
const ODD_Y_TAG: u8 = 0x03;

/// `X ‖ Y`（64バイト）を33バイトの圧縮形式に変換する。曲線上の点かは確認しない。
pub fn compress_coordinates(xy: &[u8; 2 * COORDINATE_LEN]) -> [u8; COMPRESSED_PUBLIC_KEY_LEN] {
    let (x, y) = xy.split_at(COORDINATE_LEN);
    let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LEN];
    out[0] = if y[COORDINATE_LEN - 1] & 1 == 0 {
        EVEN_Y_TAG
    } else {
        ODD_Y_TAG
    };
    out[1..].copy_from_slice(x);
    out
}

/// P-256 の圧縮公開鍵（33バイト）。
///
/// 構築時に曲線上の点であることを検証する。
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPublicKey([u8; COMPRESSED_PUBLIC_KEY_LEN]);

impl CompressedPublicKey {
    /// キーストアの外部表現（`0x04 ‖ X ‖ Y`）から圧縮公開鍵を作る。
    pub fn from_external_representation(external: &[u8]) -> Result<Self, CryptoError> {
        if external.len() != UNCOMPRESSED_PUBLIC_KEY_LEN {
            return Err(CryptoError::InvalidPublicKey(format!(
                "外部表現は{UNCOMPRESSED_PUBLIC_KEY_LEN}バイトである必要があります: {}バイト",
                external.len()
            )));
        }
        if external[0] != SEC1_UNCOMPRESSED_TAG {
            return Err(CryptoError::InvalidPublicKey(format!(
                "非圧縮ヘッダ(0x04)を期待しましたが0x{:02x}でした",
                external[0]
            )));
        }
        validate_point(external)?;

        let mut xy = [0u8; 2 * COORDINATE_LEN];
        xy.copy_from_slice(&external[1..]);
        Ok(Self(compress_coordinates(&xy)))
    }

    /// 33バイトの圧縮形式から構築する。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; COMPRESSED_PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidPublicKey(format!(
                "圧縮公開鍵は{COMPRESSED_PUBLIC_KEY_LEN}バイトである必要があります: {}バイト",
                bytes.len()
            ))
        })?;
        if arr[0] != EVEN_Y_TAG && arr[0] != ODD_Y_TAG {
            return Err(CryptoError::InvalidPublicKey(format!(
                "圧縮ヘッダ(0x02/0x03)を期待しましたが0x{:02x}でした",
                arr[0]
            )));
        }
        validate_point(&arr)?;
        Ok(Self(arr))
    }

    /// Base64文字列から構築する（Identity Storeの保存形式）。
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = b64()
            .decode(encoded)
            .map_err(|e| CryptoError::Base64Error(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base64(&self) -> String {
        b64().encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for CompressedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedPublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for CompressedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl AsRef<[u8]> for CompressedPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn validate_point(sec1: &[u8]) -> Result<(), CryptoError> {
    p256::PublicKey::from_sec1_bytes(sec1)
        .map(|_| ())
        .map_err(|_| CryptoError::InvalidPublicKey("P-256曲線上の点ではありません".to_string()))
}
