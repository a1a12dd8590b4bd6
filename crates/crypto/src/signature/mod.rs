//! # ECDSA P-256 署名の正規化
//!
//! キーストアのDER出力を、64バイト固定長 `r ‖ s`（low-S）に変換する。
//!
//! ## 処理手順
//! 1. DERをデコードして `r`, `s` を取り出す（[`der`]）
//! 2. 各成分を32バイトに左ゼロ詰め
//! 3. `s > n/2` なら `s = n - s`（[`low_s`]）
//!
//! `r` や復元用パリティは変更しない。公開鍵を署名から復元する用途では
//! この形式は不十分である。

pub mod der;
pub mod low_s;

use std::fmt;

use crate::CryptoError;

pub use low_s::{P256_HALF_ORDER, P256_ORDER, SCALAR_LEN};

/// 正規化済み署名の長さ（`r` 32バイト + `s` 32バイト）
pub const NORMALIZED_SIGNATURE_LEN: usize = 2 * SCALAR_LEN;

/// low-S正規化済みのECDSA署名（`r ‖ s`、各32バイトのビッグエンディアン）。
///
/// 不変条件: `s ≤ n/2`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSignature([u8; NORMALIZED_SIGNATURE_LEN]);

impl NormalizedSignature {
    /// DER署名をデコードし、正規化する。
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let components = der::decode_der_signature(der)?;
        let r = low_s::to_fixed_width(components.r, "r")?;
        let s = low_s::to_fixed_width(components.s, "s")?;
        Self::from_components(&r, &s)
    }

    /// 固定幅の `r`, `s` から正規化済み署名を構築する。
    ///
    /// `r = 0` は有効なECDSA署名になり得ないため `MalformedSignature`。
    /// `r < n` は確認しない。
    pub fn from_components(
        r: &[u8; SCALAR_LEN],
        s: &[u8; SCALAR_LEN],
    ) -> Result<Self, CryptoError> {
        if r.iter().all(|&b| b == 0) {
            return Err(CryptoError::MalformedSignature("r が0です".to_string()));
        }
        let s = low_s::normalize_s(s)?;
        let mut bytes = [0u8; NORMALIZED_SIGNATURE_LEN];
        bytes[..SCALAR_LEN].copy_from_slice(r);
        bytes[SCALAR_LEN..].copy_from_slice(&s);
        Ok(Self(bytes))
    }

    /// 64バイトの `r ‖ s` を正規化する。既に low-S であれば入力と同一。
    pub fn normalize(raw: &[u8; NORMALIZED_SIGNATURE_LEN]) -> Result<Self, CryptoError> {
        let (r, s) = raw.split_at(SCALAR_LEN);
        let mut r_fixed = [0u8; SCALAR_LEN];
        let mut s_fixed = [0u8; SCALAR_LEN];
        r_fixed.copy_from_slice(r);
        s_fixed.copy_from_slice(s);
        Self::from_components(&r_fixed, &s_fixed)
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_LEN]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8; NORMALIZED_SIGNATURE_LEN] {
        &self.0
    }
}

impl fmt::Debug for NormalizedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedSignature")
            .field("r", &hex::encode(self.r()))
            .field("s", &hex::encode(self.s()))
            .finish()
    }
}

impl AsRef<[u8]> for NormalizedSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
    use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
    use p256::elliptic_curve::bigint::{ArrayEncoding, U256};

    fn order_minus(k: u64) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&P256_ORDER.wrapping_sub(&U256::from_u64(k)).to_be_byte_array());
        out
    }

    fn der_encode(r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut body = vec![der::INTEGER_TAG, r.len() as u8];
        body.extend_from_slice(r);
        body.extend_from_slice(&[der::INTEGER_TAG, s.len() as u8]);
        body.extend_from_slice(s);
        let mut out = vec![der::SEQUENCE_TAG, body.len() as u8];
        out.extend_from_slice(&body);
        out
    }

    /// `30 44 02 20 <r: FF×32> 02 20 <s: n-1>` → s = 1
    #[test]
    fn test_known_der_with_high_s_vector() {
        let r = [0xFFu8; 32];
        let s = order_minus(1);
        let der = der_encode(&r, &s);
        assert_eq!(&der[..4], &[0x30, 0x44, 0x02, 0x20]);

        let sig = NormalizedSignature::from_der(&der).unwrap();
        assert_eq!(sig.r(), &r);
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(sig.s(), &one);
    }

    /// 1〜33バイトの成分（DERパディングの有無を含む）で数値が保存される
    #[test]
    fn test_der_components_roundtrip_numeric_value() {
        for len in 1..=32usize {
            let mut r = vec![0x5Au8; len];
            r[0] = 0x01;
            let mut s = vec![0x00u8];
            s.extend(std::iter::repeat(0x80u8).take(len));
            // s は len バイトで上位ビットが立つため0x00パディング付き
            let s_value = &s[1..];
            let sig = NormalizedSignature::from_der(&der_encode(&r, &s)).unwrap();

            let r_expected = low_s::to_fixed_width(&r, "r").unwrap();
            assert_eq!(sig.r(), &r_expected);

            let s_fixed = low_s::to_fixed_width(s_value, "s").unwrap();
            let s_expected = low_s::normalize_s(&s_fixed).unwrap();
            assert_eq!(sig.s(), &s_expected);
        }
    }

    #[test]
    fn test_normalize_idempotent_on_low_s() {
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&[0x42; 32]);
        raw[63] = 9;
        let once = NormalizedSignature::normalize(&raw).unwrap();
        assert_eq!(once.as_bytes(), &raw);
        let twice = NormalizedSignature::normalize(once.as_bytes()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_negates_high_s() {
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&[0x42; 32]);
        raw[32..].copy_from_slice(&order_minus(5));
        let sig = NormalizedSignature::normalize(&raw).unwrap();
        let mut five = [0u8; 32];
        five[31] = 5;
        assert_eq!(sig.s(), &five);
        assert!(low_s::is_low_s(&five));
    }

    #[test]
    fn test_malformed_der_is_rejected() {
        assert!(matches!(
            NormalizedSignature::from_der(&[0x30, 0x02, 0x02]),
            Err(CryptoError::MalformedSignature(_))
        ));
    }

    /// `INTEGER 0`（DER上は1バイトの0x00）の成分は拒否される
    #[test]
    fn test_zero_components_are_rejected() {
        let one = [0x01u8];
        assert!(matches!(
            NormalizedSignature::from_der(&der_encode(&[0x00], &one)),
            Err(CryptoError::MalformedSignature(_))
        ));
        assert!(matches!(
            NormalizedSignature::from_der(&der_encode(&one, &[0x00])),
            Err(CryptoError::MalformedSignature(_))
        ));
        assert!(NormalizedSignature::from_der(&der_encode(&one, &one)).is_ok());
    }

    /// 実鍵で作ったhigh-S署名を正規化しても検証が通る
    #[test]
    fn test_normalized_signature_still_verifies() {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let digest = [0x24u8; 32];

        let sig: Signature = signing_key.sign_prehash(&digest).unwrap();
        let (r, s) = sig.split_bytes();
        let mut s_fixed = [0u8; 32];
        s_fixed.copy_from_slice(&s);
        // 意図的に high-S 側へ反転させたDERを作る
        let high_s = if low_s::is_low_s(&s_fixed) {
            let mut out = [0u8; 32];
            out.copy_from_slice(
                &P256_ORDER
                    .wrapping_sub(&U256::from_be_slice(&s_fixed))
                    .to_be_byte_array(),
            );
            out
        } else {
            s_fixed
        };

        let normalized = NormalizedSignature::from_der(&der_encode(&r, &high_s)).unwrap();
        assert!(low_s::is_low_s(normalized.s().try_into().unwrap()));

        let restored = Signature::from_slice(normalized.as_bytes()).unwrap();
        assert!(verifying_key.verify_prehash(&digest, &restored).is_ok());
    }
}
