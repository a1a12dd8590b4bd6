//! # low-S正規化
//!
//! ECDSA署名 `(r, s)` と `(r, n - s)` はどちらも有効であるため、
//! 検証者が決定的な署名を期待する場合は `s ≤ n/2` に揃える。

use p256::elliptic_curve::bigint::{ArrayEncoding, U256};

use crate::CryptoError;

/// 固定幅スカラー長（P-256）
pub const SCALAR_LEN: usize = 32;

/// secp256r1 の群位数 n
pub const P256_ORDER: U256 =
    U256::from_be_hex("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551");

/// floor(n / 2)
pub const P256_HALF_ORDER: U256 =
    U256::from_be_hex("7FFFFFFF800000007FFFFFFFFFFFFFFFDE737D56D38BCF4279DCE5617E3192A8");

/// ビッグエンディアン整数を32バイトに左ゼロ詰めする。
///
/// 先頭の0x00は数値に影響しないため除去してから幅を判定する。
/// 有効桁が32バイトを超える場合は `MalformedSignature`。
pub fn to_fixed_width(magnitude: &[u8], name: &str) -> Result<[u8; SCALAR_LEN], CryptoError> {
    let first_nonzero = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let significant = &magnitude[first_nonzero..];
    if significant.len() > SCALAR_LEN {
        return Err(CryptoError::MalformedSignature(format!(
            "{name} の有効桁が{}バイトあります（上限{SCALAR_LEN}バイト）",
            significant.len()
        )));
    }

    let mut out = [0u8; SCALAR_LEN];
    out[SCALAR_LEN - significant.len()..].copy_from_slice(significant);
    Ok(out)
}

/// `s` を low-S 形式に変換する。
///
/// `s > n/2` なら `n - s` を返し、それ以外はそのまま返す。
/// ECDSAのスカラーは `1 ≤ s < n` のため、`s = 0` と `s ≥ n` は `MalformedSignature`。
pub fn normalize_s(s: &[u8; SCALAR_LEN]) -> Result<[u8; SCALAR_LEN], CryptoError> {
    let value = U256::from_be_slice(s);
    if value == U256::ZERO {
        return Err(CryptoError::MalformedSignature("s が0です".to_string()));
    }
    if value >= P256_ORDER {
        return Err(CryptoError::MalformedSignature(
            "s が群位数以上です".to_string(),
        ));
    }
    if value <= P256_HALF_ORDER {
        return Ok(*s);
    }

    let negated = P256_ORDER.wrapping_sub(&value);
    let mut out = [0u8; SCALAR_LEN];
    out.copy_from_slice(&negated.to_be_byte_array());
    Ok(out)
}

/// `s ≤ n/2` であるかを判定する。
pub fn is_low_s(s: &[u8; SCALAR_LEN]) -> bool {
    U256::from_be_slice(s) <= P256_HALF_ORDER
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::elliptic_curve::Curve;
    use p256::NistP256;

    fn order_bytes() -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&P256_ORDER.to_be_byte_array());
        out
    }

    #[test]
    fn test_order_constants_match_curve() {
        assert_eq!(P256_ORDER, NistP256::ORDER);
        assert_eq!(P256_HALF_ORDER, P256_ORDER.shr_vartime(1));
    }

    #[test]
    fn test_to_fixed_width_pads_short_values() {
        let out = to_fixed_width(&[0x01, 0x02], "r").unwrap();
        assert_eq!(&out[..30], &[0u8; 30]);
        assert_eq!(&out[30..], &[0x01, 0x02]);
    }

    #[test]
    fn test_to_fixed_width_strips_der_padding() {
        let mut padded = vec![0x00];
        padded.extend_from_slice(&[0xAB; 32]);
        assert_eq!(to_fixed_width(&padded, "s").unwrap(), [0xAB; 32]);
    }

    #[test]
    fn test_to_fixed_width_rejects_wide_values() {
        let wide = [0x01u8; 33];
        assert!(matches!(
            to_fixed_width(&wide, "r"),
            Err(CryptoError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_normalize_high_s() {
        // s = n - 1 → n - (n - 1) = 1
        let mut s = order_bytes();
        s[31] -= 1;
        let normalized = normalize_s(&s).unwrap();
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(normalized, one);
        assert!(is_low_s(&normalized));
    }

    #[test]
    fn test_normalize_keeps_low_s() {
        let mut s = [0u8; 32];
        s[31] = 7;
        assert_eq!(normalize_s(&s).unwrap(), s);
    }

    /// 境界値: n/2 はそのまま、n/2 + 1 は n - (n/2 + 1) = n/2 になる
    #[test]
    fn test_normalize_half_order_boundary() {
        let mut half = [0u8; 32];
        half.copy_from_slice(&P256_HALF_ORDER.to_be_byte_array());
        assert_eq!(normalize_s(&half).unwrap(), half);

        let mut above = [0u8; 32];
        above.copy_from_slice(&P256_HALF_ORDER.wrapping_add(&U256::ONE).to_be_byte_array());
        assert_eq!(normalize_s(&above).unwrap(), half);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut s = order_bytes();
        s[20] = 0x10;
        let once = normalize_s(&s).unwrap();
        let twice = normalize_s(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_rejects_s_at_or_above_order() {
        assert!(normalize_s(&order_bytes()).is_err());
        assert!(normalize_s(&[0xFF; 32]).is_err());
    }

    #[test]
    fn test_normalize_rejects_zero_s() {
        assert!(matches!(
            normalize_s(&[0u8; 32]),
            Err(CryptoError::MalformedSignature(_))
        ));
    }
}
