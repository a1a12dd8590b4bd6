//! # シリアライズ済み署名（ワイヤ形式）
//!
//! ```text
//! [1B: scheme_flag][64B: r ‖ s][33B: compressed_pubkey]  → Base64
//! ```
//!
//! アドレスは `0x ‖ hex(BLAKE2b-256(scheme_flag ‖ compressed_pubkey))`。

use base64::Engine;

use crate::pubkey::{CompressedPublicKey, COMPRESSED_PUBLIC_KEY_LEN};
use crate::signature::{NormalizedSignature, NORMALIZED_SIGNATURE_LEN};
use crate::{b64, blake2b256, CryptoError};

/// 署名スキームのフラグバイト。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SignatureScheme {
    Ed25519 = 0x00,
    Secp256k1 = 0x01,
    Secp256r1 = 0x02,
}

impl SignatureScheme {
    pub const fn flag(self) -> u8 {
        self as u8
    }

    pub fn from_flag(flag: u8) -> Result<Self, CryptoError> {
        match flag {
            0x00 => Ok(Self::Ed25519),
            0x01 => Ok(Self::Secp256k1),
            0x02 => Ok(Self::Secp256r1),
            other => Err(CryptoError::InvalidSerializedSignature(format!(
                "未知のスキームフラグ: 0x{other:02x}"
            ))),
        }
    }
}

/// シリアライズ済み署名の長さ（secp256r1）
pub const SERIALIZED_SIGNATURE_LEN: usize =
    1 + NORMALIZED_SIGNATURE_LEN + COMPRESSED_PUBLIC_KEY_LEN;

/// `scheme_flag ‖ signature ‖ public_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedSignature {
    signature: NormalizedSignature,
    public_key: CompressedPublicKey,
}

impl SerializedSignature {
    pub fn new(signature: NormalizedSignature, public_key: CompressedPublicKey) -> Self {
        Self {
            signature,
            public_key,
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256r1
    }

    pub fn signature(&self) -> &NormalizedSignature {
        &self.signature
    }

    pub fn public_key(&self) -> &CompressedPublicKey {
        &self.public_key
    }

    pub fn to_bytes(&self) -> [u8; SERIALIZED_SIGNATURE_LEN] {
        let mut out = [0u8; SERIALIZED_SIGNATURE_LEN];
        out[0] = self.scheme().flag();
        out[1..1 + NORMALIZED_SIGNATURE_LEN].copy_from_slice(self.signature.as_bytes());
        out[1 + NORMALIZED_SIGNATURE_LEN..].copy_from_slice(self.public_key.as_bytes());
        out
    }

    pub fn to_base64(&self) -> String {
        b64().encode(self.to_bytes())
    }

    /// Base64文字列をパースする。署名は low-S であることも確認する。
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = b64()
            .decode(encoded)
            .map_err(|e| CryptoError::Base64Error(e.to_string()))?;
        if bytes.len() != SERIALIZED_SIGNATURE_LEN {
            return Err(CryptoError::InvalidSerializedSignature(format!(
                "{SERIALIZED_SIGNATURE_LEN}バイトである必要があります: {}バイト",
                bytes.len()
            )));
        }
        let scheme = SignatureScheme::from_flag(bytes[0])?;
        if scheme != SignatureScheme::Secp256r1 {
            return Err(CryptoError::InvalidSerializedSignature(format!(
                "未対応のスキーム: {scheme:?}"
            )));
        }

        let mut raw = [0u8; NORMALIZED_SIGNATURE_LEN];
        raw.copy_from_slice(&bytes[1..1 + NORMALIZED_SIGNATURE_LEN]);
        let signature = NormalizedSignature::normalize(&raw)?;
        if signature.as_bytes() != &raw {
            return Err(CryptoError::InvalidSerializedSignature(
                "署名が low-S 形式ではありません".to_string(),
            ));
        }
        let public_key =
            CompressedPublicKey::from_bytes(&bytes[1 + NORMALIZED_SIGNATURE_LEN..])?;
        Ok(Self::new(signature, public_key))
    }
}

/// 圧縮公開鍵からウォレットアドレスを導出する。
pub fn derive_address(public_key: &CompressedPublicKey) -> String {
    let mut input = Vec::with_capacity(1 + COMPRESSED_PUBLIC_KEY_LEN);
    input.push(SignatureScheme::Secp256r1.flag());
    input.extend_from_slice(public_key.as_bytes());
    format!("0x{}", hex::encode(blake2b256(&input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::{SigningKey, VerifyingKey};

    fn sample_key() -> CompressedPublicKey {
        let sk = SigningKey::random(&mut rand::rngs::OsRng);
        let external = VerifyingKey::from(&sk).to_encoded_point(false);
        CompressedPublicKey::from_external_representation(external.as_bytes()).unwrap()
    }

    fn sample_signature() -> NormalizedSignature {
        let mut raw = [0x01u8; 64];
        raw[32] = 0x00;
        NormalizedSignature::normalize(&raw).unwrap()
    }

    #[test]
    fn test_layout() {
        let key = sample_key();
        let sig = sample_signature();
        let bytes = SerializedSignature::new(sig, key).to_bytes();
        assert_eq!(bytes.len(), 98);
        assert_eq!(bytes[0], 0x02);
        assert_eq!(&bytes[1..65], sig.as_bytes());
        assert_eq!(&bytes[65..], key.as_bytes());
    }

    #[test]
    fn test_base64_parse() {
        let serialized = SerializedSignature::new(sample_signature(), sample_key());
        let parsed = SerializedSignature::from_base64(&serialized.to_base64()).unwrap();
        assert_eq!(parsed, serialized);
    }

    #[test]
    fn test_reject_wrong_scheme_and_length() {
        let serialized = SerializedSignature::new(sample_signature(), sample_key());
        let mut bytes = serialized.to_bytes();
        bytes[0] = 0x00;
        assert!(SerializedSignature::from_base64(&b64().encode(bytes)).is_err());
        assert!(SerializedSignature::from_base64(&b64().encode(&bytes[..97])).is_err());
    }

    #[test]
    fn test_reject_high_s() {
        let serialized = SerializedSignature::new(sample_signature(), sample_key());
        let mut bytes = serialized.to_bytes();
        bytes[33..65].copy_from_slice(&[0xF0; 32]);
        assert!(SerializedSignature::from_base64(&b64().encode(bytes)).is_err());
    }

    #[test]
    fn test_address_format() {
        let key = sample_key();
        let address = derive_address(&key);
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 2 + 64);
        assert_eq!(address, derive_address(&key));
        assert_ne!(address, derive_address(&sample_key()));
    }
}
