//! # ECDSA署名のDERデコード
//!
//! キーストアが返すASN.1 DER形式の署名から `r`, `s` を取り出す。
//!
//! ```text
//! 30 <len> 02 <len_r> <r...> 02 <len_s> <s...>
//! ```
//!
//! 長さは short form（上位ビット0）と long form（`0x80 | n` の後にnバイト、
//! ビッグエンディアン）の両方に対応する。INTEGERは先頭に0x00パディングを
//! 含む場合があるため固定幅を仮定しない。

use crate::CryptoError;

/// ASN.1 SEQUENCEタグ
pub const SEQUENCE_TAG: u8 = 0x30;

/// ASN.1 INTEGERタグ
pub const INTEGER_TAG: u8 = 0x02;

/// long formの長さバイト数の上限（usizeに収まる範囲）
const MAX_LENGTH_OF_LENGTH: usize = 4;

/// DERから取り出した `r`, `s` の生バイト列。
///
/// いずれもビッグエンディアンの符号なし整数として解釈する。
/// 先頭のゼロパディングは除去していない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerComponents<'a> {
    pub r: &'a [u8],
    pub s: &'a [u8],
}

/// DER署名をデコードする。
///
/// SEQUENCEの宣言長がバッファを超える場合、SEQUENCE内に余剰バイトが残る場合、
/// SEQUENCEの後ろにバイトが続く場合はいずれも `MalformedSignature`。
pub fn decode_der_signature(der: &[u8]) -> Result<DerComponents<'_>, CryptoError> {
    let mut outer = DerReader::new(der);
    outer.expect_tag(SEQUENCE_TAG, "SEQUENCE")?;
    let seq_len = outer.read_length()?;
    let body = outer.read_bytes(seq_len)?;
    if !outer.is_empty() {
        return Err(malformed(format!(
            "SEQUENCEの後ろに{}バイトの余剰データがあります",
            outer.remaining()
        )));
    }

    let mut inner = DerReader::new(body);
    let r = inner.read_integer("r")?;
    let s = inner.read_integer("s")?;
    if !inner.is_empty() {
        return Err(malformed(format!(
            "SEQUENCE内に{}バイトの余剰データがあります",
            inner.remaining()
        )));
    }

    Ok(DerComponents { r, s })
}

// ─────────────────────────────────────────────
// 内部実装
// ─────────────────────────────────────────────

fn malformed(msg: impl Into<String>) -> CryptoError {
    CryptoError::MalformedSignature(msg.into())
}

/// バイト列を先頭から消費するDERリーダー。
struct DerReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> DerReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn read_byte(&mut self) -> Result<u8, CryptoError> {
        let byte = *self
            .data
            .get(self.offset)
            .ok_or_else(|| malformed(format!("オフセット{}でバッファが終端に達しました", self.offset)))?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CryptoError> {
        if len > self.remaining() {
            return Err(malformed(format!(
                "長さ{}が残りバイト数{}を超えています",
                len,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn expect_tag(&mut self, tag: u8, name: &str) -> Result<(), CryptoError> {
        let actual = self.read_byte()?;
        if actual != tag {
            return Err(malformed(format!(
                "{name}タグ(0x{tag:02x})を期待しましたが0x{actual:02x}でした"
            )));
        }
        Ok(())
    }

    fn read_length(&mut self) -> Result<usize, CryptoError> {
        let first = self.read_byte()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }

        let length_of_length = (first & 0x7F) as usize;
        // 0x80 は不定長形式。DERでは使用されない
        if length_of_length == 0 {
            return Err(malformed("不定長形式の長さは使用できません"));
        }
        if length_of_length > MAX_LENGTH_OF_LENGTH {
            return Err(malformed(format!(
                "長さフィールドが長すぎます: {length_of_length}バイト"
            )));
        }

        let mut length = 0usize;
        for _ in 0..length_of_length {
            length = (length << 8) | self.read_byte()? as usize;
        }
        Ok(length)
    }

    fn read_integer(&mut self, name: &str) -> Result<&'a [u8], CryptoError> {
        self.expect_tag(INTEGER_TAG, "INTEGER")?;
        let len = self.read_length()?;
        if len == 0 {
            return Err(malformed(format!("INTEGER {name} の長さが0です")));
        }
        self.read_bytes(len)
    }
}
