//! Fixed-length byte values.
//!
//! [`ByteValue`] is the primitive every decoded field is expressed in. Its
//! length never changes after construction; every operation returns a new
//! value and leaves its inputs untouched.

use mrtd_bignum::BigNum;
use mrtd_types::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An immutable, fixed-length octet sequence.
///
/// Ordering is lexicographic; when one value is a prefix of the other the
/// shorter one sorts first. The buffer is wiped on drop since DG1 and
/// signatures flow through this type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Zeroize, ZeroizeOnDrop)]
pub struct ByteValue {
    bytes: Vec<u8>,
}

impl ByteValue {
    /// Wrap a byte vector.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Copy a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }

    /// Minimal big-endian encoding of an unsigned integer (zero is `[0x00]`).
    pub fn from_integer(value: &BigNum) -> Self {
        Self::new(value.to_bytes_be())
    }

    /// Parse a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() % 2 != 0 {
            return Err(CryptoError::InvalidEncoding(format!(
                "odd-length hex string ({} digits)",
                digits.len()
            )));
        }
        let bytes = digits
            .as_bytes()
            .chunks_exact(2)
            .map(|pair| Ok((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?))
            .collect::<Result<Vec<u8>, CryptoError>>()?;
        Ok(Self::new(bytes))
    }

    /// Interpret text as a decimal integer if it is one, else as ASCII.
    pub fn from_text(s: &str) -> Result<Self, CryptoError> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Self::from_integer(&BigNum::from_dec_str(s)?));
        }
        if !s.is_ascii() {
            return Err(CryptoError::InvalidEncoding("text is not ASCII".into()));
        }
        Ok(Self::from_slice(s.as_bytes()))
    }

    /// Build from a list of integers, each of which must be a byte.
    pub fn from_ints(values: &[i64]) -> Result<Self, CryptoError> {
        let bytes = values
            .iter()
            .map(|&v| {
                u8::try_from(v)
                    .map_err(|_| CryptoError::InvalidEncoding(format!("byte value {v} out of range")))
            })
            .collect::<Result<Vec<u8>, CryptoError>>()?;
        Ok(Self::new(bytes))
    }

    /// Decode standard padded Base64.
    pub fn from_base64(s: &str) -> Result<Self, CryptoError> {
        crate::base64::decode(s).map(Self::new)
    }

    /// Big-endian unsigned integer value.
    pub fn to_integer(&self) -> BigNum {
        BigNum::from_bytes_be(&self.bytes)
    }

    /// Borrow the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy the bytes out.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Lowercase, `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(2 + self.bytes.len() * 2);
        out.push_str("0x");
        for b in &self.bytes {
            out.push(HEX_DIGITS[(b >> 4) as usize] as char);
            out.push(HEX_DIGITS[(b & 0x0F) as usize] as char);
        }
        out
    }

    /// Standard padded Base64.
    pub fn to_base64(&self) -> String {
        crate::base64::encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sub-range with Python slice semantics: negative indices count from
    /// the end and out-of-range indices clamp.
    pub fn slice(&self, start: i64, end: i64) -> Self {
        let len = self.bytes.len() as i64;
        let clamp = |i: i64| -> usize {
            let i = if i < 0 { i + len } else { i };
            i.clamp(0, len) as usize
        };
        let (s, e) = (clamp(start), clamp(end));
        if s >= e {
            return Self::default();
        }
        Self::from_slice(&self.bytes[s..e])
    }

    /// Slice from `start` to the end.
    pub fn slice_from(&self, start: i64) -> Self {
        self.slice(start, self.bytes.len() as i64)
    }

    /// `self ‖ other`.
    pub fn concat(&self, other: &ByteValue) -> Self {
        let mut bytes = Vec::with_capacity(self.len() + other.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&other.bytes);
        Self::new(bytes)
    }

    fn zip_with(&self, other: &ByteValue, f: impl Fn(u8, u8) -> u8) -> Result<Self, CryptoError> {
        if self.len() != other.len() {
            return Err(CryptoError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(Self::new(
            self.bytes
                .iter()
                .zip(&other.bytes)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    /// Bitwise XOR of equal-length values.
    pub fn xor(&self, other: &ByteValue) -> Result<Self, CryptoError> {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Bitwise AND of equal-length values.
    pub fn and(&self, other: &ByteValue) -> Result<Self, CryptoError> {
        self.zip_with(other, |a, b| a & b)
    }

    /// Bitwise OR of equal-length values.
    pub fn or(&self, other: &ByteValue) -> Result<Self, CryptoError> {
        self.zip_with(other, |a, b| a | b)
    }

    /// Bitwise complement.
    pub fn not(&self) -> Self {
        Self::new(self.bytes.iter().map(|b| !b).collect())
    }

    /// Left-pad with `fill` up to `target` bytes. No-op if already long enough.
    pub fn pad_start(&self, target: usize, fill: u8) -> Self {
        if self.len() >= target {
            return self.clone();
        }
        let mut bytes = vec![fill; target - self.len()];
        bytes.extend_from_slice(&self.bytes);
        Self::new(bytes)
    }

    /// Right-pad with `fill` up to `target` bytes. No-op if already long enough.
    pub fn pad_end(&self, target: usize, fill: u8) -> Self {
        if self.len() >= target {
            return self.clone();
        }
        let mut bytes = self.bytes.clone();
        bytes.resize(target, fill);
        Self::new(bytes)
    }

    /// Offset of the first occurrence of `needle`, if any.
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len() {
            return None;
        }
        self.bytes.windows(needle.len()).position(|w| w == needle)
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn hex_digit(c: u8) -> Result<u8, CryptoError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(CryptoError::InvalidEncoding(format!(
            "invalid hex digit {:?}",
            c as char
        ))),
    }
}

impl From<Vec<u8>> for ByteValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteValue {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for ByteValue {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq<[u8]> for ByteValue {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl std::fmt::Display for ByteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for ByteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteValue({})", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ByteValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ByteValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ByteValue::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
