//! Unsigned big number type and conversions.

use mrtd_types::CryptoError;

/// Limb type for big number representation.
pub type Limb = u64;
/// Double-width type for multiplication intermediates.
pub type DoubleLimb = u128;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// Largest power of ten that fits in a limb, used for decimal conversion.
const DEC_CHUNK: u64 = 10_000_000_000_000_000_000;
const DEC_CHUNK_DIGITS: usize = 19;

/// A heap-allocated arbitrary-precision unsigned integer.
///
/// Internally represented as a little-endian array of `u64` limbs. The
/// representation is always normalized: at least one limb, and no zero
/// limbs above the most significant non-zero one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigNum {
    /// Little-endian limbs (limbs[0] is the least significant).
    limbs: Vec<Limb>,
}

impl BigNum {
    /// Create a zero-valued BigNum.
    pub fn zero() -> Self {
        Self { limbs: vec![0] }
    }

    /// Create a BigNum equal to one.
    pub fn one() -> Self {
        Self { limbs: vec![1] }
    }

    /// Create a BigNum from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        Self { limbs: vec![value] }
    }

    /// Create `2^exp`.
    pub fn power_of_two(exp: usize) -> Self {
        let mut bn = Self::zero();
        bn.set_bit(exp);
        bn
    }

    /// Create a BigNum from a vector of little-endian limbs.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        let mut bn = Self {
            limbs: if limbs.is_empty() { vec![0] } else { limbs },
        };
        bn.normalize();
        bn
    }

    /// Create a BigNum from big-endian bytes. Leading zero bytes are ignored.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }

        let num_limbs = bytes.len().div_ceil(8);
        let mut limbs = vec![0u64; num_limbs];

        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }

        Self::from_limbs(limbs)
    }

    /// Export to minimal big-endian bytes. Zero encodes as a single `0x00`.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let num_bytes = self.byte_len();
        if num_bytes == 0 {
            return vec![0];
        }
        self.write_be(num_bytes)
    }

    /// Export to exactly `len` big-endian bytes, left-padded with zeros.
    pub fn to_bytes_be_padded(&self, len: usize) -> Result<Vec<u8>, CryptoError> {
        let need = self.byte_len();
        if need > len {
            return Err(CryptoError::BufferTooSmall { need, got: len });
        }
        Ok(self.write_be(len))
    }

    fn write_be(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        for i in 0..len.min(self.limbs.len() * 8) {
            bytes[len - 1 - i] = (self.limbs[i / 8] >> ((i % 8) * 8)) as u8;
        }
        bytes
    }

    /// Parse an unsigned decimal string.
    pub fn from_dec_str(s: &str) -> Result<Self, CryptoError> {
        if s.is_empty() {
            return Err(CryptoError::InvalidEncoding("empty decimal string".into()));
        }
        let mut acc = Self::zero();
        for c in s.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| CryptoError::InvalidEncoding(format!("non-decimal digit {c:?}")))?;
            acc = acc.mul_small(10).add_small(digit as u64);
        }
        Ok(acc)
    }

    /// Format as an unsigned decimal string.
    pub fn to_dec_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut chunks = Vec::new();
        let mut cur = self.clone();
        while !cur.is_zero() {
            let (q, r) = cur.div_rem_small(DEC_CHUNK);
            chunks.push(r);
            cur = q;
        }
        let mut out = String::new();
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                out.push_str(&chunk.to_string());
            } else {
                out.push_str(&format!("{chunk:0width$}", width = DEC_CHUNK_DIGITS));
            }
        }
        out
    }

    /// Return the value as `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.limbs.len() == 1 {
            Some(self.limbs[0])
        } else {
            None
        }
    }

    /// Return the number of significant bits.
    pub fn bit_len(&self) -> usize {
        let top = self.limbs.len() - 1;
        let top_limb = self.limbs[top];
        if top_limb == 0 {
            return 0;
        }
        top * LIMB_BITS + (LIMB_BITS - top_limb.leading_zeros() as usize)
    }

    /// Return the number of significant bytes (zero has none).
    pub fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8)
    }

    /// Return the number of limbs.
    pub fn num_limbs(&self) -> usize {
        self.limbs.len()
    }

    /// Return true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 0
    }

    /// Return true if this number equals 1.
    pub fn is_one(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 1
    }

    /// Return the limbs as a slice.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Get bit at position `idx` (0-indexed from LSB).
    pub fn get_bit(&self, idx: usize) -> bool {
        let limb_idx = idx / LIMB_BITS;
        limb_idx < self.limbs.len() && (self.limbs[limb_idx] >> (idx % LIMB_BITS)) & 1 == 1
    }

    /// Set bit at position `idx` (0-indexed from LSB).
    pub fn set_bit(&mut self, idx: usize) {
        let limb_idx = idx / LIMB_BITS;
        if limb_idx >= self.limbs.len() {
            self.limbs.resize(limb_idx + 1, 0);
        }
        self.limbs[limb_idx] |= 1u64 << (idx % LIMB_BITS);
    }

    /// Mutable limb access for in-crate arithmetic. Callers must
    /// re-normalize.
    pub(crate) fn limbs_mut(&mut self) -> &mut Vec<Limb> {
        &mut self.limbs
    }

    /// Remove leading zero limbs.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.len() > 1 && self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
        if self.limbs.is_empty() {
            self.limbs.push(0);
        }
    }
}

impl Default for BigNum {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for BigNum {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl std::fmt::Debug for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BigNum({self:#x})")
    }
}

impl std::fmt::Display for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_dec_string())
    }
}

impl std::fmt::LowerHex for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex: String = self
            .to_bytes_be()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&hex)
    }
}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Normalized representations: more limbs means larger.
        self.limbs
            .len()
            .cmp(&other.limbs.len())
            .then_with(|| self.limbs.iter().rev().cmp(other.limbs.iter().rev()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        let z = BigNum::zero();
        assert!(z.is_zero());
        assert_eq!(z.bit_len(), 0);
        assert_eq!(z.byte_len(), 0);
        assert_eq!(z.to_bytes_be(), vec![0]);
    }

    #[test]
    fn test_from_u64() {
        let n = BigNum::from_u64(0xFF);
        assert_eq!(n.bit_len(), 8);
        assert!(!n.is_zero());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let bytes = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let n = BigNum::from_bytes_be(&bytes);
        assert_eq!(n.to_bytes_be(), bytes);
    }

    #[test]
    fn test_leading_zero_bytes_ignored() {
        let n = BigNum::from_bytes_be(&[0x00, 0x00, 0xde, 0xad]);
        assert_eq!(n, BigNum::from_u64(0xdead));
        assert_eq!(n.num_limbs(), 1);
    }

    #[test]
    fn test_padded_export() {
        let n = BigNum::from_u64(0x0102);
        assert_eq!(n.to_bytes_be_padded(4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(
            n.to_bytes_be_padded(1),
            Err(CryptoError::BufferTooSmall { need: 2, got: 1 })
        );
        assert_eq!(BigNum::zero().to_bytes_be_padded(2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_decimal_roundtrip() {
        let s = "340282366920938463463374607431768211457"; // 2^128 + 1
        let n = BigNum::from_dec_str(s).unwrap();
        assert_eq!(n.bit_len(), 129);
        assert_eq!(n.to_dec_string(), s);
        assert_eq!(BigNum::from_dec_str("0").unwrap().to_dec_string(), "0");
        assert!(BigNum::from_dec_str("12a").is_err());
        assert!(BigNum::from_dec_str("").is_err());
    }

    #[test]
    fn test_decimal_chunk_padding() {
        // 10^19 exercises the zero-padded inner chunk.
        let n = BigNum::from_dec_str("10000000000000000000").unwrap();
        assert_eq!(n.to_dec_string(), "10000000000000000000");
    }

    #[test]
    fn test_ordering() {
        let a = BigNum::from_bytes_be(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
        let b = BigNum::from_u64(u64::MAX);
        assert!(a > b);
        assert!(BigNum::zero() < BigNum::one());
        assert_eq!(BigNum::from_u64(7).cmp(&BigNum::from_u64(7)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_power_of_two() {
        let p = BigNum::power_of_two(130);
        assert_eq!(p.bit_len(), 131);
        assert!(p.get_bit(130));
        assert!(!p.get_bit(129));
    }

    #[test]
    fn test_hex_format() {
        let n = BigNum::from_u64(0xdeadbeef);
        assert_eq!(format!("{n:x}"), "deadbeef");
        assert_eq!(format!("{n:?}"), "BigNum(0xdeadbeef)");
    }
}
