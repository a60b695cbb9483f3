//! Barrett reduction parameters in the limb layout arithmetic circuits use.

use crate::bignum::BigNum;
use mrtd_types::CryptoError;

/// Extra bits folded into the Barrett exponent so the quotient estimate
/// never overflows inside the circuit.
pub const OVERFLOW_BITS: usize = 4;

/// Width of one circuit limb. Every limb, the head included, fits in it.
pub const CIRCUIT_LIMB_BITS: usize = 120;

const CIRCUIT_LIMB_BYTES: usize = CIRCUIT_LIMB_BITS / 8;

/// Barrett reduction context.
///
/// For a modulus `m` of bit length `k` the parameter is
/// `r = floor(2^(2k + OVERFLOW_BITS) / m)`. Everything here is a pure
/// function of `m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrettCtx {
    modulus: BigNum,
    /// Bit length of the modulus.
    k: usize,
    /// floor(2^(2k+4) / m).
    r: BigNum,
}

impl BarrettCtx {
    /// Create a Barrett context for a non-zero modulus.
    pub fn new(modulus: &BigNum) -> Result<Self, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        let k = modulus.bit_len();
        let (r, _) = BigNum::power_of_two(2 * k + OVERFLOW_BITS).div_rem(modulus)?;
        Ok(BarrettCtx {
            modulus: modulus.clone(),
            k,
            r,
        })
    }

    /// Create a context from a big-endian modulus.
    pub fn from_bytes_be(modulus: &[u8]) -> Result<Self, CryptoError> {
        Self::new(&BigNum::from_bytes_be(modulus))
    }

    /// Return a reference to the modulus.
    pub fn modulus(&self) -> &BigNum {
        &self.modulus
    }

    /// Bit length `k` of the modulus.
    pub fn bit_len(&self) -> usize {
        self.k
    }

    /// The Barrett parameter `r`.
    pub fn param(&self) -> &BigNum {
        &self.r
    }

    /// Byte budget of the modulus: `ceil(k/8)`.
    pub fn modulus_byte_len(&self) -> usize {
        self.k.div_ceil(8)
    }

    /// Byte budget of the parameter: `ceil(k/8) + 1`.
    pub fn param_byte_len(&self) -> usize {
        self.modulus_byte_len() + 1
    }

    /// Number of circuit limbs covering `k` bits.
    pub fn num_limbs(&self) -> usize {
        limb_count(self.k)
    }

    /// The parameter as a fixed-width big-endian array.
    pub fn redc_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        self.r.to_bytes_be_padded(self.param_byte_len())
    }

    /// The modulus as a fixed-width big-endian array.
    pub fn modulus_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        self.modulus.to_bytes_be_padded(self.modulus_byte_len())
    }

    /// The parameter split into big-endian circuit limbs.
    pub fn param_limbs(&self) -> Result<Vec<Vec<u8>>, CryptoError> {
        split_limbs(&self.r, self.k, self.param_byte_len())
    }

    /// The modulus split into big-endian circuit limbs.
    pub fn modulus_limbs(&self) -> Result<Vec<Vec<u8>>, CryptoError> {
        split_limbs(&self.modulus, self.k, self.modulus_byte_len())
    }

    /// Barrett reduction: `x mod m` for `x < 2^(2k)`.
    pub fn reduce(&self, x: &BigNum) -> Result<BigNum, CryptoError> {
        if x.bit_len() > 2 * self.k {
            return Err(CryptoError::InvalidArg);
        }
        let q = x.mul(&self.r).shr(2 * self.k + OVERFLOW_BITS);
        let mut rem = x.sub(&q.mul(&self.modulus))?;
        while rem >= self.modulus {
            rem = rem.sub(&self.modulus)?;
        }
        Ok(rem)
    }
}

fn limb_count(bits: usize) -> usize {
    bits.div_ceil(CIRCUIT_LIMB_BITS).max(1)
}

/// Split `value` into `ceil(bits/120)` big-endian limbs whose concatenation
/// is exactly `byte_budget` bytes.
///
/// Every limb except the most significant is 15 bytes; the head limb takes
/// whatever remains of the budget. A head wider than one limb, as happens
/// for the parameter when `bits` is a multiple of 120, is rejected with
/// `BnLimbOverflow`.
pub fn split_limbs(
    value: &BigNum,
    bits: usize,
    byte_budget: usize,
) -> Result<Vec<Vec<u8>>, CryptoError> {
    let count = limb_count(bits);
    let tail = CIRCUIT_LIMB_BYTES * (count - 1);
    if byte_budget <= tail {
        return Err(CryptoError::BufferTooSmall {
            need: tail + 1,
            got: byte_budget,
        });
    }
    let head = byte_budget - tail;
    if head > CIRCUIT_LIMB_BYTES {
        return Err(CryptoError::BnLimbOverflow {
            len: head,
            max: CIRCUIT_LIMB_BYTES,
        });
    }
    let bytes = value.to_bytes_be_padded(byte_budget)?;

    let mut limbs = Vec::with_capacity(count);
    limbs.push(bytes[..head].to_vec());
    limbs.extend(bytes[head..].chunks(CIRCUIT_LIMB_BYTES).map(<[u8]>::to_vec));
    Ok(limbs)
}

/// Reassemble a value from big-endian limbs.
pub fn join_limbs(limbs: &[Vec<u8>]) -> BigNum {
    BigNum::from_bytes_be(&limbs.concat())
}
