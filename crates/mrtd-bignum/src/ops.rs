//! Basic arithmetic operations for BigNum.

use crate::bignum::{BigNum, DoubleLimb, Limb, LIMB_BITS};
use mrtd_types::CryptoError;

impl BigNum {
    /// Add: self + other.
    pub fn add(&self, other: &BigNum) -> BigNum {
        add_unsigned(self.limbs(), other.limbs())
    }

    /// Add a single limb.
    pub fn add_small(&self, value: u64) -> BigNum {
        add_unsigned(self.limbs(), &[value])
    }

    /// Subtract: self - other, or `None` if the result would be negative.
    pub fn checked_sub(&self, other: &BigNum) -> Option<BigNum> {
        if self < other {
            None
        } else {
            Some(sub_unsigned(self.limbs(), other.limbs()))
        }
    }

    /// Subtract: self - other.
    pub fn sub(&self, other: &BigNum) -> Result<BigNum, CryptoError> {
        self.checked_sub(other).ok_or(CryptoError::BnNegativeResult)
    }

    /// Multiply: self * other.
    pub fn mul(&self, other: &BigNum) -> BigNum {
        mul_unsigned(self.limbs(), other.limbs())
    }

    /// Multiply by a single limb.
    pub fn mul_small(&self, value: u64) -> BigNum {
        mul_unsigned(self.limbs(), &[value])
    }

    /// Division with remainder: returns (quotient, remainder).
    pub fn div_rem(&self, divisor: &BigNum) -> Result<(BigNum, BigNum), CryptoError> {
        if divisor.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        Ok(div_rem_unsigned(self, divisor))
    }

    /// Division by a non-zero single limb: returns (quotient, remainder).
    pub(crate) fn div_rem_small(&self, divisor: u64) -> (BigNum, u64) {
        debug_assert!(divisor != 0);
        let mut quotient = vec![0u64; self.num_limbs()];
        let mut rem: DoubleLimb = 0;
        for (i, &limb) in self.limbs().iter().enumerate().rev() {
            let cur = (rem << LIMB_BITS) | limb as DoubleLimb;
            quotient[i] = (cur / divisor as DoubleLimb) as Limb;
            rem = cur % divisor as DoubleLimb;
        }
        (BigNum::from_limbs(quotient), rem as u64)
    }

    /// Modular reduction: self mod modulus.
    pub fn mod_reduce(&self, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        let (_, r) = self.div_rem(modulus)?;
        Ok(r)
    }

    /// Shift left by `bits`.
    pub fn shl(&self, bits: usize) -> BigNum {
        if self.is_zero() {
            return BigNum::zero();
        }
        let limb_shift = bits / LIMB_BITS;
        let bit_shift = bits % LIMB_BITS;
        let src = self.limbs();
        let mut limbs = vec![0u64; src.len() + limb_shift + 1];
        for (i, &limb) in src.iter().enumerate() {
            limbs[i + limb_shift] |= limb << bit_shift;
            if bit_shift != 0 {
                limbs[i + limb_shift + 1] |= limb >> (LIMB_BITS - bit_shift);
            }
        }
        BigNum::from_limbs(limbs)
    }

    /// Shift right by `bits`.
    pub fn shr(&self, bits: usize) -> BigNum {
        let limb_shift = bits / LIMB_BITS;
        let bit_shift = bits % LIMB_BITS;
        let src = self.limbs();
        if limb_shift >= src.len() {
            return BigNum::zero();
        }
        let mut limbs = vec![0u64; src.len() - limb_shift];
        for i in 0..limbs.len() {
            let lo = src[i + limb_shift] >> bit_shift;
            let hi = if bit_shift != 0 && i + limb_shift + 1 < src.len() {
                src[i + limb_shift + 1] << (LIMB_BITS - bit_shift)
            } else {
                0
            };
            limbs[i] = lo | hi;
        }
        BigNum::from_limbs(limbs)
    }

    /// Keep only the lowest `bits` bits (self mod 2^bits).
    pub fn low_bits(&self, bits: usize) -> BigNum {
        let full = bits / LIMB_BITS;
        let partial = bits % LIMB_BITS;
        let src = self.limbs();
        if full >= src.len() {
            return self.clone();
        }
        let mut limbs = src[..full].to_vec();
        if partial != 0 {
            limbs.push(src[full] & ((1u64 << partial) - 1));
        }
        BigNum::from_limbs(limbs)
    }
}

/// Add two unsigned limb arrays.
fn add_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    let max_len = a.len().max(b.len());
    let mut limbs = vec![0u64; max_len + 1];
    let mut carry: u64 = 0;

    for (i, out) in limbs.iter_mut().enumerate().take(max_len) {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        let sum = av as DoubleLimb + bv as DoubleLimb + carry as DoubleLimb;
        *out = sum as Limb;
        carry = (sum >> LIMB_BITS) as u64;
    }
    limbs[max_len] = carry;

    BigNum::from_limbs(limbs)
}

/// Subtract unsigned: a - b. The caller guarantees a >= b.
fn sub_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    let mut limbs = vec![0u64; a.len()];
    let mut borrow: u64 = 0;

    for (i, out) in limbs.iter_mut().enumerate() {
        let bv = b.get(i).copied().unwrap_or(0);
        let (diff, b1) = a[i].overflowing_sub(bv);
        let (diff2, b2) = diff.overflowing_sub(borrow);
        *out = diff2;
        borrow = (b1 as u64) + (b2 as u64);
    }
    debug_assert_eq!(borrow, 0);

    BigNum::from_limbs(limbs)
}

/// Multiply two unsigned limb arrays (schoolbook).
fn mul_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    if a.iter().all(|&l| l == 0) || b.iter().all(|&l| l == 0) {
        return BigNum::zero();
    }

    let mut limbs = vec![0u64; a.len() + b.len()];

    for (i, &ai) in a.iter().enumerate() {
        let mut carry: u64 = 0;
        for (j, &bj) in b.iter().enumerate() {
            let prod = ai as DoubleLimb * bj as DoubleLimb
                + limbs[i + j] as DoubleLimb
                + carry as DoubleLimb;
            limbs[i + j] = prod as Limb;
            carry = (prod >> LIMB_BITS) as u64;
        }
        limbs[i + b.len()] = carry;
    }

    BigNum::from_limbs(limbs)
}

/// Binary long division for unsigned values.
fn div_rem_unsigned(a: &BigNum, b: &BigNum) -> (BigNum, BigNum) {
    if a < b {
        return (BigNum::zero(), a.clone());
    }
    if let (Some(av), Some(bv)) = (a.to_u64(), b.to_u64()) {
        return (BigNum::from_u64(av / bv), BigNum::from_u64(av % bv));
    }

    let bits = a.bit_len();
    let mut quotient = vec![0u64; bits.div_ceil(LIMB_BITS)];
    let mut remainder = BigNum::zero();

    for i in (0..bits).rev() {
        shl1_in_place(&mut remainder);
        if a.get_bit(i) {
            remainder.limbs_mut()[0] |= 1;
        }

        if remainder >= *b {
            remainder = sub_unsigned(remainder.limbs(), b.limbs());
            quotient[i / LIMB_BITS] |= 1u64 << (i % LIMB_BITS);
        }
    }

    (BigNum::from_limbs(quotient), remainder)
}

fn shl1_in_place(n: &mut BigNum) {
    let limbs = n.limbs_mut();
    let mut carry = 0u64;
    for limb in limbs.iter_mut() {
        let next = *limb >> (LIMB_BITS - 1);
        *limb = (*limb << 1) | carry;
        carry = next;
    }
    if carry != 0 {
        limbs.push(carry);
    }
}
