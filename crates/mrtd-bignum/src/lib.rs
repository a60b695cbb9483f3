#![forbid(unsafe_code)]
#![doc = "Unsigned big number arithmetic and Barrett reduction parameters for eMRTD circuit inputs."]

mod barrett;
mod bignum;
mod ops;

pub use barrett::{join_limbs, split_limbs, BarrettCtx, CIRCUIT_LIMB_BITS, OVERFLOW_BITS};
pub use bignum::{BigNum, Limb, LIMB_BITS};
