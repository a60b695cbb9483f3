//! One-shot message digests over the hash algorithms used in the LDS.

use mrtd_types::HashAlgId;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// Hash `data` with the given algorithm.
pub fn digest(alg: HashAlgId, data: &[u8]) -> Vec<u8> {
    match alg {
        HashAlgId::Sha1 => Sha1::digest(data).to_vec(),
        HashAlgId::Sha224 => Sha224::digest(data).to_vec(),
        HashAlgId::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgId::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgId::Sha512 => Sha512::digest(data).to_vec(),
    }
}
