//! The signature schemes the circuits implement.

use mrtd_pki::signature::AlgorithmIdentifier;
use mrtd_pki::x509::PublicKeyMaterial;
use mrtd_types::{EccCurveId, EcdsaEncoding, HashAlgId, PkiError, SignatureFamily};

/// RSA modulus sizes with a circuit.
pub const RSA_KEY_SIZES: [usize; 4] = [1024, 2048, 3072, 4096];

/// Digests with a circuit.
pub const SUPPORTED_HASHES: [HashAlgId; 4] = [
    HashAlgId::Sha1,
    HashAlgId::Sha256,
    HashAlgId::Sha384,
    HashAlgId::Sha512,
];

/// A signature scheme resolved against the key that verifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerProfile {
    pub family: SignatureFamily,
    pub hash: HashAlgId,
    /// Modulus size for RSA, field size for EC.
    pub key_bits: usize,
    pub curve: Option<EccCurveId>,
    /// PSS salt length.
    pub salt_len: Option<u64>,
    /// Layout of the signature value for ECDSA.
    pub ecdsa_encoding: Option<EcdsaEncoding>,
}

impl SignerProfile {
    /// Resolve `alg` as used with `key`. `digest` is the hash to assume
    /// when the algorithm identifier carries none (bare `rsaEncryption`).
    pub fn resolve(
        alg: &AlgorithmIdentifier,
        digest: Option<HashAlgId>,
        key: &PublicKeyMaterial,
    ) -> Result<Self, PkiError> {
        let unsupported = |what: String| PkiError::UnsupportedAlgorithm(what);

        let family = alg
            .sig_alg()
            .family()
            .ok_or_else(|| unsupported(format!("signature algorithm {}", alg.name())))?;
        let hash = alg
            .signature_hash()?
            .or(digest)
            .ok_or_else(|| unsupported(format!("{} without a digest", alg.name())))?;
        if !SUPPORTED_HASHES.contains(&hash) {
            return Err(unsupported(format!("{} with {hash}", family.name())));
        }

        let pss = alg.pss_params()?;
        if let Some(p) = pss {
            if p.mgf_hash != p.hash {
                return Err(unsupported(format!(
                    "rsa_pss with {} and MGF1-{}",
                    p.hash, p.mgf_hash
                )));
            }
        }

        match (family, key) {
            (SignatureFamily::RsaPkcs | SignatureFamily::RsaPss, PublicKeyMaterial::Rsa { .. }) => {
                let bits = key.key_bits();
                if !RSA_KEY_SIZES.contains(&bits) {
                    return Err(unsupported(format!("RSA-{bits}")));
                }
                Ok(SignerProfile {
                    family,
                    hash,
                    key_bits: bits,
                    curve: None,
                    salt_len: pss.map(|p| p.salt_len),
                    ecdsa_encoding: None,
                })
            }
            (SignatureFamily::Ecdsa, PublicKeyMaterial::Ec { curve: Some(curve), .. }) => {
                Ok(SignerProfile {
                    family,
                    hash,
                    key_bits: key.key_bits(),
                    curve: Some(*curve),
                    salt_len: None,
                    ecdsa_encoding: alg.sig_alg().ecdsa_encoding(),
                })
            }
            (SignatureFamily::Ecdsa, PublicKeyMaterial::Ec { curve: None, .. }) => {
                Err(PkiError::UnknownCurve)
            }
            _ => Err(unsupported(format!(
                "{} signature with a mismatched key",
                alg.name()
            ))),
        }
    }

    /// Circuit identifier, e.g. `rsa_pss_sha256_2048` or
    /// `ecdsa_sha256_brainpoolP256r1`.
    pub fn name(&self) -> String {
        let hash = self.hash.name().to_ascii_lowercase();
        match self.curve {
            Some(curve) => format!("{}_{hash}_{}", self.family.name(), curve.name()),
            None => format!("{}_{hash}_{}", self.family.name(), self.key_bits),
        }
    }
}
