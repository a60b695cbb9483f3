//! OID-to-algorithm mapping.
//!
//! Static tables from object identifiers to the closed algorithm enums.
//! Unknown OIDs map to `None` / `Unknown`; callers decide whether that is
//! fatal.

use mrtd_types::{EccCurveId, HashAlgId, PkeyAlgId, SigAlgId};
use mrtd_utils::oid::{known, Oid};

/// Map a digest algorithm OID to its `HashAlgId`.
pub fn oid_to_hash(oid: &Oid) -> Option<HashAlgId> {
    hash_table()
        .into_iter()
        .find(|(o, _)| o == oid)
        .map(|(_, h)| h)
}

/// The OID of a digest algorithm.
pub fn hash_to_oid(hash: HashAlgId) -> Oid {
    match hash {
        HashAlgId::Sha1 => known::sha1(),
        HashAlgId::Sha224 => known::sha224(),
        HashAlgId::Sha256 => known::sha256(),
        HashAlgId::Sha384 => known::sha384(),
        HashAlgId::Sha512 => known::sha512(),
    }
}

fn hash_table() -> [(Oid, HashAlgId); 5] {
    [
        (known::sha1(), HashAlgId::Sha1),
        (known::sha224(), HashAlgId::Sha224),
        (known::sha256(), HashAlgId::Sha256),
        (known::sha384(), HashAlgId::Sha384),
        (known::sha512(), HashAlgId::Sha512),
    ]
}

/// Map a signature algorithm OID to its `SigAlgId`.
pub fn oid_to_sig_alg(oid: &Oid) -> SigAlgId {
    sig_table()
        .into_iter()
        .find(|(o, _)| o == oid)
        .map(|(_, s)| s)
        .unwrap_or(SigAlgId::Unknown)
}

/// The OID of a signature algorithm, `None` for `Unknown`.
pub fn sig_alg_to_oid(alg: SigAlgId) -> Option<Oid> {
    sig_table()
        .into_iter()
        .find(|(_, s)| *s == alg)
        .map(|(o, _)| o)
}

fn sig_table() -> [(Oid, SigAlgId); 14] {
    [
        (known::rsa_encryption(), SigAlgId::RsaEncryption),
        (known::sha1_with_rsa_encryption(), SigAlgId::Sha1WithRsa),
        (known::sha224_with_rsa_encryption(), SigAlgId::Sha224WithRsa),
        (known::sha256_with_rsa_encryption(), SigAlgId::Sha256WithRsa),
        (known::sha384_with_rsa_encryption(), SigAlgId::Sha384WithRsa),
        (known::sha512_with_rsa_encryption(), SigAlgId::Sha512WithRsa),
        (known::rsassa_pss(), SigAlgId::RsaPss),
        (known::ec_public_key(), SigAlgId::Ecdsa),
        (known::ecdsa_with_sha1(), SigAlgId::EcdsaWithSha1),
        (known::ecdsa_with_sha224(), SigAlgId::EcdsaWithSha224),
        (known::ecdsa_with_sha256(), SigAlgId::EcdsaWithSha256),
        (known::ecdsa_with_sha384(), SigAlgId::EcdsaWithSha384),
        (known::ecdsa_with_sha512(), SigAlgId::EcdsaWithSha512),
        (known::ecdsa_plain_sha256(), SigAlgId::EcdsaPlainSha256),
    ]
}

/// Map a SubjectPublicKeyInfo algorithm OID to its key type.
pub fn oid_to_pkey_alg(oid: &Oid) -> PkeyAlgId {
    if *oid == known::rsa_encryption() {
        PkeyAlgId::Rsa
    } else if *oid == known::rsassa_pss() {
        PkeyAlgId::RsaPss
    } else if *oid == known::ec_public_key() {
        PkeyAlgId::Ec
    } else {
        PkeyAlgId::Unknown
    }
}

/// Map a named-curve OID to its `EccCurveId`.
pub fn oid_to_curve_id(oid: &Oid) -> Option<EccCurveId> {
    EccCurveId::ALL
        .into_iter()
        .find(|&curve| curve_id_to_oid(curve) == *oid)
}

/// The named-curve OID of a curve.
pub fn curve_id_to_oid(curve: EccCurveId) -> Oid {
    match curve {
        EccCurveId::NistP256 => known::prime256v1(),
        EccCurveId::NistP384 => known::secp384r1(),
        EccCurveId::NistP521 => known::secp521r1(),
        EccCurveId::BrainpoolP160r1 => known::brainpool(1),
        EccCurveId::BrainpoolP160t1 => known::brainpool(2),
        EccCurveId::BrainpoolP192r1 => known::brainpool(3),
        EccCurveId::BrainpoolP192t1 => known::brainpool(4),
        EccCurveId::BrainpoolP224r1 => known::brainpool(5),
        EccCurveId::BrainpoolP224t1 => known::brainpool(6),
        EccCurveId::BrainpoolP256r1 => known::brainpool(7),
        EccCurveId::BrainpoolP256t1 => known::brainpool(8),
        EccCurveId::BrainpoolP320r1 => known::brainpool(9),
        EccCurveId::BrainpoolP320t1 => known::brainpool(10),
        EccCurveId::BrainpoolP384r1 => known::brainpool(11),
        EccCurveId::BrainpoolP384t1 => known::brainpool(12),
        EccCurveId::BrainpoolP512r1 => known::brainpool(13),
        EccCurveId::BrainpoolP512t1 => known::brainpool(14),
    }
}
