//! Public key extraction from SubjectPublicKeyInfo.

use mrtd_types::{EccCurveId, PkeyAlgId, PkiError};
use mrtd_utils::asn1::Decoder;
use mrtd_utils::bytes::ByteValue;
use mrtd_utils::oid::known;

use super::{Certificate, SubjectPublicKeyInfo};
use crate::curves::resolve_explicit;
use crate::encoding::{malformed, read_oid, unsigned_magnitude};
use crate::oid_mapping::{oid_to_curve_id, oid_to_pkey_alg};

/// Key material of a signer, decoded once per certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    Rsa {
        modulus: ByteValue,
        exponent: ByteValue,
    },
    /// `curve` is `None` when the domain parameters match no known curve.
    Ec {
        curve: Option<EccCurveId>,
        x: ByteValue,
        y: ByteValue,
    },
}

impl PublicKeyMaterial {
    /// Decode the key carried by a SubjectPublicKeyInfo. An EC key on an
    /// unrecognized curve is still returned, with `curve: None`.
    pub fn from_spki(spki: &SubjectPublicKeyInfo) -> Result<Self, PkiError> {
        match oid_to_pkey_alg(&spki.algorithm.oid) {
            PkeyAlgId::Rsa | PkeyAlgId::RsaPss => parse_rsa_public_key(&spki.public_key),
            PkeyAlgId::Ec => {
                let curve = match spki.algorithm.params.as_deref() {
                    Some(params) => parse_ec_parameters(params)?,
                    None => None,
                };
                if curve.is_none() {
                    log::warn!("EC public key on an unrecognized curve");
                }
                let (x, y) = split_uncompressed_point(&spki.public_key)?;
                Ok(PublicKeyMaterial::Ec { curve, x, y })
            }
            PkeyAlgId::Unknown => Err(PkiError::UnsupportedAlgorithm(format!(
                "public key algorithm {}",
                spki.algorithm.oid
            ))),
        }
    }

    /// Modulus size for RSA, field size for EC, in bits.
    pub fn key_bits(&self) -> usize {
        match self {
            PublicKeyMaterial::Rsa { modulus, .. } => modulus.to_integer().bit_len(),
            PublicKeyMaterial::Ec {
                curve: Some(curve), ..
            } => match curve {
                EccCurveId::NistP521 => 521,
                c => c.field_size() * 8,
            },
            PublicKeyMaterial::Ec { x, .. } => x.len() * 8,
        }
    }

    pub fn curve(&self) -> Option<EccCurveId> {
        match self {
            PublicKeyMaterial::Ec { curve, .. } => *curve,
            PublicKeyMaterial::Rsa { .. } => None,
        }
    }

    /// True for an EC key whose curve could not be identified.
    pub fn has_unknown_curve(&self) -> bool {
        matches!(self, PublicKeyMaterial::Ec { curve: None, .. })
    }
}

/// `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`
fn parse_rsa_public_key(key: &[u8]) -> Result<PublicKeyMaterial, PkiError> {
    let mut dec = Decoder::new(key)
        .read_sequence()
        .map_err(malformed("RSAPublicKey"))?;
    let modulus = dec.read_integer().map_err(malformed("RSA modulus"))?;
    let exponent = dec.read_integer().map_err(malformed("RSA exponent"))?;
    Ok(PublicKeyMaterial::Rsa {
        modulus: ByteValue::from_slice(unsigned_magnitude(modulus)),
        exponent: ByteValue::from_slice(unsigned_magnitude(exponent)),
    })
}

/// `ECParameters ::= CHOICE { namedCurve OID, specifiedCurve
/// SpecifiedECDomain, implicitCA NULL }`
fn parse_ec_parameters(params: &[u8]) -> Result<Option<EccCurveId>, PkiError> {
    let mut dec = Decoder::new(params);
    let tag = dec.peek_tag().map_err(malformed("ECParameters"))?;
    if tag.is_universal(0x06) {
        let oid = read_oid(&mut dec, "namedCurve")?;
        return Ok(oid_to_curve_id(&oid));
    }
    if !tag.is_universal(0x10) {
        return Ok(None);
    }

    let mut domain = dec.read_sequence().map_err(malformed("SpecifiedECDomain"))?;
    domain
        .read_integer()
        .map_err(malformed("SpecifiedECDomain version"))?;

    let mut field = domain.read_sequence().map_err(malformed("FieldID"))?;
    if read_oid(&mut field, "FieldID type")? != known::prime_field() {
        return Ok(None);
    }
    let p = field.read_integer().map_err(malformed("prime p"))?;

    let mut curve = domain.read_sequence().map_err(malformed("Curve"))?;
    let a = curve.read_octet_string().map_err(malformed("curve a"))?;
    let b = curve.read_octet_string().map_err(malformed("curve b"))?;

    domain
        .read_octet_string()
        .map_err(malformed("SpecifiedECDomain base"))?;
    let n = domain.read_integer().map_err(malformed("SpecifiedECDomain order"))?;

    Ok(resolve_explicit(unsigned_magnitude(p), a, b, unsigned_magnitude(n)))
}

/// Split `0x04 ‖ x ‖ y` into its coordinates.
fn split_uncompressed_point(point: &[u8]) -> Result<(ByteValue, ByteValue), PkiError> {
    match point {
        [0x04, coords @ ..] if !coords.is_empty() && coords.len() % 2 == 0 => {
            let (x, y) = coords.split_at(coords.len() / 2);
            Ok((ByteValue::from_slice(x), ByteValue::from_slice(y)))
        }
        [0x02 | 0x03, ..] => Err(PkiError::MalformedStructure(
            "compressed EC points are not supported".into(),
        )),
        _ => Err(PkiError::MalformedStructure("invalid EC point encoding".into())),
    }
}

impl Certificate {
    /// Decode the subject public key.
    pub fn public_key_material(&self) -> Result<PublicKeyMaterial, PkiError> {
        PublicKeyMaterial::from_spki(&self.public_key)
    }
}
