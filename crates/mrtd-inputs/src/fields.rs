//! Padding and key field encoding shared by the input records.

use mrtd_bignum::BarrettCtx;
use mrtd_pki::signature::ecdsa_signature_fixed;
use mrtd_pki::x509::PublicKeyMaterial;
use mrtd_types::{EcdsaEncoding, InputError, PkiError};
use mrtd_utils::bytes::ByteValue;
use serde::Serialize;

use crate::profile::SignerProfile;

/// The configured width, or the smallest of `widths` that holds `len`.
pub(crate) fn pick_width(
    field: &'static str,
    len: usize,
    widths: &[usize],
    configured: Option<usize>,
) -> Result<usize, InputError> {
    let too_long = |width| InputError::FieldTooLong { field, len, width };
    match configured {
        Some(width) if len > width => Err(too_long(width)),
        Some(width) => Ok(width),
        None => widths
            .iter()
            .copied()
            .find(|w| len <= *w)
            .ok_or_else(|| too_long(widths.iter().copied().max().unwrap_or(0))),
    }
}

/// Right-pad with zeros to exactly `width` bytes.
pub(crate) fn pad(field: &'static str, data: &[u8], width: usize) -> Result<Vec<u8>, InputError> {
    if data.len() > width {
        return Err(InputError::FieldTooLong {
            field,
            len: data.len(),
            width,
        });
    }
    Ok(ByteValue::from_slice(data).pad_end(width, 0).to_bytes())
}

/// Left-pad a big-endian value to exactly `width` bytes.
fn pad_be(field: &'static str, value: &ByteValue, width: usize) -> Result<Vec<u8>, InputError> {
    if value.len() > width {
        return Err(InputError::FieldTooLong {
            field,
            len: value.len(),
            width,
        });
    }
    Ok(value.pad_start(width, 0).to_bytes())
}

/// Public key of a signer in circuit layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyFields {
    Rsa {
        bits: usize,
        /// `ceil(bits/8)` bytes.
        modulus: Vec<u8>,
        exponent: u64,
        /// Barrett parameter, `ceil(bits/8) + 1` bytes.
        redc_param: Vec<u8>,
        modulus_limbs: Vec<ByteValue>,
        redc_limbs: Vec<ByteValue>,
    },
    Ecdsa {
        curve: &'static str,
        x: Vec<u8>,
        y: Vec<u8>,
    },
}

impl KeyFields {
    pub fn from_key(key: &PublicKeyMaterial) -> Result<Self, InputError> {
        match key {
            PublicKeyMaterial::Rsa { modulus, exponent } => {
                let ctx = BarrettCtx::from_bytes_be(modulus.as_bytes())?;
                let exponent = exponent.to_integer().to_u64().ok_or_else(|| {
                    PkiError::UnsupportedAlgorithm("RSA exponent wider than 64 bits".into())
                })?;
                Ok(KeyFields::Rsa {
                    bits: ctx.bit_len(),
                    modulus: ctx.modulus_bytes()?,
                    exponent,
                    redc_param: ctx.redc_bytes()?,
                    modulus_limbs: ctx.modulus_limbs()?.into_iter().map(ByteValue::new).collect(),
                    redc_limbs: ctx.param_limbs()?.into_iter().map(ByteValue::new).collect(),
                })
            }
            PublicKeyMaterial::Ec { curve, x, y } => {
                let curve = curve.ok_or(PkiError::UnknownCurve)?;
                let size = curve.field_size();
                Ok(KeyFields::Ecdsa {
                    curve: curve.name(),
                    x: pad_be("EC x coordinate", x, size)?,
                    y: pad_be("EC y coordinate", y, size)?,
                })
            }
        }
    }

    /// Bring a signature value made under `profile` into the fixed width
    /// this key verifies: left-padded to the modulus size for RSA, `r ‖ s`
    /// for ECDSA whether the value arrives DER or plain encoded.
    pub fn signature(
        &self,
        signature: &[u8],
        profile: &SignerProfile,
    ) -> Result<Vec<u8>, InputError> {
        match self {
            KeyFields::Rsa { modulus, .. } => {
                pad_be("RSA signature", &ByteValue::from_slice(signature), modulus.len())
            }
            KeyFields::Ecdsa { x, .. } => {
                let encoding = profile.ecdsa_encoding.unwrap_or(EcdsaEncoding::Der);
                Ok(ecdsa_signature_fixed(signature, encoding, x.len())?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrtd_pki::signature::AlgorithmIdentifier;
    use mrtd_types::{EccCurveId, HashAlgId, SignatureFamily};
    use mrtd_utils::oid::{known, Oid};

    fn resolve(oid: Oid, key: &PublicKeyMaterial) -> SignerProfile {
        SignerProfile::resolve(&AlgorithmIdentifier { oid, params: None }, None, key).unwrap()
    }

    #[test]
    fn test_pick_width() {
        let widths = [700, 1000, 1200];
        assert_eq!(pick_width("tbs", 512, &widths, None).unwrap(), 700);
        assert_eq!(pick_width("tbs", 700, &widths, None).unwrap(), 700);
        assert_eq!(pick_width("tbs", 701, &widths, None).unwrap(), 1000);
        assert_eq!(pick_width("tbs", 512, &widths, Some(1200)).unwrap(), 1200);
        assert_eq!(
            pick_width("tbs", 1300, &widths, None).unwrap_err(),
            InputError::FieldTooLong {
                field: "tbs",
                len: 1300,
                width: 1200
            }
        );
        assert!(pick_width("tbs", 800, &widths, Some(700)).is_err());
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("dg1", &[1, 2, 3], 5).unwrap(), vec![1, 2, 3, 0, 0]);
        assert_eq!(pad("dg1", &[1, 2, 3], 3).unwrap(), vec![1, 2, 3]);
        assert!(pad("dg1", &[1, 2, 3], 2).is_err());
    }

    #[test]
    fn test_rsa_key_fields() {
        let key = PublicKeyMaterial::Rsa {
            modulus: ByteValue::from_slice(&[13]),
            exponent: ByteValue::from_slice(&[0x01, 0x00, 0x01]),
        };
        let fields = KeyFields::from_key(&key).unwrap();
        let KeyFields::Rsa {
            bits,
            modulus,
            exponent,
            redc_param,
            redc_limbs,
            ..
        } = &fields
        else {
            panic!("expected RSA fields");
        };
        assert_eq!(*bits, 4);
        assert_eq!(modulus, &vec![13]);
        assert_eq!(*exponent, 65537);
        // floor(2^12 / 13) = 315
        assert_eq!(redc_param, &vec![0x01, 0x3B]);
        assert_eq!(redc_limbs.len(), 1);

        let profile = SignerProfile {
            family: SignatureFamily::RsaPkcs,
            hash: HashAlgId::Sha256,
            key_bits: 4,
            curve: None,
            salt_len: None,
            ecdsa_encoding: None,
        };
        assert_eq!(fields.signature(&[7], &profile).unwrap(), vec![7]);
        assert!(fields.signature(&[1, 2], &profile).is_err());
    }

    #[test]
    fn test_rsa_2048_layout() {
        let mut modulus = vec![0xA5; 256];
        modulus[0] = 0xC3;
        let key = PublicKeyMaterial::Rsa {
            modulus: ByteValue::new(modulus),
            exponent: ByteValue::from_slice(&[0x03]),
        };
        let KeyFields::Rsa {
            modulus,
            redc_param,
            modulus_limbs,
            redc_limbs,
            ..
        } = KeyFields::from_key(&key).unwrap()
        else {
            panic!("expected RSA fields");
        };
        assert_eq!(modulus.len(), 256);
        assert_eq!(redc_param.len(), 257);
        assert_eq!(modulus_limbs.len(), 18);
        assert_eq!(redc_limbs.len(), 18);
        let joined: Vec<u8> = redc_limbs.iter().flat_map(|l| l.to_bytes()).collect();
        assert_eq!(joined, redc_param);
    }

    #[test]
    fn test_ec_key_fields() {
        let key = PublicKeyMaterial::Ec {
            curve: Some(EccCurveId::NistP256),
            x: ByteValue::from_slice(&[0x11; 31]),
            y: ByteValue::from_slice(&[0x22; 32]),
        };
        let fields = KeyFields::from_key(&key).unwrap();
        let KeyFields::Ecdsa { curve, x, y } = &fields else {
            panic!("expected EC fields");
        };
        assert_eq!(*curve, "P-256");
        assert_eq!(x.len(), 32);
        assert_eq!(x[0], 0);
        assert_eq!(y, &vec![0x22; 32]);

        // SEQUENCE { INTEGER 1, INTEGER 2 }
        let profile = resolve(known::ecdsa_with_sha256(), &key);
        let raw = fields
            .signature(&[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02], &profile)
            .unwrap();
        assert_eq!(raw.len(), 64);
        assert_eq!(raw[31], 1);
        assert_eq!(raw[63], 2);
    }

    #[test]
    fn test_plain_ecdsa_signature() {
        let key = PublicKeyMaterial::Ec {
            curve: Some(EccCurveId::BrainpoolP256r1),
            x: ByteValue::from_slice(&[0x11; 32]),
            y: ByteValue::from_slice(&[0x22; 32]),
        };
        let profile = resolve(known::ecdsa_plain_sha256(), &key);
        assert_eq!(profile.name(), "ecdsa_sha256_brainpoolP256r1");
        assert_eq!(profile.ecdsa_encoding, Some(EcdsaEncoding::Plain));

        let fields = KeyFields::from_key(&key).unwrap();
        let mut sig = vec![0x5A; 32];
        sig.extend_from_slice(&[0x6B; 32]);
        assert_eq!(fields.signature(&sig, &profile).unwrap(), sig);
        assert!(matches!(
            fields.signature(&sig[..60], &profile),
            Err(InputError::PkiError(PkiError::MalformedStructure(_)))
        ));

        // the same bytes under the DER OID are rejected
        let der = resolve(known::ecdsa_with_sha256(), &key);
        assert!(fields.signature(&sig, &der).is_err());
    }

    #[test]
    fn test_unknown_curve() {
        let key = PublicKeyMaterial::Ec {
            curve: None,
            x: ByteValue::from_slice(&[0x11; 32]),
            y: ByteValue::from_slice(&[0x22; 32]),
        };
        assert_eq!(
            KeyFields::from_key(&key).unwrap_err(),
            InputError::PkiError(PkiError::UnknownCurve)
        );
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let key = PublicKeyMaterial::Ec {
            curve: Some(EccCurveId::BrainpoolP256r1),
            x: ByteValue::from_slice(&[1; 32]),
            y: ByteValue::from_slice(&[2; 32]),
        };
        let json = serde_json::to_value(KeyFields::from_key(&key).unwrap()).unwrap();
        assert_eq!(json["type"], "ecdsa");
        assert_eq!(json["curve"], "brainpoolP256r1");
        assert_eq!(json["x"].as_array().unwrap().len(), 32);
    }
}
