//! Typed views over the certificate extensions the CSC matcher reads.
//!
//! Accessors return `Ok(None)` when the extension is absent and an error
//! when it is present but malformed.

use mrtd_types::PkiError;
use mrtd_utils::asn1::{Asn1Time, Decoder};
use mrtd_utils::oid::{known, Oid};

use super::Certificate;
use crate::encoding::{malformed, next_is_boolean};

/// Parsed BasicConstraints extension (RFC 5280 §4.2.1.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub path_len_constraint: Option<u32>,
}

/// Parsed Authority Key Identifier extension (RFC 5280 §4.2.1.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub authority_cert_serial_number: Option<Vec<u8>>,
}

/// Parsed Private Key Usage Period extension (RFC 3280 §4.2.1.4), as
/// UNIX timestamps. ICAO 9303 requires it on document signer certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateKeyUsagePeriod {
    pub not_before: Option<i64>,
    pub not_after: Option<i64>,
}

impl PrivateKeyUsagePeriod {
    /// True if `self` lies entirely inside `outer`. An open bound on `outer`
    /// admits anything on that side; an open bound on `self` is only
    /// contained by an open bound.
    pub fn is_within(&self, outer: &PrivateKeyUsagePeriod) -> bool {
        let start_ok = match (outer.not_before, self.not_before) {
            (None, _) => true,
            (Some(o), Some(s)) => s >= o,
            (Some(_), None) => false,
        };
        let end_ok = match (outer.not_after, self.not_after) {
            (None, _) => true,
            (Some(o), Some(s)) => s <= o,
            (Some(_), None) => false,
        };
        start_ok && end_ok
    }
}

/// Parsed Key Usage extension (RFC 5280 §4.2.1.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub u16);

impl KeyUsage {
    // BIT STRING bit numbering: bit 0 = MSB of first byte (0x80).
    pub const DIGITAL_SIGNATURE: u16 = 0x0080;
    pub const NON_REPUDIATION: u16 = 0x0040;
    pub const KEY_ENCIPHERMENT: u16 = 0x0020;
    pub const DATA_ENCIPHERMENT: u16 = 0x0010;
    pub const KEY_AGREEMENT: u16 = 0x0008;
    pub const KEY_CERT_SIGN: u16 = 0x0004;
    pub const CRL_SIGN: u16 = 0x0002;
    pub const ENCIPHER_ONLY: u16 = 0x0001;
    pub const DECIPHER_ONLY: u16 = 0x8000;

    pub fn has(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }
}

/// `SEQUENCE { cA BOOLEAN DEFAULT FALSE, pathLenConstraint INTEGER OPTIONAL }`
fn parse_basic_constraints(value: &[u8]) -> Result<BasicConstraints, PkiError> {
    let mut dec = Decoder::new(value)
        .read_sequence()
        .map_err(malformed("basicConstraints"))?;
    let is_ca = if next_is_boolean(&dec) {
        dec.read_boolean().map_err(malformed("basicConstraints cA"))?
    } else {
        false
    };
    let path_len_constraint = if dec.is_empty() {
        None
    } else {
        let v = dec
            .read_integer_u64()
            .map_err(malformed("basicConstraints pathLen"))?;
        Some(u32::try_from(v).unwrap_or(u32::MAX))
    };
    Ok(BasicConstraints {
        is_ca,
        path_len_constraint,
    })
}

/// `BIT STRING`; only the first two octets carry defined bits.
fn parse_key_usage(value: &[u8]) -> Result<KeyUsage, PkiError> {
    let (unused_bits, data) = Decoder::new(value)
        .read_bit_string()
        .map_err(malformed("keyUsage"))?;
    let mut bytes = [0u8; 2];
    for (dst, src) in bytes.iter_mut().zip(data) {
        *dst = *src;
    }
    // Clear unused bits in the last octet.
    if let Some(last) = data.len().checked_sub(1).filter(|&i| i < 2) {
        bytes[last] &= 0xFFu8 << unused_bits;
    }
    Ok(KeyUsage(bytes[0] as u16 | (bytes[1] as u16) << 8))
}

/// `SEQUENCE { keyIdentifier [0] OPTIONAL, authorityCertIssuer [1] OPTIONAL,
/// authorityCertSerialNumber [2] OPTIONAL }`
fn parse_authority_key_identifier(value: &[u8]) -> Result<AuthorityKeyIdentifier, PkiError> {
    let mut dec = Decoder::new(value)
        .read_sequence()
        .map_err(malformed("authorityKeyIdentifier"))?;
    let key_identifier = dec
        .try_read_context_specific(0, false)
        .map_err(malformed("authorityKeyIdentifier keyIdentifier"))?
        .map(|tlv| tlv.value.to_vec());
    dec.try_read_context_specific(1, true)
        .map_err(malformed("authorityKeyIdentifier issuer"))?;
    let authority_cert_serial_number = dec
        .try_read_context_specific(2, false)
        .map_err(malformed("authorityKeyIdentifier serial"))?
        .map(|tlv| tlv.value.to_vec());
    Ok(AuthorityKeyIdentifier {
        key_identifier,
        authority_cert_serial_number,
    })
}

fn parse_subject_key_identifier(value: &[u8]) -> Result<Vec<u8>, PkiError> {
    let ski = Decoder::new(value)
        .read_octet_string()
        .map_err(malformed("subjectKeyIdentifier"))?;
    Ok(ski.to_vec())
}

/// `SEQUENCE { notBefore [0] IMPLICIT GeneralizedTime OPTIONAL,
/// notAfter [1] IMPLICIT GeneralizedTime OPTIONAL }`
fn parse_private_key_usage_period(value: &[u8]) -> Result<PrivateKeyUsagePeriod, PkiError> {
    let mut dec = Decoder::new(value)
        .read_sequence()
        .map_err(malformed("privateKeyUsagePeriod"))?;
    let mut bound = |n: u32| -> Result<Option<i64>, PkiError> {
        match dec
            .try_read_context_specific(n, false)
            .map_err(malformed("privateKeyUsagePeriod"))?
        {
            Some(tlv) => Ok(Some(
                Asn1Time::parse(0x18, tlv.value)
                    .map_err(malformed("privateKeyUsagePeriod time"))?
                    .timestamp,
            )),
            None => Ok(None),
        }
    };
    let not_before = bound(0)?;
    let not_after = bound(1)?;
    Ok(PrivateKeyUsagePeriod {
        not_before,
        not_after,
    })
}

impl Certificate {
    fn extension_value(&self, oid: &Oid) -> Option<&[u8]> {
        self.extension(oid).map(|e| e.value.as_slice())
    }

    /// Parse the BasicConstraints extension, if present.
    pub fn basic_constraints(&self) -> Result<Option<BasicConstraints>, PkiError> {
        self.extension_value(&known::basic_constraints())
            .map(parse_basic_constraints)
            .transpose()
    }

    /// Parse the KeyUsage extension, if present.
    pub fn key_usage(&self) -> Result<Option<KeyUsage>, PkiError> {
        self.extension_value(&known::key_usage())
            .map(parse_key_usage)
            .transpose()
    }

    /// Parse the Authority Key Identifier extension, if present.
    pub fn authority_key_identifier(&self) -> Result<Option<AuthorityKeyIdentifier>, PkiError> {
        self.extension_value(&known::authority_key_identifier())
            .map(parse_authority_key_identifier)
            .transpose()
    }

    /// Parse the Subject Key Identifier extension, if present.
    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>, PkiError> {
        self.extension_value(&known::subject_key_identifier())
            .map(parse_subject_key_identifier)
            .transpose()
    }

    /// Parse the Private Key Usage Period extension, if present.
    pub fn private_key_usage_period(&self) -> Result<Option<PrivateKeyUsagePeriod>, PkiError> {
        self.extension_value(&known::private_key_usage_period())
            .map(parse_private_key_usage_period)
            .transpose()
    }

    /// Returns true if BasicConstraints is present with cA set.
    pub fn is_ca(&self) -> bool {
        matches!(self.basic_constraints(), Ok(Some(bc)) if bc.is_ca)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn test_basic_constraints() {
        let bc = parse_basic_constraints(&unhex("30060101ff020100")).unwrap();
        assert!(bc.is_ca);
        assert_eq!(bc.path_len_constraint, Some(0));

        let bc = parse_basic_constraints(&unhex("3000")).unwrap();
        assert!(!bc.is_ca);
        assert_eq!(bc.path_len_constraint, None);
    }

    #[test]
    fn test_key_usage_bits() {
        // keyCertSign | cRLSign, 1 unused bit
        let ku = parse_key_usage(&unhex("03020106")).unwrap();
        assert!(ku.has(KeyUsage::KEY_CERT_SIGN));
        assert!(ku.has(KeyUsage::CRL_SIGN));
        assert!(!ku.has(KeyUsage::DIGITAL_SIGNATURE));

        // unused bits are masked off
        let ku = parse_key_usage(&unhex("03020781")).unwrap();
        assert_eq!(ku, KeyUsage(KeyUsage::DIGITAL_SIGNATURE));

        // decipherOnly lives in the second octet
        let ku = parse_key_usage(&unhex("0303078080")).unwrap();
        assert!(ku.has(KeyUsage::DECIPHER_ONLY));
    }

    #[test]
    fn test_authority_key_identifier() {
        let aki = parse_authority_key_identifier(&unhex("30068004deadbeef")).unwrap();
        assert_eq!(aki.key_identifier, Some(unhex("deadbeef")));
        assert_eq!(aki.authority_cert_serial_number, None);

        let aki = parse_authority_key_identifier(&unhex("3003820105")).unwrap();
        assert_eq!(aki.key_identifier, None);
        assert_eq!(aki.authority_cert_serial_number, Some(vec![0x05]));
    }

    #[test]
    fn test_subject_key_identifier() {
        assert_eq!(
            parse_subject_key_identifier(&unhex("0403010203")).unwrap(),
            vec![1, 2, 3]
        );
        assert!(parse_subject_key_identifier(&unhex("3000")).is_err());
    }

    #[test]
    fn test_private_key_usage_period() {
        // [0] 20131216214318Z, [1] 20140316214318Z
        let mut der = vec![0x30, 0x22, 0x80, 0x0f];
        der.extend_from_slice(b"20131216214318Z");
        der.extend_from_slice(&[0x81, 0x0f]);
        der.extend_from_slice(b"20140316214318Z");
        let period = parse_private_key_usage_period(&der).unwrap();
        assert_eq!(period.not_before, Some(1387230198));
        assert_eq!(period.not_after, Some(1387230198 + 90 * 86400));

        let unbounded_period = parse_private_key_usage_period(&[0x30, 0x00]).unwrap();
        assert_eq!(unbounded_period.not_before, None);
        assert_eq!(unbounded_period.not_after, None);
    }

    #[test]
    fn test_usage_period_containment() {
        let window = PrivateKeyUsagePeriod {
            not_before: Some(100),
            not_after: Some(200),
        };
        let inside = PrivateKeyUsagePeriod {
            not_before: Some(120),
            not_after: Some(200),
        };
        let overlapping = PrivateKeyUsagePeriod {
            not_before: Some(90),
            not_after: Some(150),
        };
        let open_end = PrivateKeyUsagePeriod {
            not_before: Some(120),
            not_after: None,
        };
        let unbounded = PrivateKeyUsagePeriod {
            not_before: None,
            not_after: None,
        };
        assert!(inside.is_within(&window));
        assert!(!overlapping.is_within(&window));
        assert!(!open_end.is_within(&window));
        assert!(open_end.is_within(&unbounded));
        assert!(window.is_within(&window));
    }
}
