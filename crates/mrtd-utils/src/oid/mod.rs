//! Object identifiers.

use mrtd_types::CryptoError;

/// An OID as a sequence of arc values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Create an OID from arc values.
    pub fn new(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Return the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Parse dotted notation such as `"2.23.136.1.1.1"`.
    pub fn from_dot_string(s: &str) -> Result<Self, CryptoError> {
        let arcs = s
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| CryptoError::InvalidEncoding(format!("bad oid {s:?}")))?;
        if arcs.len() < 2 || arcs[0] > 2 || (arcs[0] < 2 && arcs[1] >= 40) {
            return Err(CryptoError::InvalidEncoding(format!("bad oid {s:?}")));
        }
        Ok(Self { arcs })
    }

    /// Encode the OID content octets (no tag or length).
    pub fn to_der_value(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let [first, second, rest @ ..] = self.arcs.as_slice() {
            encode_arc(&mut buf, first * 40 + second);
            for &arc in rest {
                encode_arc(&mut buf, arc);
            }
        }
        buf
    }

    /// Parse OID content octets.
    pub fn from_der_value(data: &[u8]) -> Result<Self, CryptoError> {
        if data.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let mut arcs = Vec::new();
        let mut rest = data;
        while !rest.is_empty() {
            let (arc, consumed) = decode_arc(rest)?;
            if arcs.is_empty() {
                // The first subidentifier packs two arcs.
                let top = (arc / 40).min(2);
                arcs.push(top);
                arcs.push(arc - top * 40);
            } else {
                arcs.push(arc);
            }
            rest = &rest[consumed..];
        }
        Ok(Self { arcs })
    }

    /// Dotted-string representation, e.g. `"1.2.840.113549.1.7.2"`.
    pub fn to_dot_string(&self) -> String {
        self.arcs
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True if `der` is the encoding of this OID.
    pub fn matches_der(&self, der: &[u8]) -> bool {
        self.to_der_value() == der
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_dot_string())
    }
}

fn encode_arc(buf: &mut Vec<u8>, value: u32) {
    let mut groups = [0u8; 5];
    let mut n = 0;
    let mut v = value;
    loop {
        groups[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        buf.push(if i > 0 { groups[i] | 0x80 } else { groups[i] });
    }
}

fn decode_arc(data: &[u8]) -> Result<(u32, usize), CryptoError> {
    // A leading 0x80 is a non-minimal encoding.
    if data.first() == Some(&0x80) {
        return Err(CryptoError::DecodeAsn1Fail);
    }
    let mut value: u32 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(CryptoError::DecodeAsn1Fail)
}

/// Well-known OIDs for ICAO 9303 security objects.
pub mod known {
    use super::Oid;

    // ICAO LDS
    /// LDS security object, "passport signature data" (id-icao-ldsSecurityObject).
    pub fn icao_lds_security_object() -> Oid {
        Oid::new(&[2, 23, 136, 1, 1, 1])
    }
    /// CSCA master list content type.
    pub fn icao_csca_master_list() -> Oid {
        Oid::new(&[2, 23, 136, 1, 1, 2])
    }

    // CMS / PKCS#9
    pub fn pkcs7_data() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 7, 1])
    }
    pub fn pkcs7_signed_data() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 7, 2])
    }
    pub fn content_type() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 9, 3])
    }
    pub fn message_digest() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 9, 4])
    }
    pub fn signing_time() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 9, 5])
    }

    // Hash algorithms
    pub fn sha1() -> Oid {
        Oid::new(&[1, 3, 14, 3, 2, 26])
    }
    pub fn sha224() -> Oid {
        Oid::new(&[2, 16, 840, 1, 101, 3, 4, 2, 4])
    }
    pub fn sha256() -> Oid {
        Oid::new(&[2, 16, 840, 1, 101, 3, 4, 2, 1])
    }
    pub fn sha384() -> Oid {
        Oid::new(&[2, 16, 840, 1, 101, 3, 4, 2, 2])
    }
    pub fn sha512() -> Oid {
        Oid::new(&[2, 16, 840, 1, 101, 3, 4, 2, 3])
    }

    // RSA
    pub fn rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 1])
    }
    pub fn sha1_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 5])
    }
    pub fn mgf1() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 8])
    }
    pub fn rsassa_pss() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 10])
    }
    pub fn sha256_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 11])
    }
    pub fn sha384_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 12])
    }
    pub fn sha512_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 13])
    }
    pub fn sha224_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 14])
    }

    // EC
    pub fn ec_public_key() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 2, 1])
    }
    pub fn prime_field() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 1, 1])
    }
    pub fn ecdsa_with_sha1() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 1])
    }
    pub fn ecdsa_with_sha224() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 1])
    }
    pub fn ecdsa_with_sha256() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 2])
    }
    pub fn ecdsa_with_sha384() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 3])
    }
    pub fn ecdsa_with_sha512() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 4])
    }
    /// BSI TR-03111 plain ECDSA with SHA-256.
    pub fn ecdsa_plain_sha256() -> Oid {
        Oid::new(&[0, 4, 0, 127, 0, 7, 1, 1, 4, 1, 3])
    }

    // Named curves
    pub fn prime256v1() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 3, 1, 7])
    }
    pub fn secp384r1() -> Oid {
        Oid::new(&[1, 3, 132, 0, 34])
    }
    pub fn secp521r1() -> Oid {
        Oid::new(&[1, 3, 132, 0, 35])
    }
    /// Brainpool curve `n` under `ecStdCurvesAndGeneration` (RFC 5639):
    /// odd numbers are r1 curves, even numbers their twisted t1 variants.
    pub fn brainpool(n: u32) -> Oid {
        Oid::new(&[1, 3, 36, 3, 3, 2, 8, 1, 1, n])
    }

    // X.509 extensions (RFC 5280)
    pub fn subject_key_identifier() -> Oid {
        Oid::new(&[2, 5, 29, 14])
    }
    pub fn key_usage() -> Oid {
        Oid::new(&[2, 5, 29, 15])
    }
    pub fn private_key_usage_period() -> Oid {
        Oid::new(&[2, 5, 29, 16])
    }
    pub fn basic_constraints() -> Oid {
        Oid::new(&[2, 5, 29, 19])
    }
    pub fn authority_key_identifier() -> Oid {
        Oid::new(&[2, 5, 29, 35])
    }

    // DN attribute types (X.520)
    pub fn common_name() -> Oid {
        Oid::new(&[2, 5, 4, 3])
    }
    pub fn serial_number_attr() -> Oid {
        Oid::new(&[2, 5, 4, 5])
    }
    pub fn country_name() -> Oid {
        Oid::new(&[2, 5, 4, 6])
    }
    pub fn organization_name() -> Oid {
        Oid::new(&[2, 5, 4, 10])
    }
    pub fn organizational_unit_name() -> Oid {
        Oid::new(&[2, 5, 4, 11])
    }

    /// Short name of a DN attribute type.
    pub fn oid_to_dn_short_name(oid: &Oid) -> Option<&'static str> {
        match oid.arcs() {
            [2, 5, 4, 3] => Some("CN"),
            [2, 5, 4, 5] => Some("serialNumber"),
            [2, 5, 4, 6] => Some("C"),
            [2, 5, 4, 7] => Some("L"),
            [2, 5, 4, 8] => Some("ST"),
            [2, 5, 4, 10] => Some("O"),
            [2, 5, 4, 11] => Some("OU"),
            [1, 2, 840, 113549, 1, 9, 1] => Some("emailAddress"),
            _ => None,
        }
    }
}
