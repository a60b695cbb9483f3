//! DER/PEM parsing of certificates.

use mrtd_types::PkiError;
use mrtd_utils::asn1::Decoder;
use mrtd_utils::oid::known;

use super::{Certificate, DistinguishedName, SubjectPublicKeyInfo, X509Extension};
use crate::encoding::{malformed, next_is_boolean, read_algorithm_identifier, read_oid};

const PEM_LABEL: &str = "CERTIFICATE";

pub(crate) fn parse_name(dec: &mut Decoder) -> Result<DistinguishedName, PkiError> {
    let mut name_dec = dec.read_sequence().map_err(malformed("name"))?;
    let mut entries = Vec::new();
    while !name_dec.is_empty() {
        let mut rdn_dec = name_dec.read_set().map_err(malformed("name rdn"))?;
        while !rdn_dec.is_empty() {
            let mut atav_dec = rdn_dec.read_sequence().map_err(malformed("name attribute"))?;
            let oid = read_oid(&mut atav_dec, "name attribute type")?;
            let attr_name = known::oid_to_dn_short_name(&oid)
                .map(|s| s.to_string())
                .unwrap_or_else(|| oid.to_dot_string());
            let value = atav_dec
                .read_string()
                .map_err(malformed("name attribute value"))?;
            entries.push((attr_name, value));
        }
    }
    Ok(DistinguishedName { entries })
}

fn parse_subject_public_key_info(dec: &mut Decoder) -> Result<SubjectPublicKeyInfo, PkiError> {
    let raw = dec.read_raw_tlv().map_err(malformed("subjectPublicKeyInfo"))?;
    let mut spki_dec = Decoder::new(raw)
        .read_sequence()
        .map_err(malformed("subjectPublicKeyInfo"))?;
    let algorithm = read_algorithm_identifier(&mut spki_dec, "spki algorithm")?;
    let (_, key) = spki_dec
        .read_bit_string()
        .map_err(malformed("subjectPublicKey"))?;
    Ok(SubjectPublicKeyInfo {
        algorithm,
        public_key: key.to_vec(),
        raw: raw.to_vec(),
    })
}

fn parse_extensions(ext_data: &[u8]) -> Result<Vec<X509Extension>, PkiError> {
    let mut ext_seq = Decoder::new(ext_data)
        .read_sequence()
        .map_err(malformed("extensions"))?;
    let mut extensions = Vec::new();
    while !ext_seq.is_empty() {
        let mut ext_dec = ext_seq.read_sequence().map_err(malformed("extension"))?;
        let oid = read_oid(&mut ext_dec, "extension id")?;
        // critical BOOLEAN DEFAULT FALSE
        let critical = if next_is_boolean(&ext_dec) {
            ext_dec.read_boolean().map_err(malformed("extension critical"))?
        } else {
            false
        };
        let value = ext_dec
            .read_octet_string()
            .map_err(malformed("extension value"))?
            .to_vec();
        extensions.push(X509Extension {
            oid,
            critical,
            value,
        });
    }
    Ok(extensions)
}

impl Certificate {
    /// Parse a certificate from DER-encoded bytes.
    ///
    /// Trailing bytes after the certificate are rejected.
    pub fn from_der(data: &[u8]) -> Result<Self, PkiError> {
        let mut top = Decoder::new(data);
        let mut outer = top.read_sequence().map_err(malformed("certificate"))?;
        if !top.is_empty() {
            return Err(PkiError::MalformedStructure(
                "trailing data after certificate".into(),
            ));
        }

        // The signed region is taken verbatim, never re-encoded.
        let tbs_raw = outer.read_raw_tlv().map_err(malformed("tbsCertificate"))?;
        let mut tbs_dec = Decoder::new(tbs_raw)
            .read_sequence()
            .map_err(malformed("tbsCertificate"))?;

        // version [0] EXPLICIT INTEGER DEFAULT v1
        let version = match tbs_dec
            .try_read_context_specific(0, true)
            .map_err(malformed("version"))?
        {
            Some(v_tlv) => {
                let v = Decoder::new(v_tlv.value)
                    .read_integer_u64()
                    .map_err(malformed("version"))?;
                u8::try_from(v + 1)
                    .map_err(|_| PkiError::MalformedStructure(format!("version {v}")))?
            }
            None => 1,
        };

        let serial_number = tbs_dec
            .read_integer()
            .map_err(malformed("serialNumber"))?
            .to_vec();

        // inner signature AlgorithmIdentifier, duplicated by the outer one
        read_algorithm_identifier(&mut tbs_dec, "tbs signature")?;

        let issuer = parse_name(&mut tbs_dec)?;

        let mut validity = tbs_dec.read_sequence().map_err(malformed("validity"))?;
        let not_before = validity
            .read_utc_or_generalized()
            .map_err(malformed("notBefore"))?;
        let not_after = validity
            .read_utc_or_generalized()
            .map_err(malformed("notAfter"))?;

        let subject = parse_name(&mut tbs_dec)?;
        let public_key = parse_subject_public_key_info(&mut tbs_dec)?;

        // issuerUniqueID [1], subjectUniqueID [2]: skipped
        tbs_dec
            .try_read_context_specific(1, false)
            .map_err(malformed("issuerUniqueID"))?;
        tbs_dec
            .try_read_context_specific(2, false)
            .map_err(malformed("subjectUniqueID"))?;

        // extensions [3] EXPLICIT Extensions OPTIONAL
        let extensions = match tbs_dec
            .try_read_context_specific(3, true)
            .map_err(malformed("extensions"))?
        {
            Some(ext_tlv) => parse_extensions(ext_tlv.value)?,
            None => Vec::new(),
        };

        let signature_algorithm = read_algorithm_identifier(&mut outer, "signatureAlgorithm")?;
        let (_, sig_bytes) = outer
            .read_bit_string()
            .map_err(malformed("signatureValue"))?;

        Ok(Certificate {
            raw: data.to_vec(),
            tbs_raw: tbs_raw.to_vec(),
            version,
            serial_number,
            issuer,
            subject,
            not_before,
            not_after,
            public_key,
            extensions,
            signature_algorithm,
            signature_value: sig_bytes.to_vec(),
        })
    }

    /// Parse the first CERTIFICATE block of a PEM string.
    pub fn from_pem(pem: &str) -> Result<Self, PkiError> {
        let blocks = mrtd_utils::pem::parse_label(pem, PEM_LABEL)?;
        let der = blocks
            .first()
            .ok_or_else(|| PkiError::MalformedStructure("no CERTIFICATE block found".into()))?;
        Self::from_der(der)
    }

    /// Country of the issuer (`C=`), as encoded.
    pub fn issuer_country(&self) -> Option<&str> {
        self.issuer.get("C")
    }

    /// Look up an extension by OID.
    pub fn extension(&self, oid: &mrtd_utils::oid::Oid) -> Option<&X509Extension> {
        self.extensions.iter().find(|e| e.oid == *oid)
    }
}

/// Parse every CERTIFICATE block of a concatenated PEM file, such as a
/// CSCA masterlist dump. Other block types are ignored.
pub fn parse_pem_bundle(pem: &str) -> Result<Vec<Certificate>, PkiError> {
    mrtd_utils::pem::parse_label(pem, PEM_LABEL)?
        .iter()
        .map(|der| Certificate::from_der(der))
        .collect()
}
