//! Document Security Object (EF.SOD) decoding.
//!
//! An SOD is a CMS SignedData whose encapsulated content is the LDS
//! security object, signed by the Document Signer Certificate embedded in
//! the same structure.

use mrtd_types::{HashAlgId, PkiError};
use mrtd_utils::oid::known;

use crate::cms::{SignedAttributes, SignedData, SignerInfo};
use crate::digest::digest;
use crate::lds::LdsSecurityObject;
use crate::x509::{Certificate, PublicKeyMaterial};

/// EF.SOD application tag with a two-octet long-form length.
const LEGACY_HEADER: [u8; 2] = [0x77, 0x82];

/// Non-fatal conditions found while decoding. Each is also logged at warn
/// level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// More than one SignerInfo; only the first was processed.
    MultipleSignerInfos(usize),
    /// The DSC carries an EC key on a curve outside the known table.
    UnknownCurve,
    /// No embedded certificate matches the signer identifier; the first
    /// certificate was used.
    SignerCertificateNotMatched,
}

impl std::fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeWarning::MultipleSignerInfos(n) => {
                write!(f, "{n} SignerInfos present, only the first is used")
            }
            DecodeWarning::UnknownCurve => f.write_str("unknown elliptic curve"),
            DecodeWarning::SignerCertificateNotMatched => {
                f.write_str("signer identifier matches no embedded certificate")
            }
        }
    }
}

/// Remove the `77 82 ll ll` wrapper some readers leave on EF.SOD. Input
/// without the wrapper is returned unchanged.
pub fn strip_legacy_header(data: &[u8]) -> Result<&[u8], PkiError> {
    match data {
        [t0, t1, hi, lo, body @ ..] if [*t0, *t1] == LEGACY_HEADER => {
            let declared = u16::from_be_bytes([*hi, *lo]) as usize;
            log::debug!("stripping legacy SOD header, declared length {declared}");
            body.get(..declared).ok_or_else(|| {
                PkiError::MalformedStructure(format!(
                    "SOD header declares {declared} bytes, {} present",
                    body.len()
                ))
            })
        }
        _ => Ok(data),
    }
}

/// A decoded Document Security Object.
#[derive(Debug, Clone)]
pub struct SecurityObject {
    /// SignedData version.
    pub version: u64,
    pub digest_algorithms: Vec<HashAlgId>,
    pub encapsulated_content: LdsSecurityObject,
    /// The first SignerInfo.
    pub signer_info: SignerInfo,
    /// The Document Signer Certificate.
    pub certificate: Certificate,
    pub public_key: PublicKeyMaterial,
    pub warnings: Vec<DecodeWarning>,
}

impl SecurityObject {
    /// Decode raw EF.SOD bytes, with or without the legacy header.
    pub fn from_der(data: &[u8]) -> Result<Self, PkiError> {
        let der = strip_legacy_header(data)?;
        let signed = SignedData::from_der(der)?;
        let mut warnings = Vec::new();

        let eci = &signed.encap_content_info;
        if eci.content_type != known::icao_lds_security_object() {
            return Err(PkiError::InvalidContentType(format!(
                "expected LDS security object, got {}",
                eci.content_type
            )));
        }
        let content = eci
            .content
            .as_deref()
            .ok_or_else(|| PkiError::MalformedStructure("missing eContent".into()))?;
        let encapsulated_content = LdsSecurityObject::from_der(content)?;

        let digest_algorithms = signed
            .digest_algorithms
            .iter()
            .map(|alg| {
                alg.hash_alg()
                    .ok_or_else(|| PkiError::UnsupportedAlgorithm(format!("digest {}", alg.oid)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if signed.signer_infos.len() > 1 {
            log::warn!(
                "SOD has {} SignerInfos, processing only the first",
                signed.signer_infos.len()
            );
            warnings.push(DecodeWarning::MultipleSignerInfos(signed.signer_infos.len()));
        }
        let signer_info = signed.first_signer()?.clone();

        let attrs = signer_info
            .signed_attrs
            .as_ref()
            .ok_or_else(|| PkiError::MalformedStructure("missing signedAttrs".into()))?;
        if attrs.content_type != eci.content_type {
            return Err(PkiError::InvalidContentType(format!(
                "signed contentType {} differs from eContentType",
                attrs.content_type
            )));
        }

        let certificate = match signed.signer_certificate(&signer_info) {
            Some(cert) => cert.clone(),
            None => {
                let first = signed
                    .certificates
                    .first()
                    .ok_or_else(|| PkiError::MalformedStructure("missing certificate".into()))?;
                log::warn!("no embedded certificate matches the SOD signer, using the first");
                warnings.push(DecodeWarning::SignerCertificateNotMatched);
                first.clone()
            }
        };

        let public_key = certificate.public_key_material()?;
        if public_key.has_unknown_curve() {
            warnings.push(DecodeWarning::UnknownCurve);
        }

        Ok(SecurityObject {
            version: signed.version,
            digest_algorithms,
            encapsulated_content,
            signer_info,
            certificate,
            public_key,
            warnings,
        })
    }

    /// The signed attributes; always present after a successful decode.
    pub fn signed_attrs(&self) -> Result<&SignedAttributes, PkiError> {
        self.signer_info
            .signed_attrs
            .as_ref()
            .ok_or_else(|| PkiError::MalformedStructure("missing signedAttrs".into()))
    }

    /// The digest the SignerInfo declares for the encapsulated content.
    pub fn signer_digest_algorithm(&self) -> Result<HashAlgId, PkiError> {
        let alg = &self.signer_info.digest_algorithm;
        alg.hash_alg()
            .ok_or_else(|| PkiError::UnsupportedAlgorithm(format!("digest {}", alg.oid)))
    }

    /// Recompute the hash of the encapsulated content and compare it with
    /// the `messageDigest` signed attribute.
    pub fn verify_message_digest(&self) -> Result<bool, PkiError> {
        let alg = self.signer_digest_algorithm()?;
        let computed = digest(alg, &self.encapsulated_content.raw);
        Ok(computed == self.signed_attrs()?.message_digest)
    }

    /// Check a data group's bytes against the hash stored in the LDS
    /// security object. A group without a stored hash is an error.
    pub fn verify_data_group(&self, number: u8, data: &[u8]) -> Result<bool, PkiError> {
        let lds = &self.encapsulated_content;
        let stored = lds.hash_of(number).ok_or_else(|| {
            PkiError::MalformedStructure(format!("no hash stored for DG{number}"))
        })?;
        Ok(digest(lds.hash_algorithm, data) == stored.as_bytes())
    }

    /// Display names of the SignedData digest algorithms.
    pub fn digest_algorithm_names(&self) -> Vec<&'static str> {
        self.digest_algorithms.iter().map(|h| h.name()).collect()
    }

    /// Display name of the signer's signature algorithm.
    pub fn signature_algorithm_name(&self) -> String {
        self.signer_info.signature_algorithm.name()
    }
}
