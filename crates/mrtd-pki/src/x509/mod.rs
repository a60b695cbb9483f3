//! X.509 certificates as carried in an SOD and in CSCA masterlists.

pub(crate) mod certificate;
mod extensions;
mod public_key;

use mrtd_utils::asn1::Asn1Time;
use mrtd_utils::oid::{known, Oid};

use crate::signature::AlgorithmIdentifier;

pub use certificate::parse_pem_bundle;
pub use extensions::{AuthorityKeyIdentifier, BasicConstraints, KeyUsage, PrivateKeyUsagePeriod};
pub use public_key::PublicKeyMaterial;

/// An X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// DER-encoded certificate data.
    pub raw: Vec<u8>,
    /// The TBSCertificate exactly as it appears in `raw`; this is the
    /// signed region.
    pub tbs_raw: Vec<u8>,
    /// Certificate version (typically 3, encoded as 2).
    pub version: u8,
    /// Serial number content octets.
    pub serial_number: Vec<u8>,
    pub issuer: DistinguishedName,
    pub subject: DistinguishedName,
    pub not_before: Asn1Time,
    pub not_after: Asn1Time,
    pub public_key: SubjectPublicKeyInfo,
    pub extensions: Vec<X509Extension>,
    /// Outer signatureAlgorithm.
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature_value: Vec<u8>,
}

/// A distinguished name (DN) as an ordered attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinguishedName {
    pub entries: Vec<(String, String)>,
}

/// Subject public key info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    /// Contents of the subjectPublicKey BIT STRING.
    pub public_key: Vec<u8>,
    /// The complete SubjectPublicKeyInfo encoding.
    pub raw: Vec<u8>,
}

/// An X.509 extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X509Extension {
    pub oid: Oid,
    pub critical: bool,
    /// Contents of the extnValue OCTET STRING.
    pub value: Vec<u8>,
}

impl X509Extension {
    /// RFC 5280 name for the extensions the matcher reads, dotted OID
    /// otherwise.
    pub fn name(&self) -> String {
        let name = if self.oid == known::authority_key_identifier() {
            "authorityKeyIdentifier"
        } else if self.oid == known::subject_key_identifier() {
            "subjectKeyIdentifier"
        } else if self.oid == known::private_key_usage_period() {
            "privateKeyUsagePeriod"
        } else if self.oid == known::basic_constraints() {
            "basicConstraints"
        } else if self.oid == known::key_usage() {
            "keyUsage"
        } else {
            return self.oid.to_dot_string();
        };
        name.to_string()
    }
}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl DistinguishedName {
    /// Get the value for a given attribute short name (e.g., "CN").
    pub fn get(&self, attr: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == attr)
            .map(|(_, v)| v.as_str())
    }
}
