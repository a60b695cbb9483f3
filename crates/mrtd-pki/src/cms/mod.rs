//! CMS (RFC 5652) ContentInfo and SignedData, as used by ICAO 9303 security
//! objects.

mod signed_data;

use mrtd_types::PkiError;
use mrtd_utils::asn1::{Asn1Time, Decoder};
use mrtd_utils::oid::{known, Oid};

use crate::encoding::{malformed, read_oid};
use crate::signature::AlgorithmIdentifier;
use crate::x509::{Certificate, DistinguishedName};

/// `ContentInfo ::= SEQUENCE { contentType OID, content [0] EXPLICIT ANY }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    pub content_type: Oid,
    /// The inner content TLV, as encoded.
    pub content: Vec<u8>,
}

impl ContentInfo {
    pub fn from_der(data: &[u8]) -> Result<Self, PkiError> {
        let mut top = Decoder::new(data);
        let mut seq = top.read_sequence().map_err(malformed("ContentInfo"))?;
        if !top.is_empty() {
            return Err(PkiError::MalformedStructure(
                "trailing data after ContentInfo".into(),
            ));
        }
        let content_type = read_oid(&mut seq, "ContentInfo contentType")?;
        let mut wrapper = seq.read_explicit(0).map_err(malformed("ContentInfo content"))?;
        let content = wrapper
            .read_raw_tlv()
            .map_err(malformed("ContentInfo content"))?;
        Ok(ContentInfo {
            content_type,
            content: content.to_vec(),
        })
    }
}

/// A decoded SignedData.
#[derive(Debug, Clone)]
pub struct SignedData {
    pub version: u64,
    pub digest_algorithms: Vec<AlgorithmIdentifier>,
    pub encap_content_info: EncapsulatedContentInfo,
    pub certificates: Vec<Certificate>,
    pub signer_infos: Vec<SignerInfo>,
}

/// `EncapsulatedContentInfo ::= SEQUENCE { eContentType OID,
/// eContent [0] EXPLICIT OCTET STRING OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapsulatedContentInfo {
    pub content_type: Oid,
    /// Content octets of `eContent`, exactly as they appear in the source.
    pub content: Option<Vec<u8>>,
}

/// A decoded SignerInfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerInfo {
    pub version: u64,
    pub sid: SignerIdentifier,
    pub digest_algorithm: AlgorithmIdentifier,
    pub signed_attrs: Option<SignedAttributes>,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature: Vec<u8>,
}

/// How a SignerInfo names its certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerIdentifier {
    IssuerAndSerial {
        issuer: DistinguishedName,
        serial: Vec<u8>,
    },
    SubjectKeyIdentifier(Vec<u8>),
}

impl SignerIdentifier {
    /// True if `cert` is the certificate this identifier names.
    pub fn matches(&self, cert: &Certificate) -> bool {
        match self {
            SignerIdentifier::IssuerAndSerial { issuer, serial } => {
                *issuer == cert.issuer && *serial == cert.serial_number
            }
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                matches!(cert.subject_key_identifier(), Ok(Some(ref s)) if s == ski)
            }
        }
    }
}

/// The signed attributes of a SignerInfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAttributes {
    pub content_type: Oid,
    pub message_digest: Vec<u8>,
    pub signing_time: Option<Asn1Time>,
    /// `SET OF Attribute` re-tagged from `[0] IMPLICIT` to `0x31`, attributes
    /// in source order. This is the input to the signature.
    pub raw: Vec<u8>,
}

impl SignedData {
    /// Parse a DER `ContentInfo` that must carry `id-signedData`.
    pub fn from_der(data: &[u8]) -> Result<Self, PkiError> {
        let info = ContentInfo::from_der(data)?;
        if info.content_type != known::pkcs7_signed_data() {
            return Err(PkiError::InvalidContentType(format!(
                "expected signedData, got {}",
                info.content_type
            )));
        }
        signed_data::parse_signed_data(&info.content)
    }

    /// The first SignerInfo. SignedData without any signer is malformed.
    pub fn first_signer(&self) -> Result<&SignerInfo, PkiError> {
        self.signer_infos
            .first()
            .ok_or_else(|| crate::encoding::missing("signerInfos"))
    }

    /// The certificate named by `signer`, if it is embedded.
    pub fn signer_certificate(&self, signer: &SignerInfo) -> Option<&Certificate> {
        self.certificates.iter().find(|c| signer.sid.matches(c))
    }
}
