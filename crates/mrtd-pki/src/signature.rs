//! Signature algorithm identifiers, RSASSA-PSS parameters and ECDSA
//! signature normalization.

use mrtd_types::{EcdsaEncoding, HashAlgId, PkiError, SigAlgId};
use mrtd_utils::asn1::Decoder;
use mrtd_utils::oid::{known, Oid};

use crate::encoding::{malformed, read_algorithm_identifier, unsigned_magnitude};
use crate::oid_mapping::{oid_to_hash, oid_to_sig_alg};

/// A decoded `AlgorithmIdentifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub oid: Oid,
    /// Full parameter TLV; `None` when absent or NULL.
    pub params: Option<Vec<u8>>,
}

impl AlgorithmIdentifier {
    /// Resolve as a signature algorithm.
    pub fn sig_alg(&self) -> SigAlgId {
        oid_to_sig_alg(&self.oid)
    }

    /// Resolve as a digest algorithm.
    pub fn hash_alg(&self) -> Option<HashAlgId> {
        oid_to_hash(&self.oid)
    }

    /// Display name of the signature algorithm, or the dotted OID when it
    /// is not one the resolver knows.
    pub fn name(&self) -> String {
        match self.sig_alg() {
            SigAlgId::Unknown => self.oid.to_dot_string(),
            id => id.name().to_string(),
        }
    }

    /// Decode RSASSA-PSS parameters. `None` unless the algorithm is
    /// `id-RSASSA-PSS`; an absent parameter field yields the RFC 4055
    /// defaults.
    pub fn pss_params(&self) -> Result<Option<PssParams>, PkiError> {
        if self.oid != known::rsassa_pss() {
            return Ok(None);
        }
        match &self.params {
            Some(der) => PssParams::from_der(der).map(Some),
            None => Ok(Some(PssParams::default())),
        }
    }

    /// The digest the signature is computed over. For PSS this comes from
    /// the parameters rather than the OID.
    pub fn signature_hash(&self) -> Result<Option<HashAlgId>, PkiError> {
        match self.pss_params()? {
            Some(pss) => Ok(Some(pss.hash)),
            None => Ok(self.sig_alg().hash()),
        }
    }
}

/// RSASSA-PSS-params (RFC 4055 §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PssParams {
    pub hash: HashAlgId,
    /// Digest inside MGF1. Only MGF1 is accepted as mask generation function.
    pub mgf_hash: HashAlgId,
    pub salt_len: u64,
    pub trailer_field: u64,
}

impl Default for PssParams {
    fn default() -> Self {
        Self {
            hash: HashAlgId::Sha1,
            mgf_hash: HashAlgId::Sha1,
            salt_len: 20,
            trailer_field: 1,
        }
    }
}

impl PssParams {
    /// Decode from the full `SEQUENCE` encoding. Missing fields take their
    /// DEFAULT values.
    pub fn from_der(der: &[u8]) -> Result<Self, PkiError> {
        let mut outer = Decoder::new(der);
        let mut seq = outer.read_sequence().map_err(malformed("pss params"))?;
        let mut params = Self::default();

        if let Some(tlv) = seq
            .try_read_context_specific(0, true)
            .map_err(malformed("pss hash"))?
        {
            let alg = read_algorithm_identifier(&mut Decoder::new(tlv.value), "pss hash")?;
            params.hash = known_hash(&alg)?;
        }

        if let Some(tlv) = seq
            .try_read_context_specific(1, true)
            .map_err(malformed("pss mgf"))?
        {
            let mgf = read_algorithm_identifier(&mut Decoder::new(tlv.value), "pss mgf")?;
            if mgf.oid != known::mgf1() {
                return Err(PkiError::UnsupportedAlgorithm(format!(
                    "mask generation function {}",
                    mgf.oid
                )));
            }
            let inner = mgf
                .params
                .ok_or_else(|| PkiError::MalformedStructure("mgf1 without digest".into()))?;
            let mgf_hash = read_algorithm_identifier(&mut Decoder::new(&inner), "mgf1 digest")?;
            params.mgf_hash = known_hash(&mgf_hash)?;
        }

        if let Some(tlv) = seq
            .try_read_context_specific(2, true)
            .map_err(malformed("pss salt length"))?
        {
            params.salt_len = Decoder::new(tlv.value)
                .read_integer_u64()
                .map_err(malformed("pss salt length"))?;
        }

        if let Some(tlv) = seq
            .try_read_context_specific(3, true)
            .map_err(malformed("pss trailer"))?
        {
            params.trailer_field = Decoder::new(tlv.value)
                .read_integer_u64()
                .map_err(malformed("pss trailer"))?;
        }

        if !seq.is_empty() {
            return Err(PkiError::MalformedStructure(
                "trailing data in pss params".into(),
            ));
        }
        Ok(params)
    }
}

fn known_hash(alg: &AlgorithmIdentifier) -> Result<HashAlgId, PkiError> {
    alg.hash_alg()
        .ok_or_else(|| PkiError::UnsupportedAlgorithm(format!("digest {}", alg.oid)))
}

/// Convert a DER `Ecdsa-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }`
/// into fixed-width `r ‖ s`, each half `field_size` bytes.
pub fn ecdsa_signature_to_raw(der: &[u8], field_size: usize) -> Result<Vec<u8>, PkiError> {
    let mut outer = Decoder::new(der);
    let mut seq = outer.read_sequence().map_err(malformed("ecdsa signature"))?;
    let mut out = Vec::with_capacity(field_size * 2);
    for part in ["r", "s"] {
        let int = seq.read_integer().map_err(malformed("ecdsa signature"))?;
        let mag = unsigned_magnitude(int);
        if mag.len() > field_size {
            return Err(PkiError::MalformedStructure(format!(
                "ecdsa {part} is {} bytes, field is {field_size}",
                mag.len()
            )));
        }
        out.resize(out.len() + field_size - mag.len(), 0);
        out.extend_from_slice(mag);
    }
    if !seq.is_empty() || !outer.is_empty() {
        return Err(PkiError::MalformedStructure(
            "trailing data in ecdsa signature".into(),
        ));
    }
    Ok(out)
}

/// Check a plain `r ‖ s` signature (BSI TR-03111) against the field size.
pub fn ecdsa_plain_signature(raw: &[u8], field_size: usize) -> Result<Vec<u8>, PkiError> {
    if raw.len() != 2 * field_size {
        return Err(PkiError::MalformedStructure(format!(
            "plain ecdsa signature is {} bytes, expected {}",
            raw.len(),
            2 * field_size
        )));
    }
    Ok(raw.to_vec())
}

/// Fixed-width `r ‖ s` from a signature value in either layout.
pub fn ecdsa_signature_fixed(
    signature: &[u8],
    encoding: EcdsaEncoding,
    field_size: usize,
) -> Result<Vec<u8>, PkiError> {
    match encoding {
        EcdsaEncoding::Der => ecdsa_signature_to_raw(signature, field_size),
        EcdsaEncoding::Plain => ecdsa_plain_signature(signature, field_size),
    }
}
