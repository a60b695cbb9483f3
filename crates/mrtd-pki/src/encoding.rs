//! Shared ASN.1 helpers for the PKI crate.

use mrtd_types::{CryptoError, PkiError};
use mrtd_utils::asn1::{tags, Decoder, Encoder};
use mrtd_utils::oid::Oid;

use crate::signature::AlgorithmIdentifier;

/// Map a codec error into `MalformedStructure`, tagged with what was being
/// decoded.
pub(crate) fn malformed(context: &'static str) -> impl Fn(CryptoError) -> PkiError {
    move |e| PkiError::MalformedStructure(format!("{context}: {e}"))
}

/// `MalformedStructure` for a required field that is absent.
pub(crate) fn missing(field: &str) -> PkiError {
    PkiError::MalformedStructure(format!("missing {field}"))
}

/// Encode a SET containing `content`.
pub(crate) fn enc_set(content: &[u8]) -> Vec<u8> {
    let mut e = Encoder::new();
    e.write_set(content);
    e.finish()
}

/// Read an OID and parse it.
pub(crate) fn read_oid(dec: &mut Decoder, context: &'static str) -> Result<Oid, PkiError> {
    let der = dec.read_oid().map_err(malformed(context))?;
    Oid::from_der_value(der).map_err(malformed(context))
}

/// Read an `AlgorithmIdentifier`. An absent or NULL parameter field maps
/// to `None`; anything else is kept as its full TLV.
pub(crate) fn read_algorithm_identifier(
    dec: &mut Decoder,
    context: &'static str,
) -> Result<AlgorithmIdentifier, PkiError> {
    let mut alg = dec.read_sequence().map_err(malformed(context))?;
    let oid = read_oid(&mut alg, context)?;
    let params = if alg.is_empty() {
        None
    } else {
        let tlv = alg.read_tlv().map_err(malformed(context))?;
        if tlv.tag.is_universal(0x05) && tlv.value.is_empty() {
            None
        } else {
            Some(tlv.raw.to_vec())
        }
    };
    Ok(AlgorithmIdentifier { oid, params })
}

/// Strip the sign octet from a non-negative INTEGER.
pub(crate) fn unsigned_magnitude(bytes: &[u8]) -> &[u8] {
    match bytes {
        [0, rest @ ..] if !rest.is_empty() => unsigned_magnitude(rest),
        _ => bytes,
    }
}

/// True if the next element is a universal tag with the given byte.
pub(crate) fn next_is(dec: &Decoder, tag_byte: u8) -> bool {
    !dec.is_empty()
        && dec
            .peek_tag()
            .map(|t| t.is_universal((tag_byte & 0x1F) as u32))
            .unwrap_or(false)
}

/// True if the next element is a BOOLEAN.
pub(crate) fn next_is_boolean(dec: &Decoder) -> bool {
    next_is(dec, tags::BOOLEAN)
}
