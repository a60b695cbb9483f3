//! SignedData structure parsing.

use mrtd_types::PkiError;
use mrtd_utils::asn1::{tags, Decoder};
use mrtd_utils::oid::known;

use super::{
    EncapsulatedContentInfo, SignedAttributes, SignedData, SignerIdentifier, SignerInfo,
};
use crate::encoding::{enc_set, malformed, missing, read_algorithm_identifier, read_oid};
use crate::x509::certificate::parse_name;
use crate::x509::Certificate;

/// Parse the `SignedData` SEQUENCE (the content of a ContentInfo).
pub(crate) fn parse_signed_data(data: &[u8]) -> Result<SignedData, PkiError> {
    let mut seq = Decoder::new(data)
        .read_sequence()
        .map_err(malformed("SignedData"))?;

    let version = seq
        .read_integer_u64()
        .map_err(malformed("SignedData version"))?;

    let mut algs = seq.read_set().map_err(malformed("digestAlgorithms"))?;
    let mut digest_algorithms = Vec::new();
    while !algs.is_empty() {
        digest_algorithms.push(read_algorithm_identifier(&mut algs, "digestAlgorithm")?);
    }

    let encap_content_info = parse_encap_content_info(&mut seq)?;

    // certificates [0] IMPLICIT CertificateSet OPTIONAL
    let mut certificates = Vec::new();
    if let Some(tlv) = seq
        .try_read_context_specific(0, true)
        .map_err(malformed("certificates"))?
    {
        let mut set = Decoder::new(tlv.value);
        while !set.is_empty() {
            let raw = set.read_raw_tlv().map_err(malformed("certificate"))?;
            // Only plain X.509 certificates; attribute and other
            // certificate choices are tagged and skipped.
            if raw[0] == tags::SEQUENCE {
                certificates.push(Certificate::from_der(raw)?);
            }
        }
    }

    // crls [1] IMPLICIT RevocationInfoChoices OPTIONAL
    seq.try_read_context_specific(1, true)
        .map_err(malformed("crls"))?;

    let mut infos = seq.read_set().map_err(malformed("signerInfos"))?;
    let mut signer_infos = Vec::new();
    while !infos.is_empty() {
        signer_infos.push(parse_signer_info(&mut infos)?);
    }

    Ok(SignedData {
        version,
        digest_algorithms,
        encap_content_info,
        certificates,
        signer_infos,
    })
}

fn parse_encap_content_info(dec: &mut Decoder) -> Result<EncapsulatedContentInfo, PkiError> {
    let mut eci = dec
        .read_sequence()
        .map_err(malformed("encapContentInfo"))?;
    let content_type = read_oid(&mut eci, "eContentType")?;
    let content = match eci
        .try_read_context_specific(0, true)
        .map_err(malformed("eContent"))?
    {
        Some(tlv) => Some(
            Decoder::new(tlv.value)
                .read_octet_string()
                .map_err(malformed("eContent"))?
                .to_vec(),
        ),
        None => None,
    };
    Ok(EncapsulatedContentInfo {
        content_type,
        content,
    })
}

fn parse_signer_info(dec: &mut Decoder) -> Result<SignerInfo, PkiError> {
    let mut si = dec.read_sequence().map_err(malformed("SignerInfo"))?;
    let version = si
        .read_integer_u64()
        .map_err(malformed("SignerInfo version"))?;

    let sid = match si.try_read_context_specific(0, false).map_err(malformed("sid"))? {
        Some(tlv) => SignerIdentifier::SubjectKeyIdentifier(tlv.value.to_vec()),
        None => {
            let mut ias = si
                .read_sequence()
                .map_err(malformed("issuerAndSerialNumber"))?;
            let issuer = parse_name(&mut ias)?;
            let serial = ias
                .read_integer()
                .map_err(malformed("issuerAndSerialNumber serial"))?
                .to_vec();
            SignerIdentifier::IssuerAndSerial { issuer, serial }
        }
    };

    let digest_algorithm = read_algorithm_identifier(&mut si, "SignerInfo digestAlgorithm")?;

    let signed_attrs = match si
        .try_read_context_specific(0, true)
        .map_err(malformed("signedAttrs"))?
    {
        Some(tlv) => Some(parse_signed_attributes(tlv.value)?),
        None => None,
    };

    let signature_algorithm = read_algorithm_identifier(&mut si, "signatureAlgorithm")?;
    let signature = si
        .read_octet_string()
        .map_err(malformed("signature"))?
        .to_vec();

    // unsignedAttrs [1] IMPLICIT OPTIONAL
    si.try_read_context_specific(1, true)
        .map_err(malformed("unsignedAttrs"))?;

    Ok(SignerInfo {
        version,
        sid,
        digest_algorithm,
        signed_attrs,
        signature_algorithm,
        signature,
    })
}

/// Decode the attributes inside `[0] IMPLICIT SET OF Attribute` and rebuild
/// the `SET` the signature was computed over.
fn parse_signed_attributes(content: &[u8]) -> Result<SignedAttributes, PkiError> {
    let mut dec = Decoder::new(content);
    let mut rebuilt = Vec::with_capacity(content.len());
    let mut content_type = None;
    let mut message_digest = None;
    let mut signing_time = None;

    while !dec.is_empty() {
        let raw = dec.read_raw_tlv().map_err(malformed("signed attribute"))?;
        rebuilt.extend_from_slice(raw);

        let mut attr = Decoder::new(raw)
            .read_sequence()
            .map_err(malformed("signed attribute"))?;
        let oid = read_oid(&mut attr, "signed attribute type")?;
        let mut values = attr
            .read_set()
            .map_err(malformed("signed attribute values"))?;

        if oid == known::content_type() {
            content_type = Some(read_oid(&mut values, "contentType attribute")?);
        } else if oid == known::message_digest() {
            message_digest = Some(
                values
                    .read_octet_string()
                    .map_err(malformed("messageDigest attribute"))?
                    .to_vec(),
            );
        } else if oid == known::signing_time() {
            signing_time = Some(
                values
                    .read_utc_or_generalized()
                    .map_err(malformed("signingTime attribute"))?,
            );
        }
    }

    Ok(SignedAttributes {
        content_type: content_type.ok_or_else(|| missing("contentType attribute"))?,
        message_digest: message_digest.ok_or_else(|| missing("messageDigest attribute"))?,
        signing_time,
        raw: enc_set(&rebuilt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrtd_utils::asn1::{Encoder, Tag};
    use mrtd_utils::oid::Oid;

    fn attribute(oid: &Oid, value: &[u8]) -> Vec<u8> {
        let mut e = Encoder::new();
        e.write_sequence_with(|e| {
            e.write_oid(&oid.to_der_value()).write_set(value);
        });
        e.finish()
    }

    fn oid_tlv(oid: &Oid) -> Vec<u8> {
        let mut e = Encoder::new();
        e.write_oid(&oid.to_der_value());
        e.finish()
    }

    fn octets(value: &[u8]) -> Vec<u8> {
        let mut e = Encoder::new();
        e.write_octet_string(value);
        e.finish()
    }

    #[test]
    fn test_signed_attributes_rebuilt_as_set() {
        let mut time = Encoder::new();
        time.write_utc_time(1387230198);
        let attrs = [
            attribute(&known::content_type(), &oid_tlv(&known::icao_lds_security_object())),
            attribute(&known::signing_time(), &time.finish()),
            attribute(&known::message_digest(), &octets(&[0xAB; 32])),
        ]
        .concat();

        let parsed = parse_signed_attributes(&attrs).unwrap();
        assert_eq!(parsed.content_type, known::icao_lds_security_object());
        assert_eq!(parsed.message_digest, vec![0xAB; 32]);
        assert_eq!(parsed.signing_time.unwrap().timestamp, 1387230198);
        assert_eq!(parsed.raw[0], 0x31);
        assert_eq!(parsed.raw, enc_set(&attrs));
        // source order is kept, not DER SET OF sorting
        assert_eq!(&parsed.raw[parsed.raw.len() - attrs.len()..], &attrs[..]);
    }

    #[test]
    fn test_signed_attributes_require_digest() {
        let attrs = attribute(&known::content_type(), &oid_tlv(&known::pkcs7_data()));
        let err = parse_signed_attributes(&attrs).unwrap_err();
        assert_eq!(
            err,
            PkiError::MalformedStructure("missing messageDigest attribute".into())
        );
    }

    #[test]
    fn test_unknown_attributes_are_kept_in_raw() {
        let attrs = [
            attribute(&known::content_type(), &oid_tlv(&known::pkcs7_data())),
            attribute(&Oid::new(&[1, 2, 3, 4]), &[0x05, 0x00]),
            attribute(&known::message_digest(), &octets(&[0x01])),
        ]
        .concat();
        let parsed = parse_signed_attributes(&attrs).unwrap();
        assert_eq!(parsed.raw.len(), attrs.len() + 2);
        assert!(parsed.signing_time.is_none());
    }

    #[test]
    fn test_signer_info_with_subject_key_identifier() {
        let mut alg = Encoder::new();
        alg.write_sequence_with(|e| {
            e.write_oid(&known::sha256().to_der_value());
        });
        let alg = alg.finish();
        let mut sig_alg = Encoder::new();
        sig_alg.write_sequence_with(|e| {
            e.write_oid(&known::ecdsa_with_sha256().to_der_value());
        });
        let sig_alg = sig_alg.finish();

        let mut e = Encoder::new();
        e.write_sequence_with(|e| {
            e.write_integer_u64(3)
                .write_tagged(Tag::context(0, false), &[0x01, 0x02])
                .write_raw(&alg)
                .write_raw(&sig_alg)
                .write_octet_string(&[0x30, 0x00]);
        });
        let der = e.finish();
        let info = parse_signer_info(&mut Decoder::new(&der)).unwrap();
        assert_eq!(info.version, 3);
        assert_eq!(info.sid, SignerIdentifier::SubjectKeyIdentifier(vec![1, 2]));
        assert!(info.signed_attrs.is_none());
        assert_eq!(info.signature_algorithm.name(), "ecdsa-with-SHA256");
    }
}
