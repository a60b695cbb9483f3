//! Inputs of the DSC-signs-SOD check.

use mrtd_pki::sod::SecurityObject;
use mrtd_types::InputError;
use mrtd_utils::bytes::ByteValue;
use serde::Serialize;

use crate::config::{InputConfig, DG1_WIDTH, SIGNED_ATTRS_WIDTHS};
use crate::fields::{pad, pick_width, KeyFields};
use crate::profile::SignerProfile;

/// Fixed-shape record proving the DSC signed the security object that
/// commits to DG1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdDataInputs {
    /// Circuit identifier of the DSC's signature over the signed attributes.
    pub signature_algorithm: String,
    pub dg1: Vec<u8>,
    /// Offset of the DG1 hash inside the encapsulated content.
    pub dg1_hash_offset: usize,
    pub econtent: Vec<u8>,
    pub econtent_len: usize,
    pub signed_attrs: Vec<u8>,
    pub signed_attrs_len: usize,
    pub dsc_pubkey: KeyFields,
    pub sod_signature: Vec<u8>,
}

impl IdDataInputs {
    /// Build the record. `dg1` must hash to the value the SOD stores for
    /// DG1, and the encapsulated content must hash to the signed
    /// `messageDigest`.
    pub fn assemble(
        sod: &SecurityObject,
        dg1: &[u8],
        config: &InputConfig,
    ) -> Result<Self, InputError> {
        let profile = SignerProfile::resolve(
            &sod.signer_info.signature_algorithm,
            Some(sod.signer_digest_algorithm()?),
            &sod.public_key,
        )?;

        if !sod.verify_data_group(1, dg1)? {
            return Err(InputError::DigestMismatch("DG1".into()));
        }
        if !sod.verify_message_digest()? {
            return Err(InputError::DigestMismatch("encapsulated content".into()));
        }

        let econtent = &sod.encapsulated_content.raw;
        let dg1_hash_offset = sod
            .encapsulated_content
            .hash_of(1)
            .and_then(|hash| ByteValue::from_slice(econtent).find(hash.as_bytes()))
            .ok_or_else(|| InputError::DigestMismatch("DG1 hash not in eContent".into()))?;

        let signed_attrs = &sod.signed_attrs()?.raw;
        let attrs_width = pick_width(
            "signed attributes",
            signed_attrs.len(),
            &SIGNED_ATTRS_WIDTHS,
            config.signed_attrs_width,
        )?;

        let dsc_pubkey = KeyFields::from_key(&sod.public_key)?;
        let sod_signature = dsc_pubkey.signature(&sod.signer_info.signature, &profile)?;

        log::debug!(
            "ID data inputs: {} over {} signed attribute bytes padded to {attrs_width}",
            profile.name(),
            signed_attrs.len()
        );
        Ok(IdDataInputs {
            signature_algorithm: profile.name(),
            dg1: pad("DG1", dg1, DG1_WIDTH)?,
            dg1_hash_offset,
            econtent: pad("encapsulated content", econtent, config.econtent_width)?,
            econtent_len: econtent.len(),
            signed_attrs: pad("signed attributes", signed_attrs, attrs_width)?,
            signed_attrs_len: signed_attrs.len(),
            dsc_pubkey,
            sod_signature,
        })
    }
}
