//! Inputs of the CSC-signs-DSC check.

use mrtd_pki::csca::CscCandidate;
use mrtd_pki::x509::{Certificate, PublicKeyMaterial};
use mrtd_types::InputError;
use mrtd_utils::bytes::ByteValue;
use serde::Serialize;

use crate::config::{InputConfig, TBS_WIDTHS};
use crate::fields::{pad, pick_width, KeyFields};
use crate::profile::SignerProfile;

/// Fixed-shape record proving the CSC signed the DSC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DscInputs {
    /// Circuit identifier of the CSC's signature over the TBS.
    pub signature_algorithm: String,
    /// TBS certificate, zero padded to a contract width.
    pub tbs_certificate: Vec<u8>,
    pub tbs_certificate_len: usize,
    /// Offset of the DSC public key inside the TBS certificate.
    pub dsc_pubkey_offset: usize,
    pub csc_pubkey: KeyFields,
    pub dsc_signature: Vec<u8>,
}

impl DscInputs {
    pub fn assemble(
        dsc: &Certificate,
        csc: &CscCandidate,
        config: &InputConfig,
    ) -> Result<Self, InputError> {
        let profile = SignerProfile::resolve(&dsc.signature_algorithm, None, &csc.public_key)?;
        let tbs = &dsc.tbs_raw;
        let width = pick_width("TBS certificate", tbs.len(), &TBS_WIDTHS, config.tbs_width)?;
        let dsc_pubkey_offset = public_key_offset(tbs, &dsc.public_key_material()?)?;
        let csc_pubkey = KeyFields::from_key(&csc.public_key)?;
        let dsc_signature = csc_pubkey.signature(&dsc.signature_value, &profile)?;

        log::debug!(
            "DSC inputs: {} over {} TBS bytes padded to {width}",
            profile.name(),
            tbs.len()
        );
        Ok(DscInputs {
            signature_algorithm: profile.name(),
            tbs_certificate: pad("TBS certificate", tbs, width)?,
            tbs_certificate_len: tbs.len(),
            dsc_pubkey_offset,
            csc_pubkey,
            dsc_signature,
        })
    }
}

/// Offset of the key material inside `tbs`: the RSA modulus magnitude, or
/// the EC point coordinates `x ‖ y`.
pub fn public_key_offset(tbs: &[u8], key: &PublicKeyMaterial) -> Result<usize, InputError> {
    let needle = match key {
        PublicKeyMaterial::Rsa { modulus, .. } => modulus.clone(),
        PublicKeyMaterial::Ec { x, y, .. } => x.concat(y),
    };
    ByteValue::from_slice(tbs)
        .find(needle.as_bytes())
        .ok_or(InputError::PublicKeyNotFound)
}
