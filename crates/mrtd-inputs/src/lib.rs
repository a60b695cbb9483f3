#![forbid(unsafe_code)]
#![doc = "Fixed-shape circuit inputs assembled from decoded eMRTD credentials."]

pub mod config;
pub mod dsc;
pub mod fields;
pub mod id_data;
pub mod profile;

use mrtd_pki::csca::{require_csc, CscCandidate};
use mrtd_pki::sod::SecurityObject;
use mrtd_types::InputError;
use serde::Serialize;

pub use config::{InputConfig, InputConfigBuilder};
pub use dsc::DscInputs;
pub use fields::KeyFields;
pub use id_data::IdDataInputs;
pub use profile::SignerProfile;

/// Both circuit records for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialInputs {
    pub dsc: DscInputs,
    pub id_data: IdDataInputs,
}

impl CredentialInputs {
    /// Locate the CSC of the SOD's signer among `candidates` and build both
    /// records.
    pub fn assemble(
        sod: &SecurityObject,
        dg1: &[u8],
        candidates: &[CscCandidate],
        config: &InputConfig,
    ) -> Result<Self, InputError> {
        config.validate()?;
        let csc = require_csc(&sod.certificate, candidates)?;
        Ok(CredentialInputs {
            dsc: DscInputs::assemble(&sod.certificate, csc, config)?,
            id_data: IdDataInputs::assemble(sod, dg1, config)?,
        })
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        serde_json::to_string(self).map_err(|e| InputError::Json(e.to_string()))
    }
}
