//! ICAO 9303 LDS security object: the hashes of every data group.

use std::collections::BTreeMap;

use mrtd_types::{HashAlgId, PkiError};
use mrtd_utils::asn1::Decoder;
use mrtd_utils::bytes::ByteValue;

use crate::encoding::{malformed, read_algorithm_identifier};

/// Data group numbers run from DG1 to DG16.
pub const MAX_DATA_GROUP: u8 = 16;

/// `LDSSecurityObject ::= SEQUENCE { version INTEGER, hashAlgorithm
/// AlgorithmIdentifier, dataGroupHashValues SEQUENCE OF DataGroupHash,
/// ldsVersionInfo LDSVersionInfo OPTIONAL }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdsSecurityObject {
    pub version: u64,
    pub hash_algorithm: HashAlgId,
    pub data_group_hashes: BTreeMap<u8, ByteValue>,
    /// `(ldsVersion, unicodeVersion)`, present in v1 objects.
    pub lds_version_info: Option<(String, String)>,
    /// The encoded object exactly as found in the eContent.
    pub raw: Vec<u8>,
}

impl LdsSecurityObject {
    pub fn from_der(data: &[u8]) -> Result<Self, PkiError> {
        let mut top = Decoder::new(data);
        let mut seq = top.read_sequence().map_err(malformed("LDSSecurityObject"))?;
        if !top.is_empty() {
            return Err(PkiError::MalformedStructure(
                "trailing data after LDSSecurityObject".into(),
            ));
        }

        let version = seq
            .read_integer_u64()
            .map_err(malformed("LDSSecurityObject version"))?;

        let alg = read_algorithm_identifier(&mut seq, "LDSSecurityObject hashAlgorithm")?;
        let hash_algorithm = alg
            .hash_alg()
            .ok_or_else(|| PkiError::UnsupportedAlgorithm(format!("digest {}", alg.oid)))?;

        let mut hashes = seq
            .read_sequence()
            .map_err(malformed("dataGroupHashValues"))?;
        let mut data_group_hashes = BTreeMap::new();
        while !hashes.is_empty() {
            let mut entry = hashes.read_sequence().map_err(malformed("DataGroupHash"))?;
            let number = entry
                .read_integer_u64()
                .map_err(malformed("dataGroupNumber"))?;
            let value = entry
                .read_octet_string()
                .map_err(malformed("dataGroupHashValue"))?;

            let number = u8::try_from(number)
                .ok()
                .filter(|n| (1..=MAX_DATA_GROUP).contains(n))
                .ok_or_else(|| {
                    PkiError::MalformedStructure(format!("data group number {number} out of range"))
                })?;
            if data_group_hashes
                .insert(number, ByteValue::from_slice(value))
                .is_some()
            {
                return Err(PkiError::MalformedStructure(format!(
                    "duplicate hash for DG{number}"
                )));
            }
        }

        let lds_version_info = if seq.is_empty() {
            None
        } else {
            let mut info = seq.read_sequence().map_err(malformed("LDSVersionInfo"))?;
            let lds = info.read_string().map_err(malformed("ldsVersion"))?;
            let unicode = info.read_string().map_err(malformed("unicodeVersion"))?;
            Some((lds, unicode))
        };

        Ok(LdsSecurityObject {
            version,
            hash_algorithm,
            data_group_hashes,
            lds_version_info,
            raw: data.to_vec(),
        })
    }

    /// Stored hash of a data group.
    pub fn hash_of(&self, data_group: u8) -> Option<&ByteValue> {
        self.data_group_hashes.get(&data_group)
    }
}
