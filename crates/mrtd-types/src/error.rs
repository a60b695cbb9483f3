/// Low-level encoding, decoding and arithmetic errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    // General errors
    #[error("null or empty input")]
    NullInput,
    #[error("invalid argument")]
    InvalidArg,

    // Byte value errors
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("length mismatch: {left} vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },

    // BigNum errors
    #[error("big number: division by zero")]
    BnDivisionByZero,
    #[error("big number: negative result")]
    BnNegativeResult,
    #[error("big number: head limb of {len} bytes exceeds the {max}-byte limb")]
    BnLimbOverflow { len: usize, max: usize },

    // Encoding/Decoding errors
    #[error("decode: asn1 buffer failed")]
    DecodeAsn1Fail,
    #[error("decode: unknown oid")]
    DecodeUnknownOid,
}

/// Credential decoding and certificate errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PkiError {
    #[error("malformed structure: {0}")]
    MalformedStructure(String),
    #[error("invalid content type: {0}")]
    InvalidContentType(String),
    #[error("unknown elliptic curve")]
    UnknownCurve,
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("certificate not found: {0}")]
    CertificateNotFound(String),
    #[error("crypto error: {0}")]
    CryptoError(#[from] CryptoError),
}

/// Credential field assembly errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{field} is {len} bytes, exceeds width {width}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        width: usize,
    },
    #[error("public key not found in TBS certificate")]
    PublicKeyNotFound,
    #[error("digest mismatch: {0}")]
    DigestMismatch(String),
    #[error("json error: {0}")]
    Json(String),
    #[error("pki error: {0}")]
    PkiError(#[from] PkiError),
    #[error("crypto error: {0}")]
    CryptoError(#[from] CryptoError),
}

impl PkiError {
    /// Returns true for conditions callers may recover from with a
    /// best-effort result.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PkiError::UnknownCurve | PkiError::CertificateNotFound(_))
    }
}
