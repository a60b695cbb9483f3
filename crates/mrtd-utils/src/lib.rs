#![forbid(unsafe_code)]
#![doc = "Utility functions for eMRTD decoding: ASN.1, Base64, PEM, OID, byte values."]

#[cfg(feature = "asn1")]
pub mod asn1;

#[cfg(feature = "base64")]
pub mod base64;

#[cfg(feature = "pem")]
pub mod pem;

#[cfg(feature = "oid")]
pub mod oid;

#[cfg(feature = "bytes")]
pub mod bytes;
