#![forbid(unsafe_code)]
#![doc = "Structural decoding of eMRTD credentials: X.509, CMS SignedData, LDS security objects."]

pub(crate) mod encoding;

pub mod curves;
pub mod digest;
pub mod dg1;
pub mod oid_mapping;
pub mod signature;

#[cfg(feature = "x509")]
pub mod x509;

#[cfg(feature = "x509")]
pub mod csca;

#[cfg(feature = "cms")]
pub mod cms;

#[cfg(feature = "sod")]
pub mod lds;

#[cfg(feature = "sod")]
pub mod sod;
