//! Locating the Country Signing Certificate that issued a DSC.

use mrtd_types::PkiError;

use crate::x509::{parse_pem_bundle, Certificate, PrivateKeyUsagePeriod, PublicKeyMaterial};

/// One entry of the externally supplied CSC set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscCandidate {
    /// Country code as it appears in the certificate.
    pub country: String,
    pub public_key: PublicKeyMaterial,
    pub subject_key_identifier: Option<Vec<u8>>,
    pub authority_key_identifier: Option<Vec<u8>>,
    /// Window in which the CSC may sign. Taken from the private key usage
    /// period, else from the validity period.
    pub usage_window: Option<PrivateKeyUsagePeriod>,
}

impl CscCandidate {
    /// Build a candidate from a decoded CSC. The country comes from the
    /// subject, falling back to the issuer.
    pub fn from_certificate(cert: &Certificate) -> Result<Self, PkiError> {
        let country = cert
            .subject
            .get("C")
            .or_else(|| cert.issuer_country())
            .ok_or_else(|| {
                PkiError::MalformedStructure(format!("CSC {} has no country", cert.subject))
            })?
            .to_string();
        let usage_window = match cert.private_key_usage_period()? {
            Some(period) => Some(period),
            None => Some(PrivateKeyUsagePeriod {
                not_before: Some(cert.not_before.timestamp),
                not_after: Some(cert.not_after.timestamp),
            }),
        };
        Ok(CscCandidate {
            country,
            public_key: cert.public_key_material()?,
            subject_key_identifier: cert.subject_key_identifier()?,
            authority_key_identifier: cert
                .authority_key_identifier()?
                .and_then(|aki| aki.key_identifier),
            usage_window,
        })
    }
}

/// Build candidates from a concatenated PEM masterlist. Certificates that
/// cannot serve as a candidate are skipped with a warning; a masterlist
/// that is not valid PEM/DER is an error.
pub fn load_masterlist_pem(pem: &str) -> Result<Vec<CscCandidate>, PkiError> {
    let certs = parse_pem_bundle(pem)?;
    let mut candidates = Vec::with_capacity(certs.len());
    for cert in &certs {
        match CscCandidate::from_certificate(cert) {
            Ok(c) => candidates.push(c),
            Err(e) => log::warn!("skipping masterlist entry {}: {e}", cert.subject),
        }
    }
    Ok(candidates)
}

/// What the DSC says about its issuer.
struct IssuerRefs {
    country: String,
    key_identifier: Option<Vec<u8>>,
    usage_period: Option<PrivateKeyUsagePeriod>,
}

impl IssuerRefs {
    fn from_dsc(dsc: &Certificate) -> Result<Self, PkiError> {
        let country = dsc
            .issuer_country()
            .ok_or_else(|| {
                PkiError::MalformedStructure(format!("DSC issuer {} has no country", dsc.issuer))
            })?
            .to_string();
        Ok(IssuerRefs {
            country,
            key_identifier: dsc.authority_key_identifier()?.and_then(|a| a.key_identifier),
            usage_period: dsc.private_key_usage_period()?,
        })
    }

    fn accepts(&self, candidate: &CscCandidate) -> bool {
        if !same_country(&self.country, &candidate.country) {
            return false;
        }
        let key_match = matches!(
            (&self.key_identifier, &candidate.subject_key_identifier),
            (Some(aki), Some(ski)) if aki == ski
        );
        let period_match = match (&self.usage_period, &candidate.usage_window) {
            (Some(period), Some(window)) => period.is_within(window),
            _ => false,
        };
        key_match || period_match
    }
}

fn same_country(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn select<'a>(refs: &IssuerRefs, candidates: &'a [CscCandidate]) -> Option<&'a CscCandidate> {
    candidates.iter().find(|c| refs.accepts(c))
}

/// The first candidate that issued `dsc`, or `None` (logged) if there is
/// none.
pub fn find_csc<'a>(dsc: &Certificate, candidates: &'a [CscCandidate]) -> Option<&'a CscCandidate> {
    let refs = match IssuerRefs::from_dsc(dsc) {
        Ok(refs) => refs,
        Err(e) => {
            log::warn!("cannot read issuer references of DSC {}: {e}", dsc.subject);
            return None;
        }
    };
    let found = select(&refs, candidates);
    if found.is_none() {
        log::warn!(
            "no CSC among {} candidates matches DSC {} (country {})",
            candidates.len(),
            dsc.subject,
            refs.country
        );
    }
    found
}

/// Like [`find_csc`], but a missing CSC is an error.
pub fn require_csc<'a>(
    dsc: &Certificate,
    candidates: &'a [CscCandidate],
) -> Result<&'a CscCandidate, PkiError> {
    let refs = IssuerRefs::from_dsc(dsc)?;
    select(&refs, candidates).ok_or_else(|| {
        PkiError::CertificateNotFound(format!("no CSC for {} issued by {}", dsc.subject, dsc.issuer))
    })
}
