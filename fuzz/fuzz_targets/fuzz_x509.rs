#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(cert) = mrtd_pki::x509::Certificate::from_der(data) {
        let _ = mrtd_pki::csca::CscCandidate::from_certificate(&cert);
    }
});
