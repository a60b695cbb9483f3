#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(sod) = mrtd_pki::sod::SecurityObject::from_der(data) {
        let _ = sod.verify_message_digest();
        let _ = sod.signature_algorithm_name();
    }
});
