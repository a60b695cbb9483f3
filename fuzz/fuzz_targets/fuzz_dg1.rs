#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mrz) = mrtd_pki::dg1::Mrz::from_dg1(data) {
        let _ = mrz.check_digits_valid();
    }
    let _ = mrtd_pki::dg1::Mrz::parse(data);
});
