#![no_main]
use libfuzzer_sys::fuzz_target;
use mrtd_utils::asn1::Decoder;

fn walk(mut decoder: Decoder<'_>, depth: usize) {
    while !decoder.is_empty() {
        let Ok(tlv) = decoder.read_tlv() else {
            break;
        };
        if tlv.tag.constructed && depth < 16 {
            walk(Decoder::new(tlv.value), depth + 1);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    walk(Decoder::new(data), 0);
    let _ = Decoder::new(data).read_time();
});
