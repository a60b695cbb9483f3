//! Base64 (RFC 4648, standard alphabet, padded).

use mrtd_types::CryptoError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const INVALID: u8 = 0xFF;

const DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode bytes to a padded Base64 string.
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let mut block = [0u8; 3];
        block[..chunk.len()].copy_from_slice(chunk);
        let n = u32::from_be_bytes([0, block[0], block[1], block[2]]);

        let symbols = chunk.len() + 1;
        for i in 0..4 {
            if i < symbols {
                out.push(ALPHABET[((n >> (18 - 6 * i)) & 0x3F) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Decode a padded Base64 string. ASCII whitespace is ignored.
pub fn decode(input: &str) -> Result<Vec<u8>, CryptoError> {
    let symbols: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if symbols.len() % 4 != 0 {
        return Err(CryptoError::InvalidEncoding(format!(
            "base64 length {} is not a multiple of 4",
            symbols.len()
        )));
    }

    let groups = symbols.len() / 4;
    let mut out = Vec::with_capacity(groups * 3);
    for (g, quad) in symbols.chunks_exact(4).enumerate() {
        let pad = quad.iter().rev().take_while(|&&c| c == b'=').count();
        if pad > 2 || (pad > 0 && g + 1 != groups) {
            return Err(CryptoError::InvalidEncoding("misplaced base64 padding".into()));
        }

        let mut n: u32 = 0;
        for &c in &quad[..4 - pad] {
            let v = DECODE_TABLE[c as usize];
            if v == INVALID {
                return Err(CryptoError::InvalidEncoding(format!(
                    "invalid base64 symbol {:?}",
                    c as char
                )));
            }
            n = (n << 6) | v as u32;
        }
        n <<= 6 * pad as u32;

        let bytes = n.to_be_bytes();
        out.extend_from_slice(&bytes[1..4 - pad]);
    }
    Ok(out)
}
