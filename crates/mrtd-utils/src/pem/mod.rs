//! PEM armor parsing and generation.

use mrtd_types::CryptoError;

/// A decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// The label, e.g. `"CERTIFICATE"`.
    pub label: String,
    /// The decoded binary payload.
    pub data: Vec<u8>,
}

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// Parse every PEM block in `input`. Text outside blocks is skipped, so
/// masterlist dumps with comment lines parse as-is.
pub fn parse(input: &str) -> Result<Vec<PemBlock>, CryptoError> {
    let mut blocks = Vec::new();
    let mut lines = input.lines().map(str::trim);

    while let Some(line) = lines.next() {
        let Some(label) = line.strip_prefix(BEGIN).and_then(|s| s.strip_suffix(DASHES)) else {
            continue;
        };
        let end_marker = format!("{END}{label}{DASHES}");

        let mut body = String::new();
        let mut closed = false;
        for inner in lines.by_ref() {
            if inner == end_marker {
                closed = true;
                break;
            }
            // RFC 1421 header lines ("Proc-Type: ...") carry no payload.
            if !inner.contains(':') {
                body.push_str(inner);
            }
        }
        if !closed {
            return Err(CryptoError::InvalidEncoding(format!(
                "missing PEM end marker for {label}"
            )));
        }

        blocks.push(PemBlock {
            label: label.to_string(),
            data: crate::base64::decode(&body)?,
        });
    }

    Ok(blocks)
}

/// Parse `input` and keep only blocks with the given label.
pub fn parse_label(input: &str, label: &str) -> Result<Vec<Vec<u8>>, CryptoError> {
    Ok(parse(input)?
        .into_iter()
        .filter(|b| b.label == label)
        .map(|b| b.data)
        .collect())
}

/// Encode binary data as PEM, wrapped at 64 columns.
pub fn encode(label: &str, data: &[u8]) -> String {
    let body = crate::base64::encode(data);
    let mut out = format!("{BEGIN}{label}{DASHES}\n");
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(64));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(&format!("{END}{label}{DASHES}\n"));
    out
}
