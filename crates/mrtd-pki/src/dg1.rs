//! DG1: the machine readable zone.
//!
//! DG1 is `61 L { 5F1F L <MRZ text> }`. The MRZ format follows from its
//! length: TD1 cards carry 3 lines of 30 characters, TD2 documents 2 of 36
//! and TD3 passports 2 of 44.

use mrtd_types::PkiError;
use mrtd_utils::asn1::Decoder;

use crate::encoding::malformed;

/// ICAO 9303 document layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrzFormat {
    Td1,
    Td2,
    Td3,
}

impl MrzFormat {
    fn from_len(len: usize) -> Option<Self> {
        match len {
            90 => Some(MrzFormat::Td1),
            72 => Some(MrzFormat::Td2),
            88 => Some(MrzFormat::Td3),
            _ => None,
        }
    }

    pub fn line_len(&self) -> usize {
        match self {
            MrzFormat::Td1 => 30,
            MrzFormat::Td2 => 36,
            MrzFormat::Td3 => 44,
        }
    }
}

/// Field positions inside the concatenated MRZ text.
struct Layout {
    document_number: (usize, usize),
    document_number_check: usize,
    nationality: (usize, usize),
    birth_date: (usize, usize),
    birth_date_check: usize,
    sex: usize,
    expiry_date: (usize, usize),
    expiry_date_check: usize,
    names: (usize, usize),
}

const TD1: Layout = Layout {
    document_number: (5, 14),
    document_number_check: 14,
    nationality: (45, 48),
    birth_date: (30, 36),
    birth_date_check: 36,
    sex: 37,
    expiry_date: (38, 44),
    expiry_date_check: 44,
    names: (60, 90),
};

const TD2: Layout = Layout {
    document_number: (36, 45),
    document_number_check: 45,
    nationality: (46, 49),
    birth_date: (49, 55),
    birth_date_check: 55,
    sex: 56,
    expiry_date: (57, 63),
    expiry_date_check: 63,
    names: (5, 36),
};

const TD3: Layout = Layout {
    document_number: (44, 53),
    document_number_check: 53,
    nationality: (54, 57),
    birth_date: (57, 63),
    birth_date_check: 63,
    sex: 64,
    expiry_date: (65, 71),
    expiry_date_check: 71,
    names: (5, 44),
};

/// A parsed MRZ. Fields keep their MRZ spelling with filler `<` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mrz {
    pub format: MrzFormat,
    /// The MRZ text without line breaks.
    pub text: String,
    pub document_code: String,
    pub issuing_state: String,
    pub document_number: String,
    pub nationality: String,
    /// `YYMMDD`.
    pub birth_date: String,
    pub sex: char,
    /// `YYMMDD`.
    pub expiry_date: String,
    pub primary_identifier: String,
    pub secondary_identifier: String,
}

impl Mrz {
    /// Decode the DG1 file.
    pub fn from_dg1(data: &[u8]) -> Result<Self, PkiError> {
        let mut top = Decoder::new(data);
        let dg1 = top.read_application(1).map_err(malformed("DG1"))?;
        let mrz = Decoder::new(dg1.value)
            .read_application(0x1F)
            .map_err(malformed("DG1 MRZ"))?;
        Self::parse(mrz.value)
    }

    /// Parse bare MRZ text. Line breaks between lines are tolerated.
    pub fn parse(text: &[u8]) -> Result<Self, PkiError> {
        let text: String = text
            .iter()
            .filter(|b| !matches!(b, b'\n' | b'\r'))
            .map(|&b| b as char)
            .collect();
        if let Some(bad) = text
            .chars()
            .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '<'))
        {
            return Err(PkiError::MalformedStructure(format!(
                "invalid MRZ character {bad:?}"
            )));
        }
        let format = MrzFormat::from_len(text.len()).ok_or_else(|| {
            PkiError::MalformedStructure(format!("MRZ of {} characters", text.len()))
        })?;
        let layout = match format {
            MrzFormat::Td1 => &TD1,
            MrzFormat::Td2 => &TD2,
            MrzFormat::Td3 => &TD3,
        };

        let field = |(start, end): (usize, usize)| text[start..end].trim_end_matches('<').to_string();
        let (primary_identifier, secondary_identifier) = split_names(&text[layout.names.0..layout.names.1]);

        Ok(Mrz {
            format,
            document_code: field((0, 2)),
            issuing_state: field((2, 5)),
            document_number: field(layout.document_number),
            nationality: field(layout.nationality),
            birth_date: text[layout.birth_date.0..layout.birth_date.1].to_string(),
            sex: text.as_bytes()[layout.sex] as char,
            expiry_date: text[layout.expiry_date.0..layout.expiry_date.1].to_string(),
            primary_identifier,
            secondary_identifier,
            text,
        })
    }

    /// Check digits of document number, birth date and expiry date.
    pub fn check_digits_valid(&self) -> bool {
        let layout = match self.format {
            MrzFormat::Td1 => &TD1,
            MrzFormat::Td2 => &TD2,
            MrzFormat::Td3 => &TD3,
        };
        let t = self.text.as_bytes();
        [
            (layout.document_number, layout.document_number_check),
            (layout.birth_date, layout.birth_date_check),
            (layout.expiry_date, layout.expiry_date_check),
        ]
        .iter()
        .all(|&((start, end), check)| {
            Some(check_digit(&t[start..end])) == char_value(t[check]).filter(|v| *v < 10)
        })
    }
}

fn split_names(field: &str) -> (String, String) {
    let (primary, secondary) = field.split_once("<<").unwrap_or((field, ""));
    let clean = |s: &str| s.trim_matches('<').replace('<', " ");
    (clean(primary), clean(secondary))
}

fn char_value(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u32),
        b'A'..=b'Z' => Some((c - b'A') as u32 + 10),
        b'<' => Some(0),
        _ => None,
    }
}

/// ICAO 9303 check digit: weights 7, 3, 1 repeating, sum mod 10.
pub fn check_digit(field: &[u8]) -> u32 {
    field
        .iter()
        .zip([7u32, 3, 1].iter().cycle())
        .map(|(&c, w)| char_value(c).unwrap_or(0) * w)
        .sum::<u32>()
        % 10
}
