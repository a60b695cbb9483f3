//! ASN.1 identifier octets.

use super::{Tag, TagClass};
use mrtd_types::CryptoError;

impl TagClass {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        }
    }
}

impl Tag {
    /// A universal-class tag.
    pub const fn universal(number: u32, constructed: bool) -> Self {
        Tag {
            class: TagClass::Universal,
            constructed,
            number,
        }
    }

    /// A context-specific tag.
    pub const fn context(number: u32, constructed: bool) -> Self {
        Tag {
            class: TagClass::ContextSpecific,
            constructed,
            number,
        }
    }

    /// An application-class tag (e.g. the LDS data group wrappers).
    pub const fn application(number: u32, constructed: bool) -> Self {
        Tag {
            class: TagClass::Application,
            constructed,
            number,
        }
    }

    /// True for a universal tag with the given number.
    pub fn is_universal(&self, number: u32) -> bool {
        self.class == TagClass::Universal && self.number == number
    }

    /// Parse identifier octets from the start of `input`.
    /// Returns the tag and the number of bytes consumed.
    pub fn from_bytes(input: &[u8]) -> Result<(Self, usize), CryptoError> {
        let first = *input.first().ok_or(CryptoError::NullInput)?;
        let class = TagClass::from_bits(first >> 6);
        let constructed = first & 0x20 != 0;

        if first & 0x1F != 0x1F {
            let tag = Tag {
                class,
                constructed,
                number: (first & 0x1F) as u32,
            };
            return Ok((tag, 1));
        }

        // High tag number form: base-128 continuation octets.
        let mut number: u32 = 0;
        for (i, &byte) in input.iter().enumerate().skip(1) {
            if number > (u32::MAX >> 7) {
                return Err(CryptoError::DecodeAsn1Fail);
            }
            number = (number << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok((
                    Tag {
                        class,
                        constructed,
                        number,
                    },
                    i + 1,
                ));
            }
        }
        Err(CryptoError::DecodeAsn1Fail)
    }

    /// Encode the identifier octets.
    pub fn to_bytes(&self) -> Vec<u8> {
        let lead = self.class.bits() | if self.constructed { 0x20 } else { 0 };
        if self.number < 0x1F {
            return vec![lead | self.number as u8];
        }

        let mut groups = Vec::new();
        let mut num = self.number;
        loop {
            groups.push((num & 0x7F) as u8);
            num >>= 7;
            if num == 0 {
                break;
            }
        }
        let mut out = Vec::with_capacity(groups.len() + 1);
        out.push(lead | 0x1F);
        let last = groups.len() - 1;
        for (i, g) in groups.iter().rev().enumerate() {
            out.push(if i < last { g | 0x80 } else { *g });
        }
        out
    }
}
