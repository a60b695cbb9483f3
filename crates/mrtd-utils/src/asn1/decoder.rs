//! ASN.1 DER decoder.

use super::{Asn1Time, Tag, TagClass, Tlv};
use mrtd_types::CryptoError;

/// A streaming ASN.1 DER decoder over a borrowed buffer.
///
/// Every value returned borrows from the input, so sub-structures that are
/// later hashed can be handed out as their original byte spans.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder over the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the remaining undecoded bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Current offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Parse the next TLV element.
    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, CryptoError> {
        if self.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let start = self.pos;
        let (tag, tag_len) = Tag::from_bytes(&self.data[self.pos..])?;
        self.pos += tag_len;

        let length = match self.read_length() {
            Ok(len) => len,
            Err(e) => {
                self.pos = start;
                return Err(e);
            }
        };
        let end = match self.pos.checked_add(length) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                self.pos = start;
                return Err(CryptoError::DecodeAsn1Fail);
            }
        };

        let value = &self.data[self.pos..end];
        self.pos = end;
        Ok(Tlv {
            tag,
            value,
            raw: &self.data[start..end],
        })
    }

    /// Read the next element and return its complete encoding
    /// (tag ‖ length ‖ value) exactly as it appears in the input.
    pub fn read_raw_tlv(&mut self) -> Result<&'a [u8], CryptoError> {
        Ok(self.read_tlv()?.raw)
    }

    /// Parse a DER length. Indefinite lengths are rejected.
    fn read_length(&mut self) -> Result<usize, CryptoError> {
        let first = *self.data.get(self.pos).ok_or(CryptoError::DecodeAsn1Fail)?;
        self.pos += 1;

        match first {
            0x00..=0x7F => Ok(first as usize),
            0x80 => Err(CryptoError::DecodeAsn1Fail),
            _ => {
                let count = (first & 0x7F) as usize;
                let bytes = self
                    .data
                    .get(self.pos..self.pos + count)
                    .filter(|_| count <= 4)
                    .ok_or(CryptoError::DecodeAsn1Fail)?;
                self.pos += count;
                Ok(bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize))
            }
        }
    }

    fn read_universal(&mut self, number: u32) -> Result<Tlv<'a>, CryptoError> {
        let tlv = self.read_tlv()?;
        if !tlv.tag.is_universal(number) {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(tlv)
    }

    /// Read an INTEGER and return its content bytes (two's complement,
    /// may carry a leading zero).
    pub fn read_integer(&mut self) -> Result<&'a [u8], CryptoError> {
        let tlv = self.read_universal(0x02)?;
        if tlv.value.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(tlv.value)
    }

    /// Read a non-negative INTEGER that fits in a `u64`.
    pub fn read_integer_u64(&mut self) -> Result<u64, CryptoError> {
        let bytes = self.read_integer()?;
        if bytes[0] & 0x80 != 0 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let bytes = match bytes {
            [0, rest @ ..] if !rest.is_empty() => rest,
            _ => bytes,
        };
        if bytes.len() > 8 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<&'a [u8], CryptoError> {
        Ok(self.read_universal(0x04)?.value)
    }

    /// Read a BIT STRING and return (unused_bits, data).
    pub fn read_bit_string(&mut self) -> Result<(u8, &'a [u8]), CryptoError> {
        let tlv = self.read_universal(0x03)?;
        match tlv.value {
            [unused, data @ ..] if *unused < 8 => Ok((*unused, data)),
            _ => Err(CryptoError::DecodeAsn1Fail),
        }
    }

    /// Read an OID and return the raw content bytes.
    pub fn read_oid(&mut self) -> Result<&'a [u8], CryptoError> {
        let tlv = self.read_universal(0x06)?;
        if tlv.value.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(tlv.value)
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<(), CryptoError> {
        let tlv = self.read_universal(0x05)?;
        if !tlv.value.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(())
    }

    /// Read a BOOLEAN value.
    pub fn read_boolean(&mut self) -> Result<bool, CryptoError> {
        let tlv = self.read_universal(0x01)?;
        match tlv.value {
            [b] => Ok(*b != 0x00),
            _ => Err(CryptoError::DecodeAsn1Fail),
        }
    }

    /// Read a SEQUENCE, returning a sub-decoder over its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder<'a>, CryptoError> {
        let tlv = self.read_universal(0x10)?;
        if !tlv.tag.constructed {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(Decoder::new(tlv.value))
    }

    /// Read a SET, returning a sub-decoder over its contents.
    pub fn read_set(&mut self) -> Result<Decoder<'a>, CryptoError> {
        let tlv = self.read_universal(0x11)?;
        if !tlv.tag.constructed {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(Decoder::new(tlv.value))
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Result<Tag, CryptoError> {
        if self.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let (tag, _) = Tag::from_bytes(&self.data[self.pos..])?;
        Ok(tag)
    }

    /// Read a context-specific element with the expected number and form.
    pub fn read_context_specific(
        &mut self,
        tag_num: u32,
        constructed: bool,
    ) -> Result<Tlv<'a>, CryptoError> {
        let tlv = self.read_tlv()?;
        if tlv.tag != Tag::context(tag_num, constructed) {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(tlv)
    }

    /// Try to read a context-specific element. Returns `None` without
    /// consuming anything if the next tag does not match.
    pub fn try_read_context_specific(
        &mut self,
        tag_num: u32,
        constructed: bool,
    ) -> Result<Option<Tlv<'a>>, CryptoError> {
        if self.is_empty() || self.peek_tag()? != Tag::context(tag_num, constructed) {
            return Ok(None);
        }
        self.read_tlv().map(Some)
    }

    /// Read an `[n] EXPLICIT` wrapper, returning a decoder over its content.
    pub fn read_explicit(&mut self, tag_num: u32) -> Result<Decoder<'a>, CryptoError> {
        Ok(Decoder::new(self.read_context_specific(tag_num, true)?.value))
    }

    /// Read an application-class element with the expected number.
    pub fn read_application(&mut self, number: u32) -> Result<Tlv<'a>, CryptoError> {
        let tlv = self.read_tlv()?;
        if tlv.tag.class != TagClass::Application || tlv.tag.number != number {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(tlv)
    }

    /// Read a directory string (UTF8String, PrintableString, IA5String,
    /// T61String or BMPString).
    pub fn read_string(&mut self) -> Result<String, CryptoError> {
        let tlv = self.read_tlv()?;
        if tlv.tag.class != TagClass::Universal {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        match tlv.tag.number {
            0x0C | 0x13 | 0x16 => {
                String::from_utf8(tlv.value.to_vec()).map_err(|_| CryptoError::DecodeAsn1Fail)
            }
            // TeletexString, read as Latin-1.
            0x14 => Ok(tlv.value.iter().map(|&b| b as char).collect()),
            0x1E => {
                if tlv.value.len() % 2 != 0 {
                    return Err(CryptoError::DecodeAsn1Fail);
                }
                let units: Vec<u16> = tlv
                    .value
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|_| CryptoError::DecodeAsn1Fail)
            }
            _ => Err(CryptoError::DecodeAsn1Fail),
        }
    }

    /// Read a UTCTime or GeneralizedTime, keeping the original text.
    pub fn read_utc_or_generalized(&mut self) -> Result<Asn1Time, CryptoError> {
        let tlv = self.read_tlv()?;
        if tlv.tag.class != TagClass::Universal {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Asn1Time::parse(tlv.tag.number, tlv.value)
    }

    /// Read a time value as a UNIX timestamp.
    pub fn read_time(&mut self) -> Result<i64, CryptoError> {
        Ok(self.read_utc_or_generalized()?.timestamp)
    }
}
