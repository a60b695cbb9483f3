//! ASN.1 DER encoder.

use super::time::unix_to_datetime;
use super::{tags, Tag};

/// A builder for DER-encoded ASN.1 data.
///
/// Used to reconstruct canonical encodings (the signed attribute SET) and
/// to synthesize structures in tests.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Consume the encoder and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Write a TLV with a single-byte tag.
    pub fn write_tlv(&mut self, tag: u8, value: &[u8]) -> &mut Self {
        self.buf.push(tag);
        self.write_length(value.len());
        self.buf.extend_from_slice(value);
        self
    }

    /// Write a TLV with an arbitrary (possibly multi-byte) tag.
    pub fn write_tagged(&mut self, tag: Tag, value: &[u8]) -> &mut Self {
        self.buf.extend(tag.to_bytes());
        self.write_length(value.len());
        self.buf.extend_from_slice(value);
        self
    }

    /// Write a DER length: short form below 128, else minimal long form.
    fn write_length(&mut self, length: usize) {
        if length < 0x80 {
            self.buf.push(length as u8);
            return;
        }
        let be = length.to_be_bytes();
        let skip = be.iter().take_while(|&&b| b == 0).count();
        self.buf.push(0x80 | (be.len() - skip) as u8);
        self.buf.extend_from_slice(&be[skip..]);
    }

    /// Write an unsigned INTEGER from big-endian magnitude bytes.
    pub fn write_integer(&mut self, value: &[u8]) -> &mut Self {
        let start = value.iter().take_while(|&&b| b == 0).count();
        let magnitude = &value[start.min(value.len().saturating_sub(1))..];
        if magnitude.is_empty() {
            return self.write_tlv(tags::INTEGER, &[0]);
        }
        if magnitude[0] & 0x80 != 0 {
            let mut padded = Vec::with_capacity(magnitude.len() + 1);
            padded.push(0x00);
            padded.extend_from_slice(magnitude);
            self.write_tlv(tags::INTEGER, &padded)
        } else {
            self.write_tlv(tags::INTEGER, magnitude)
        }
    }

    /// Write an INTEGER from a `u64`.
    pub fn write_integer_u64(&mut self, value: u64) -> &mut Self {
        self.write_integer(&value.to_be_bytes())
    }

    /// Write an OCTET STRING.
    pub fn write_octet_string(&mut self, value: &[u8]) -> &mut Self {
        self.write_tlv(tags::OCTET_STRING, value)
    }

    /// Write a BIT STRING with the given unused-bits count.
    pub fn write_bit_string(&mut self, unused_bits: u8, value: &[u8]) -> &mut Self {
        let mut content = Vec::with_capacity(value.len() + 1);
        content.push(unused_bits);
        content.extend_from_slice(value);
        self.write_tlv(tags::BIT_STRING, &content)
    }

    /// Write an OID from its encoded content bytes.
    pub fn write_oid(&mut self, oid_bytes: &[u8]) -> &mut Self {
        self.write_tlv(tags::OID, oid_bytes)
    }

    /// Write a NULL.
    pub fn write_null(&mut self) -> &mut Self {
        self.write_tlv(tags::NULL, &[])
    }

    /// Write a BOOLEAN.
    pub fn write_boolean(&mut self, val: bool) -> &mut Self {
        self.write_tlv(tags::BOOLEAN, &[if val { 0xFF } else { 0x00 }])
    }

    /// Write a SEQUENCE wrapping already-encoded contents.
    pub fn write_sequence(&mut self, contents: &[u8]) -> &mut Self {
        self.write_tlv(tags::SEQUENCE, contents)
    }

    /// Write a SET wrapping already-encoded contents, in the given order.
    pub fn write_set(&mut self, contents: &[u8]) -> &mut Self {
        self.write_tlv(tags::SET, contents)
    }

    /// Write a SEQUENCE whose contents are produced by `f`.
    pub fn write_sequence_with(&mut self, f: impl FnOnce(&mut Encoder)) -> &mut Self {
        let mut inner = Encoder::new();
        f(&mut inner);
        self.write_sequence(&inner.finish())
    }

    /// Write a SET whose contents are produced by `f`.
    pub fn write_set_with(&mut self, f: impl FnOnce(&mut Encoder)) -> &mut Self {
        let mut inner = Encoder::new();
        f(&mut inner);
        self.write_set(&inner.finish())
    }

    /// Write raw bytes that are already DER-encoded.
    pub fn write_raw(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Write a UTF8String.
    pub fn write_utf8_string(&mut self, s: &str) -> &mut Self {
        self.write_tlv(tags::UTF8_STRING, s.as_bytes())
    }

    /// Write a PrintableString.
    pub fn write_printable_string(&mut self, s: &str) -> &mut Self {
        self.write_tlv(tags::PRINTABLE_STRING, s.as_bytes())
    }

    /// Write a context-specific element.
    pub fn write_context_specific(
        &mut self,
        tag_num: u8,
        constructed: bool,
        content: &[u8],
    ) -> &mut Self {
        self.write_tagged(Tag::context(tag_num as u32, constructed), content)
    }

    /// Write a UTCTime (`YYMMDDHHMMSSZ`) from a UNIX timestamp.
    pub fn write_utc_time(&mut self, timestamp: i64) -> &mut Self {
        let (y, mo, d, h, mi, s) = unix_to_datetime(timestamp);
        let text = format!("{:02}{mo:02}{d:02}{h:02}{mi:02}{s:02}Z", y.rem_euclid(100));
        self.write_tlv(tags::UTC_TIME, text.as_bytes())
    }

    /// Write a GeneralizedTime (`YYYYMMDDHHMMSSZ`) from a UNIX timestamp.
    pub fn write_generalized_time(&mut self, timestamp: i64) -> &mut Self {
        let (y, mo, d, h, mi, s) = unix_to_datetime(timestamp);
        let text = format!("{y:04}{mo:02}{d:02}{h:02}{mi:02}{s:02}Z");
        self.write_tlv(tags::GENERALIZED_TIME, text.as_bytes())
    }

    /// Write a Time: UTCTime for 1950-2049, GeneralizedTime otherwise
    /// (RFC 5280 §4.1.2.5).
    pub fn write_time(&mut self, timestamp: i64) -> &mut Self {
        let (year, ..) = unix_to_datetime(timestamp);
        if (1950..2050).contains(&year) {
            self.write_utc_time(timestamp)
        } else {
            self.write_generalized_time(timestamp)
        }
    }
}
