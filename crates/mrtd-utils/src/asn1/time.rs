//! UTCTime / GeneralizedTime conversion.

use mrtd_types::CryptoError;

/// A decoded ASN.1 time value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1Time {
    /// Seconds since 1970-01-01T00:00:00Z.
    pub timestamp: i64,
    /// The time string exactly as encoded.
    pub text: String,
    /// True for GeneralizedTime, false for UTCTime.
    pub generalized: bool,
}

impl Asn1Time {
    /// Decode the content octets of a UTCTime (`0x17`) or GeneralizedTime
    /// (`0x18`). Also used for IMPLICIT-tagged times whose universal tag
    /// number is known from the schema.
    pub fn parse(tag_number: u32, value: &[u8]) -> Result<Self, CryptoError> {
        let text = core::str::from_utf8(value).map_err(|_| CryptoError::DecodeAsn1Fail)?;
        let (timestamp, generalized) = match tag_number {
            0x17 => (parse_utc_time(text)?, false),
            0x18 => (parse_generalized_time(text)?, true),
            _ => return Err(CryptoError::DecodeAsn1Fail),
        };
        Ok(Asn1Time {
            timestamp,
            text: text.to_string(),
            generalized,
        })
    }

    /// Format as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_rfc3339(&self) -> String {
        format_rfc3339(self.timestamp)
    }
}

/// Format a UNIX timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
pub(crate) fn format_rfc3339(timestamp: i64) -> String {
    let (y, mo, d, h, mi, s) = unix_to_datetime(timestamp);
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z")
}

fn digits(s: &str, range: core::ops::Range<usize>) -> Result<u32, CryptoError> {
    let part = s.get(range).ok_or(CryptoError::DecodeAsn1Fail)?;
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CryptoError::DecodeAsn1Fail);
    }
    part.parse().map_err(|_| CryptoError::DecodeAsn1Fail)
}

/// "YYMMDDHHMMSSZ". RFC 5280: 00-49 → 20xx, 50-99 → 19xx.
fn parse_utc_time(s: &str) -> Result<i64, CryptoError> {
    let s = s.strip_suffix('Z').unwrap_or(s);
    if s.len() != 12 {
        return Err(CryptoError::DecodeAsn1Fail);
    }
    let yy = digits(s, 0..2)?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    datetime_to_unix(
        year,
        digits(s, 2..4)?,
        digits(s, 4..6)?,
        digits(s, 6..8)?,
        digits(s, 8..10)?,
        digits(s, 10..12)?,
    )
}

/// "YYYYMMDDHHMMSSZ", fractional seconds ignored.
fn parse_generalized_time(s: &str) -> Result<i64, CryptoError> {
    let s = s.strip_suffix('Z').unwrap_or(s);
    let s = s.split('.').next().unwrap_or(s);
    if s.len() != 14 {
        return Err(CryptoError::DecodeAsn1Fail);
    }
    datetime_to_unix(
        digits(s, 0..4)?,
        digits(s, 4..6)?,
        digits(s, 6..8)?,
        digits(s, 8..10)?,
        digits(s, 10..12)?,
        digits(s, 12..14)?,
    )
}

pub(crate) fn datetime_to_unix(
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> Result<i64, CryptoError> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || min > 59 || sec > 59 {
        return Err(CryptoError::DecodeAsn1Fail);
    }
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let m = (if month <= 2 { month + 9 } else { month - 3 }) as i64;
    let days = 365 * y + y / 4 - y / 100 + y / 400 + (m * 306 + 5) / 10 + (day as i64 - 1) - 719_468;
    Ok(days * 86_400 + hour as i64 * 3600 + min as i64 * 60 + sec as i64)
}

/// Civil date from days since the epoch.
pub(crate) fn unix_to_datetime(timestamp: i64) -> (i64, u32, u32, u32, u32, u32) {
    let days = timestamp.div_euclid(86_400);
    let secs = timestamp.rem_euclid(86_400) as u32;

    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe as i64 + era * 400 + if month <= 2 { 1 } else { 0 };

    (year, month, day, secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(datetime_to_unix(1970, 1, 1, 0, 0, 0).unwrap(), 0);
        assert_eq!(unix_to_datetime(0), (1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_utc_time() {
        let t = Asn1Time::parse(0x17, b"131216214318Z").unwrap();
        assert_eq!(t.timestamp, 1_387_230_198);
        assert_eq!(t.text, "131216214318Z");
        assert!(!t.generalized);
        assert_eq!(t.to_rfc3339(), "2013-12-16T21:43:18Z");
    }

    #[test]
    fn test_generalized_time_leap_day() {
        let t = Asn1Time::parse(0x18, b"20240229000000Z").unwrap();
        assert_eq!(t.timestamp, 1_709_164_800);
        assert!(t.generalized);
        assert_eq!(t.to_rfc3339(), "2024-02-29T00:00:00Z");
    }

    #[test]
    fn test_utc_century_window() {
        let t = Asn1Time::parse(0x17, b"991231235959Z").unwrap();
        assert_eq!(t.to_rfc3339(), "1999-12-31T23:59:59Z");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Asn1Time::parse(0x17, b"13121621431Z").is_err());
        assert!(Asn1Time::parse(0x17, b"13130121431 Z").is_err());
        assert!(Asn1Time::parse(0x18, b"2013+216214318Z").is_err());
        assert!(Asn1Time::parse(0x04, b"131216214318Z").is_err());
    }
}
