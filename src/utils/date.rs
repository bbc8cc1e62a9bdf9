//! UTC date utilities without timezone dependencies.
//!
//! Article front-matter carries dates as free-form strings. This module gives
//! them an ordering for listings and a machine-readable form for `<time>`.
//!
//! # Accepted Forms
//!
//! | Input                    | Example                  |
//! |--------------------------|--------------------------|
//! | ISO date                 | `2025-01-15`             |
//! | ISO datetime (UTC)       | `2025-01-15T09:30:00Z`   |
//! | ISO datetime (no zone)   | `2025-01-15T09:30:00`    |
//! | Month name, day, year    | `Jan 15, 2025`           |
//!
//! Anything else is "unparsable" and callers decide how to order it.

use anyhow::{Result, bail};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// UTC datetime without timezone complexity.
///
/// Field order matters: the derived `Ord` compares chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse any of the accepted forms, returning `None` when invalid.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::parse_iso(s).or_else(|| Self::parse_month_name(s))
    }

    /// Parse "YYYY-MM-DD" or "YYYY-MM-DDTHH:MM:SS[Z]".
    fn parse_iso(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match bytes.len() {
            10 => (0, 0, 0),
            19 | 20 if bytes[10] == b'T' => {
                if bytes.len() == 20 && bytes[19] != b'Z' {
                    return None;
                }
                if bytes[13] != b':' || bytes[16] != b':' {
                    return None;
                }
                (
                    parse_u8(&bytes[11..13])?,
                    parse_u8(&bytes[14..16])?,
                    parse_u8(&bytes[17..19])?,
                )
            }
            _ => return None,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    /// Parse "Jan 15, 2025" or "January 15, 2025".
    fn parse_month_name(s: &str) -> Option<Self> {
        let (month_part, rest) = s.split_once(' ')?;
        let (day_part, year_part) = rest.split_once(',')?;

        let prefix = month_part.get(..3)?;
        let month = MONTHS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(prefix))
            .and_then(|i| u8::try_from(i + 1).ok())?;

        let day: u8 = day_part.trim().parse().ok()?;
        let year: u16 = year_part.trim().parse().ok()?;

        let dt = Self::from_ymd(year, month, day);
        dt.validate().ok()?;
        Some(dt)
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as RFC 3339 for `<time datetime="...">`.
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// Human-readable form used on listing rows: `Jan 15, 2025`.
    pub fn to_display(self) -> String {
        format!(
            "{} {}, {:04}",
            MONTHS[usize::from(self.month - 1)],
            self.day,
            self.year
        )
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            DateTimeUtc::parse("2025-01-15"),
            Some(DateTimeUtc::from_ymd(2025, 1, 15))
        );
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            DateTimeUtc::parse("2025-01-15T09:30:45Z"),
            Some(DateTimeUtc::new(2025, 1, 15, 9, 30, 45))
        );
        assert_eq!(
            DateTimeUtc::parse("2025-01-15T09:30:45"),
            Some(DateTimeUtc::new(2025, 1, 15, 9, 30, 45))
        );
    }

    #[test]
    fn test_parse_month_name() {
        assert_eq!(
            DateTimeUtc::parse("Jan 15, 2025"),
            Some(DateTimeUtc::from_ymd(2025, 1, 15))
        );
        assert_eq!(
            DateTimeUtc::parse("january 5, 2024"),
            Some(DateTimeUtc::from_ymd(2024, 1, 5))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(DateTimeUtc::parse(""), None);
        assert_eq!(DateTimeUtc::parse("soon"), None);
        assert_eq!(DateTimeUtc::parse("2025-13-01"), None);
        assert_eq!(DateTimeUtc::parse("2023-02-29"), None);
        assert_eq!(DateTimeUtc::parse("2025-01-15T09:30"), None);
        assert_eq!(DateTimeUtc::parse("Foo 15, 2025"), None);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = DateTimeUtc::parse("2025-01-15").unwrap();
        let b = DateTimeUtc::parse("2025-01-20").unwrap();
        let c = DateTimeUtc::parse("2025-01-20T08:00:00Z").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTimeUtc::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2000, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2023, 2, 29, 12, 0, 0).validate().is_err());
        assert!(DateTimeUtc::new(1900, 2, 29, 12, 0, 0).validate().is_err());
    }

    #[test]
    fn test_validate_invalid_time() {
        assert!(DateTimeUtc::new(2024, 6, 15, 24, 0, 0).validate().is_err());
        assert!(DateTimeUtc::new(2024, 6, 15, 12, 60, 0).validate().is_err());
        assert!(DateTimeUtc::new(2024, 6, 15, 12, 30, 60).validate().is_err());
    }

    #[test]
    fn test_formats() {
        let dt = DateTimeUtc::from_ymd(2025, 1, 15);
        assert_eq!(dt.to_rfc3339(), "2025-01-15T00:00:00Z");
        assert_eq!(dt.to_display(), "Jan 15, 2025");
    }
}
