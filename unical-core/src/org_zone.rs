//! The single organizational time zone used for floating feed times.
//!
//! There is no timezone database here. Every floating wall-clock value in
//! an imported feed is read as local time at one fixed UTC offset, and the
//! encoder writes times back at that same offset tagged with `tzid`. A
//! deployment for another organization changes the offset in config.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use crate::error::{UnicalError, UnicalResult};

pub const DEFAULT_UTC_OFFSET: &str = "+08:00";
pub const DEFAULT_TZID: &str = "Asia/Hong_Kong";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgZone {
    pub offset: FixedOffset,
    /// Label written as the `TZID` parameter on encoded times.
    pub tzid: String,
}

impl Default for OrgZone {
    fn default() -> Self {
        OrgZone {
            offset: FixedOffset::east_opt(8 * 3600).expect("+08:00 is a valid offset"),
            tzid: DEFAULT_TZID.to_string(),
        }
    }
}

impl OrgZone {
    pub fn new(offset: FixedOffset, tzid: impl Into<String>) -> Self {
        OrgZone {
            offset,
            tzid: tzid.into(),
        }
    }

    /// Build a zone from an offset string like `+08:00`, `-0530` or `Z`.
    pub fn parse(offset: &str, tzid: &str) -> UnicalResult<Self> {
        Ok(OrgZone::new(parse_offset(offset)?, tzid))
    }

    /// Interpret a wall-clock time in this zone as an absolute instant.
    ///
    /// `None` when the shift runs past the representable range.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let offset = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        local.checked_sub_signed(offset).map(|utc| utc.and_utc())
    }

    /// Wall-clock time in this zone for an absolute instant.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// Parse user input either as RFC 3339 or as zone-local `YYYY-MM-DDTHH:MM[:SS]`.
    pub fn parse_input(&self, s: &str) -> UnicalResult<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        let local = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .ok_or_else(|| {
                UnicalError::Validation(format!(
                    "Invalid time '{}'. Expected RFC 3339 or YYYY-MM-DDTHH:MM",
                    s
                ))
            })?;

        self.to_utc(local)
            .ok_or_else(|| UnicalError::Validation(format!("Time '{}' is out of range", s)))
    }

    /// Render an instant in this zone for display.
    pub fn display(&self, instant: DateTime<Utc>) -> String {
        self.offset
            .from_utc_datetime(&instant.naive_utc())
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

fn parse_offset(s: &str) -> UnicalResult<FixedOffset> {
    let s = s.trim();
    if s == "Z" || s == "UTC" {
        return Ok(Utc.fix());
    }

    let invalid = || UnicalError::Config(format!("Invalid UTC offset '{}'", s));

    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
