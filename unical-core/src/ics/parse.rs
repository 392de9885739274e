//! Feed decoding.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::escape::unescape_text;
use crate::event::{CandidateEvent, default_duration};
use crate::org_zone::OrgZone;

/// Decodes feed text into candidate events.
///
/// Decoding is lossy on purpose: a block missing `UID`, `DTSTART` or a
/// non-empty `SUMMARY` is dropped, as is any line that is not a property.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    zone: OrgZone,
}

/// Properties collected from one `VEVENT` block
#[derive(Default)]
struct PartialEvent {
    uid: Option<String>,
    summary: Option<String>,
    location: Option<String>,
    description: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Decoder {
    pub fn new(zone: OrgZone) -> Self {
        Decoder { zone }
    }

    pub fn decode(&self, content: &str) -> Vec<CandidateEvent> {
        let mut events = Vec::new();
        let mut current: Option<PartialEvent> = None;

        for line in unfold(content) {
            match line.as_str() {
                "BEGIN:VEVENT" => current = Some(PartialEvent::default()),
                "END:VEVENT" => {
                    if let Some(event) = current.take().and_then(PartialEvent::finish) {
                        events.push(event);
                    }
                }
                _ => {
                    if let Some(partial) = current.as_mut() {
                        self.apply_property(partial, &line);
                    }
                }
            }
        }

        events
    }

    fn apply_property(&self, partial: &mut PartialEvent, line: &str) {
        let Some((key, value)) = split_property(line) else {
            return;
        };

        match key {
            "UID" => partial.uid = Some(unescape_text(value)),
            "SUMMARY" => partial.summary = Some(unescape_text(value)),
            "LOCATION" => partial.location = Some(unescape_text(value)),
            "DESCRIPTION" => partial.description = Some(unescape_text(value)),
            "DTSTART" => partial.start = self.parse_datetime(value),
            "DTEND" => partial.end = self.parse_datetime(value),
            _ => {}
        }
    }

    /// Parse `YYYYMMDD` or `YYYYMMDDTHHMMSS[Z]`.
    ///
    /// A trailing `Z` means UTC; anything else is wall-clock time in the
    /// organizational zone.
    fn parse_datetime(&self, value: &str) -> Option<DateTime<Utc>> {
        let (digits, is_utc) = match value.strip_suffix('Z') {
            Some(rest) => (rest, true),
            None => (value, false),
        };

        let (date_part, time_part) = match digits.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (digits, None),
        };

        if date_part.len() != 8 || !date_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;

        let time = match time_part {
            Some(t) if t.len() == 6 && t.chars().all(|c| c.is_ascii_digit()) => {
                NaiveTime::parse_from_str(t, "%H%M%S").ok()?
            }
            Some(_) => return None,
            None => NaiveTime::MIN,
        };

        let naive = NaiveDateTime::new(date, time);
        if is_utc {
            Some(naive.and_utc())
        } else {
            self.zone.to_utc(naive)
        }
    }
}

impl PartialEvent {
    fn finish(self) -> Option<CandidateEvent> {
        let uid = self.uid?;
        let start = self.start?;
        let summary = self.summary.filter(|s| !s.is_empty())?;
        let end = self
            .end
            .or_else(|| start.checked_add_signed(default_duration()))?;

        Some(CandidateEvent {
            uid,
            summary,
            location: self.location,
            description: self.description,
            start,
            end,
        })
    }
}

/// Split content into logical lines.
///
/// Accepts LF, CR and CRLF endings. A line starting with a space or tab
/// continues the previous one; it is appended with its leading whitespace
/// removed. Every resulting line is trimmed.
fn unfold(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();

    for raw in normalized.split('\n') {
        if raw.starts_with(' ') || raw.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(raw.trim());
            }
        } else {
            lines.push(raw.trim().to_string());
        }
    }

    lines
}

/// Split `KEY[;PARAMS]:VALUE` into the bare key and the value.
fn split_property(line: &str) -> Option<(&str, &str)> {
    let (key_part, value) = line.split_once(':')?;
    let key = key_part.split(';').next().unwrap_or(key_part);
    Some((key, value))
}
