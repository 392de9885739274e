//! Feed encoding.

use chrono::{DateTime, Utc};

use super::escape::escape_text;
use crate::event::Event;
use crate::org_zone::OrgZone;

pub const CONTENT_TYPE: &str = "text/calendar";

const PRODID: &str = "-//UniCal Manager//EN";
const CRLF: &str = "\r\n";

/// Encodes events into feed text.
///
/// Start and end are written as wall-clock times in the organizational
/// zone with a `TZID` parameter. `DTSTAMP` is always UTC.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    zone: OrgZone,
}

impl Encoder {
    pub fn new(zone: OrgZone) -> Self {
        Encoder { zone }
    }

    /// Encode with the current time as `DTSTAMP`.
    pub fn encode(&self, events: &[Event]) -> String {
        self.encode_at(events, Utc::now())
    }

    /// Encode with a fixed `DTSTAMP`.
    pub fn encode_at(&self, events: &[Event], stamp: DateTime<Utc>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODID),
        ];

        let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
        for event in events {
            self.push_event(&mut lines, event, &dtstamp);
        }

        lines.push("END:VCALENDAR".to_string());

        // No terminator after the final line
        lines.join(CRLF)
    }

    fn push_event(&self, lines: &mut Vec<String>, event: &Event, dtstamp: &str) {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", escape_text(&event.uid)));
        lines.push(format!("DTSTAMP:{}", dtstamp));
        lines.push(self.zoned_property("DTSTART", event.start));
        lines.push(self.zoned_property("DTEND", event.end));
        lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));

        if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }

        lines.push("END:VEVENT".to_string());
    }

    fn zoned_property(&self, name: &str, instant: DateTime<Utc>) -> String {
        let local = self.zone.to_local(instant);
        format!(
            "{};TZID={}:{}",
            name,
            self.zone.tzid,
            local.format("%Y%m%dT%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CandidateEvent, EventDraft};
    use crate::ics::Decoder;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn make_test_event(uid: &str, summary: &str) -> Event {
        let mut event = Event::imported(CandidateEvent {
            uid: uid.to_string(),
            summary: summary.to_string(),
            location: None,
            description: None,
            start: Utc.with_ymd_and_hms(2024, 9, 2, 1, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 9, 2, 3, 30, 0).unwrap(),
        });
        event.id = format!("id-{}", uid);
        event
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_encode_exact_layout() {
        let mut event = make_test_event("a1", "COMP3122 Lecture");
        event.location = Some("Y301".into());

        let ics = Encoder::default().encode_at(&[event], stamp());

        let expected = [
            "BEGIN:VCALENDAR",
            "VERSION:2.0",
            "PRODID:-//UniCal Manager//EN",
            "BEGIN:VEVENT",
            "UID:a1",
            "DTSTAMP:20240801T120000Z",
            "DTSTART;TZID=Asia/Hong_Kong:20240902T093000",
            "DTEND;TZID=Asia/Hong_Kong:20240902T113000",
            "SUMMARY:COMP3122 Lecture",
            "LOCATION:Y301",
            "END:VEVENT",
            "END:VCALENDAR",
        ]
        .join("\r\n");
        assert_eq!(ics, expected);
    }

    #[test]
    fn test_encode_empty_set_is_just_the_wrapper() {
        let ics = Encoder::default().encode_at(&[], stamp());
        assert_eq!(
            ics,
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//UniCal Manager//EN\r\nEND:VCALENDAR"
        );
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let mut event = make_test_event("a1", "Lab");
        event.location = Some(String::new());

        let ics = Encoder::default().encode(&[event]);
        assert!(!ics.contains("LOCATION"));
        assert!(!ics.contains("DESCRIPTION"));
    }

    #[test]
    fn test_field_values_cannot_inject_blocks() {
        let mut event = make_test_event("evil\r\nEND:VEVENT", "x\nEND:VEVENT\nBEGIN:VEVENT");
        event.description = Some("a\r\nBEGIN:VCALENDAR".into());

        let ics = Encoder::default().encode(&[event]);
        let begins = ics.split("\r\n").filter(|l| l.starts_with("BEGIN:")).count();
        let ends = ics.split("\r\n").filter(|l| l.starts_with("END:")).count();
        assert_eq!(begins, 2);
        assert_eq!(ends, 2);
        assert!(!ics.replace("\r\n", "").contains('\n'));
        assert!(!ics.replace("\r\n", "").contains('\r'));
    }

    #[test]
    fn test_configured_zone_is_used_for_output() {
        let zone = OrgZone::parse("+00:00", "Europe/London").unwrap();
        let ics = Encoder::new(zone).encode(&[make_test_event("a1", "Lab")]);
        assert!(ics.contains("DTSTART;TZID=Europe/London:20240902T013000"));
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let mut tricky = make_test_event("uid,with;odd\\chars", "Tutorial, Group A; B\\C");
        tricky.location = Some("Room 1\nBlock Y".into());
        tricky.description = Some("Bring: laptop, charger;\nand notes \\n".into());

        let manual = Event::manual(EventDraft::new(
            "Study group",
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 15, 0).unwrap(),
        ))
        .unwrap();

        let events = vec![make_test_event("a1", "COMP3122 Lecture"), tricky, manual];
        let ics = Encoder::default().encode(&events);
        let decoded = Decoder::default().decode(&ics);

        assert_eq!(decoded.len(), events.len());
        for (original, back) in events.iter().zip(&decoded) {
            assert_eq!(back.uid, original.uid);
            assert_eq!(back.summary, original.summary);
            assert_eq!(back.location, original.location);
            assert_eq!(back.description, original.description);
            assert_eq!(back.start, original.start);
            assert_eq!(back.end, original.end);
        }
    }

    #[test]
    fn test_roundtrip_with_other_zone() {
        let zone = OrgZone::parse("-03:30", "America/St_Johns").unwrap();
        let event = make_test_event("a1", "Lab");

        let ics = Encoder::new(zone.clone()).encode(std::slice::from_ref(&event));
        let decoded = Decoder::new(zone).decode(&ics);

        assert_eq!(decoded[0].start, event.start);
        assert_eq!(decoded[0].end, event.end);
    }
}
