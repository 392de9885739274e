//! Reading and writing timetable feeds in the ics text format.
//!
//! Only the subset a timetable needs is handled: `VEVENT` blocks with
//! `UID`, `SUMMARY`, `LOCATION`, `DESCRIPTION`, `DTSTART` and `DTEND`.
//! Floating times are read in the organizational zone (see [`OrgZone`]).
//!
//! [`OrgZone`]: crate::org_zone::OrgZone

mod escape;
mod generate;
mod parse;

pub use escape::{escape_text, unescape_text};
pub use generate::{CONTENT_TYPE, Encoder};
pub use parse::Decoder;
