//! Terminal rendering for unical types.
//!
//! Extension traits that add colored output to unical-core types using
//! owo_colors.

use owo_colors::OwoColorize;
use unical_core::analytics::SubjectHours;
use unical_core::subject::{contrast_color, subject_code};
use unical_core::{Event, OrgZone, Origin};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Origin {
    fn render(&self) -> String {
        match self {
            Origin::Manual => "manual".cyan().to_string(),
            Origin::Imported => "imported".dimmed().to_string(),
        }
    }
}

impl Render for SubjectHours {
    fn render(&self) -> String {
        let bar = "█".repeat((self.hours.round() as usize).clamp(1, 40));
        let (r, g, b) = rgb(&self.color);
        format!(
            "{:>6.1}h {} {}",
            self.hours,
            bar.truecolor(r, g, b),
            self.summary
        )
    }
}

/// Rendering that needs the organizational zone for times
pub trait RenderInZone {
    fn render_in(&self, zone: &OrgZone) -> String;
}

impl RenderInZone for Event {
    fn render_in(&self, zone: &OrgZone) -> String {
        let time = format!(
            "{} - {}",
            zone.display(self.start),
            zone.to_local(self.end).format("%H:%M")
        );

        let mut line = format!(
            "{} {} {}",
            time,
            subject_badge(self),
            self.summary.bold()
        );
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
        }
        line.push_str(&format!(" [{}] {}", self.origin.render(), self.id.dimmed()));
        line
    }
}

/// The subject code on its own color, with readable text on top.
fn subject_badge(event: &Event) -> String {
    let code = format!(" {} ", subject_code(&event.summary));
    let (r, g, b) = rgb(&event.color);

    match contrast_color(&event.color) {
        "black" => code.black().on_truecolor(r, g, b).to_string(),
        _ => code.white().on_truecolor(r, g, b).to_string(),
    }
}

fn rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    (channel(0), channel(2), channel(4))
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parses_hex_colors() {
        assert_eq!(rgb("#fca5a5"), (0xfc, 0xa5, 0xa5));
        assert_eq!(rgb("bogus"), (0, 0, 0));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 3), "events");
    }
}
