//! Time spent per subject.

use std::collections::HashMap;

use serde::Serialize;

use crate::event::Event;
use crate::subject::subject_color;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectHours {
    pub summary: String,
    /// Rounded to one decimal
    pub hours: f64,
    pub color: String,
}

/// Total scheduled hours per summary over the active events, busiest first.
pub fn subject_hours(events: &[Event]) -> Vec<SubjectHours> {
    let mut minutes: HashMap<&str, i64> = HashMap::new();
    for event in events.iter().filter(|e| e.is_active()) {
        *minutes.entry(event.summary.as_str()).or_default() += event.duration().num_minutes();
    }

    let mut totals: Vec<SubjectHours> = minutes
        .into_iter()
        .map(|(summary, minutes)| SubjectHours {
            summary: summary.to_string(),
            hours: (minutes as f64 / 60.0 * 10.0).round() / 10.0,
            color: subject_color(summary).to_string(),
        })
        .collect();

    totals.sort_by(|a, b| {
        b.hours
            .total_cmp(&a.hours)
            .then_with(|| a.summary.cmp(&b.summary))
    });
    totals
}
