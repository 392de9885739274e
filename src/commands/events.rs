use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use owo_colors::OwoColorize;
use unical_core::{EventDraft, OrgZone, Schedule};

use crate::render::{Render, RenderInZone};

/// Editable event fields
#[derive(Args)]
pub struct EventFields {
    /// Start time (RFC 3339, or "2024-09-02T14:00" in the configured offset)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (defaults to one hour after start)
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,
}

pub async fn add(
    schedule: &Schedule,
    zone: &OrgZone,
    summary: String,
    fields: EventFields,
) -> Result<()> {
    let draft = EventDraft {
        summary,
        location: fields.location,
        description: fields.description,
        start: parse_time(zone, fields.start.as_deref())?,
        end: parse_time(zone, fields.end.as_deref())?,
    };

    let event = schedule.create(draft).await?;
    println!("{} Created {}", "✓".green(), event.render_in(zone));
    Ok(())
}

pub async fn edit(
    schedule: &Schedule,
    zone: &OrgZone,
    id: &str,
    summary: Option<String>,
    fields: EventFields,
) -> Result<()> {
    let snapshot = schedule.snapshot();
    let Some(existing) = snapshot.active.iter().find(|e| e.id == id) else {
        anyhow::bail!("No active event with id '{}'", id);
    };

    let mut draft = EventDraft::from(existing);
    if let Some(summary) = summary {
        draft.summary = summary;
    }
    if let Some(location) = fields.location {
        draft.location = Some(location);
    }
    if let Some(description) = fields.description {
        draft.description = Some(description);
    }
    if let Some(start) = parse_time(zone, fields.start.as_deref())? {
        // Moving the start keeps the duration unless a new end is given
        draft.end = Some(start + existing.duration());
        draft.start = Some(start);
    }
    if let Some(end) = parse_time(zone, fields.end.as_deref())? {
        draft.end = Some(end);
    }

    let event = schedule.update(id, draft).await?;
    println!("{} Updated {}", "✓".green(), event.render_in(zone));
    Ok(())
}

pub fn list(schedule: &Schedule, zone: &OrgZone) -> Result<()> {
    let snapshot = schedule.snapshot();
    if snapshot.active.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    let mut current_date = None;
    for event in &snapshot.active {
        let date = zone.to_local(event.start).date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %b %-d %Y").to_string().bold());
            current_date = Some(date);
        }
        println!("  {}", event.render_in(zone));
    }

    let manual = snapshot.active.iter().filter(|e| e.is_manual()).count();
    println!();
    println!(
        "{}",
        format!(
            "{} events ({} {}, {} {})",
            snapshot.active.len(),
            manual,
            unical_core::Origin::Manual.render(),
            snapshot.active.len() - manual,
            unical_core::Origin::Imported.render(),
        )
        .dimmed()
    );
    Ok(())
}

fn parse_time(zone: &OrgZone, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|v| zone.parse_input(v).with_context(|| format!("Bad time '{}'", v)))
        .transpose()
}
