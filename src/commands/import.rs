use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use unical_core::Schedule;

use crate::render::pluralize;

pub async fn run(schedule: &Schedule, file: &Path) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Could not read {}", file.display()))?;

    let report = schedule.import(&feed_text(&bytes)).await?;

    if report.decoded == 0 {
        println!("{}", "No events found in feed".yellow());
    }

    println!(
        "{} Imported {} {}",
        "✓".green(),
        report.inserted,
        pluralize("event", report.inserted)
    );
    if report.replaced > 0 {
        println!(
            "  {}",
            format!("replaced {} previously imported", report.replaced).dimmed()
        );
    }
    if report.shadowed > 0 {
        println!(
            "  {}",
            format!(
                "kept {} manual {} with the same UID",
                report.shadowed,
                pluralize("event", report.shadowed)
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Feeds are decoded lossily; a bad byte spoils one value, not the file.
fn feed_text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
