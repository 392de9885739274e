use anyhow::Result;
use owo_colors::OwoColorize;
use unical_core::{OrgZone, Schedule};

use super::Selection;
use crate::render::{RenderInZone, pluralize};

pub fn list(schedule: &Schedule, zone: &OrgZone) -> Result<()> {
    let snapshot = schedule.snapshot();
    if snapshot.trashed.is_empty() {
        println!("{}", "Trash is empty".dimmed());
        return Ok(());
    }

    for event in &snapshot.trashed {
        let deleted = event
            .deleted_at
            .map(|at| format!("deleted {}", zone.display(at)))
            .unwrap_or_default();
        println!("  {} {}", event.render_in(zone), deleted.red());
    }
    Ok(())
}

pub async fn delete(schedule: &Schedule, selection: Selection) -> Result<()> {
    match selection {
        Selection::Id(id) => {
            schedule.delete(&id).await?;
            println!("{} Moved {} to trash", "✓".green(), id.dimmed());
        }
        Selection::Summary(summary) => {
            let count = schedule.delete_by_summary(&summary).await?;
            report(count, "moved to trash", &summary);
        }
    }
    Ok(())
}

pub async fn restore(schedule: &Schedule, selection: Selection) -> Result<()> {
    match selection {
        Selection::Id(id) => {
            schedule.restore(&id).await?;
            println!("{} Restored {}", "✓".green(), id.dimmed());
        }
        Selection::Summary(summary) => {
            let count = schedule.restore_by_summary(&summary).await?;
            report(count, "restored", &summary);
        }
    }
    Ok(())
}

pub async fn purge(schedule: &Schedule, selection: Selection) -> Result<()> {
    match selection {
        Selection::Id(id) => {
            schedule.purge(&id).await?;
            println!("{} Permanently deleted {}", "✓".green(), id.dimmed());
        }
        Selection::Summary(summary) => {
            let count = schedule.purge_by_summary(&summary).await?;
            report(count, "permanently deleted", &summary);
        }
    }
    Ok(())
}

pub async fn clear(schedule: &Schedule) -> Result<()> {
    let count = schedule.clear_all().await?;
    println!(
        "{} Moved {} {} to trash",
        "✓".green(),
        count,
        pluralize("event", count)
    );
    Ok(())
}

fn report(count: usize, action: &str, summary: &str) {
    if count == 0 {
        println!("{}", format!("No matching events for '{}'", summary).dimmed());
        return;
    }
    println!(
        "{} {} {} {} ({})",
        "✓".green(),
        count,
        pluralize("event", count),
        action,
        summary
    );
}
