use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use unical_core::Schedule;

use crate::render::pluralize;

pub fn run(schedule: &Schedule, output: Option<&Path>) -> Result<()> {
    let feed = schedule.export();

    match output {
        Some(path) => {
            std::fs::write(path, &feed)
                .with_context(|| format!("Could not write {}", path.display()))?;

            let count = schedule.snapshot().active.len();
            eprintln!(
                "{} Exported {} {} to {}",
                "✓".green(),
                count,
                pluralize("event", count),
                path.display()
            );
        }
        None => print!("{}", feed),
    }

    Ok(())
}
