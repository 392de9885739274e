use anyhow::Result;
use owo_colors::OwoColorize;
use unical_core::Schedule;
use unical_core::analytics::subject_hours;

use crate::render::Render;

pub fn subjects(schedule: &Schedule) -> Result<()> {
    let subjects = schedule.subjects();
    if subjects.is_empty() {
        println!("{}", "No subjects yet".dimmed());
        return Ok(());
    }

    for subject in subjects {
        println!("{}", subject);
    }
    Ok(())
}

pub fn hours(schedule: &Schedule) -> Result<()> {
    let totals = subject_hours(&schedule.snapshot().active);
    if totals.is_empty() {
        println!("{}", "No events scheduled".dimmed());
        return Ok(());
    }

    for total in &totals {
        println!("{}", total.render());
    }

    let sum: f64 = totals.iter().map(|t| t.hours).sum();
    println!("{}", format!("{:>6.1}h total", sum).bold());
    Ok(())
}
