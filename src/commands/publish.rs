use anyhow::Result;
use owo_colors::OwoColorize;
use unical_core::Schedule;

pub async fn publish(schedule: &Schedule) -> Result<()> {
    let url = schedule.publish().await?;

    println!("{} Published {} events", "✓".green(), schedule.snapshot().active.len());
    println!("  {}", url.cyan());
    println!(
        "  {}",
        "Subscribe to this URL in your calendar app. It updates after every change.".dimmed()
    );

    Ok(())
}

pub async fn regenerate(schedule: &Schedule) -> Result<()> {
    let old = schedule.feed_url().await?;
    let url = schedule.regenerate().await?;

    println!("{} New feed URL", "✓".green());
    println!("  {}", url.cyan());
    if let Some(old) = old {
        println!("  {}", format!("{} no longer works", old).dimmed());
    }

    Ok(())
}
