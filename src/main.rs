mod commands;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unical_core::ics::{Decoder, Encoder};
use unical_core::object_store::DirObjectStore;
use unical_core::publish::Publisher;
use unical_core::store::{FileEventStore, FileFeedKeyStore};
use unical_core::{OrgZone, Schedule, UnicalConfig};

use crate::commands::events::EventFields;

#[derive(Parser)]
#[command(name = "unical")]
#[command(about = "Keep a personal timetable from manual events and imported .ics feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Pick records either by id or by summary
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Event id
    id: Option<String>,

    /// Every event with exactly this summary
    #[arg(long)]
    summary: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace imported events with the events in an .ics file
    Import {
        file: PathBuf,
    },
    /// Write the active events as .ics
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a manual event
    Add {
        summary: String,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Edit an event. Edited events are kept across imports.
    Edit {
        id: String,

        /// New summary
        #[arg(long)]
        summary: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// List active events
    List,
    /// List trashed events
    Trash,
    /// Move events to the trash
    Delete {
        #[command(flatten)]
        target: Target,
    },
    /// Bring events back from the trash
    Restore {
        #[command(flatten)]
        target: Target,
    },
    /// Permanently remove trashed events
    Purge {
        #[command(flatten)]
        target: Target,
    },
    /// Move every active event to the trash
    Clear,
    /// Publish the active events and print the feed URL
    Publish,
    /// Move the published feed to a new private URL
    Regenerate,
    /// List distinct subjects
    Subjects,
    /// Show scheduled hours per subject
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = UnicalConfig::load()?;
    let zone = config.zone()?;
    let schedule = open_schedule(&config, zone.clone()).await?;

    let result = match cli.command {
        Commands::Import { file } => commands::import::run(&schedule, &file).await,
        Commands::Export { output } => commands::export::run(&schedule, output.as_deref()),
        Commands::Add { summary, fields } => {
            commands::events::add(&schedule, &zone, summary, fields).await
        }
        Commands::Edit {
            id,
            summary,
            fields,
        } => commands::events::edit(&schedule, &zone, &id, summary, fields).await,
        Commands::List => commands::events::list(&schedule, &zone),
        Commands::Trash => commands::trash::list(&schedule, &zone),
        Commands::Delete { target } => commands::trash::delete(&schedule, target.selection()?).await,
        Commands::Restore { target } => commands::trash::restore(&schedule, target.selection()?).await,
        Commands::Purge { target } => commands::trash::purge(&schedule, target.selection()?).await,
        Commands::Clear => commands::trash::clear(&schedule).await,
        Commands::Publish => commands::publish::publish(&schedule).await,
        Commands::Regenerate => commands::publish::regenerate(&schedule).await,
        Commands::Subjects => commands::stats::subjects(&schedule),
        Commands::Stats => commands::stats::hours(&schedule),
    };

    // Let background republishes finish before the process exits
    schedule.settle().await;
    result
}

/// Logs go to stderr so stdout stays clean for `export`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("UNICAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_schedule(config: &UnicalConfig, zone: OrgZone) -> Result<Schedule> {
    let user_dir = config.user_path();
    tracing::debug!(dir = %user_dir.display(), user = %config.user, "opening schedule");
    let publisher = Publisher::new(
        Arc::new(FileFeedKeyStore::new(&user_dir)),
        Arc::new(DirObjectStore::new(
            config.publish_path(),
            config.public_base_url(),
        )),
        Encoder::new(zone.clone()),
        config.user.clone(),
    );

    let schedule = Schedule::open(
        Arc::new(FileEventStore::new(&user_dir)),
        Arc::new(publisher),
        Decoder::new(zone),
    )
    .await?;

    Ok(schedule)
}

impl Target {
    fn selection(self) -> Result<commands::Selection> {
        match (self.id, self.summary) {
            (None, Some(summary)) => Ok(commands::Selection::Summary(summary)),
            (Some(id), None) => Ok(commands::Selection::Id(id)),
            _ => anyhow::bail!("Pass either an event id or --summary"),
        }
    }
}
