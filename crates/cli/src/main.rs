//! Waitlist CLI - Command-line interface for the Waitlist Engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};
use waitlist_core::domain::{annotate_queue, ActivityCatalog, QueuePosition};
use waitlist_sdk::{Activity, Entry, EntryStatus, SubmitRequest, WaitlistClient};

const DEFAULT_URL: &str = "http://127.0.0.1:8787";

#[derive(Parser)]
#[command(name = "waitlist")]
#[command(about = "Waitlist Engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Daemon URL
    #[arg(long, env = "WAITLIST_URL", default_value = DEFAULT_URL)]
    url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Join the waitlist
    Join {
        /// Display name
        name: String,

        /// Activity codes (see `waitlist activities`)
        #[arg(short, long = "activity", required = true, num_args = 1..)]
        activities: Vec<String>,

        /// Jump ahead of non-urgent entries
        #[arg(long)]
        urgent: bool,
    },

    /// Leave the waitlist
    Leave {
        /// Entry ID
        id: String,
    },

    /// Mark an entry as using the resource
    Use {
        /// Entry ID
        id: String,
    },

    /// Set an entry's status
    Status {
        /// Entry ID
        id: String,

        /// waiting | using | done
        status: EntryStatus,
    },

    /// List current entries
    List,

    /// Show the ordered queue with estimated waits
    Board,

    /// Remove expired entries now
    Cleanup,

    /// Show the activity catalog
    Activities,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Activities")]
    activities: String,
    #[tabled(rename = "Urgent")]
    urgent: String,
}

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Activities")]
    activities: String,
    #[tabled(rename = "Urgent")]
    urgent: String,
    #[tabled(rename = "Wait")]
    wait: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
}

fn urgency_cell(urgent: bool) -> String {
    if urgent {
        "URGENT".red().bold().to_string()
    } else {
        String::new()
    }
}

fn entry_row(entry: &Entry) -> EntryRow {
    EntryRow {
        id: entry.id.clone(),
        name: entry.name.clone(),
        status: entry.status.to_string(),
        activities: entry.activities.join(", "),
        urgent: urgency_cell(entry.urgency),
    }
}

fn board_rows(entries: Vec<Entry>, activities: Vec<Activity>) -> Result<Vec<BoardRow>> {
    let catalog = ActivityCatalog::new(activities)
        .map_err(|e| anyhow::anyhow!("Server returned an invalid activity catalog: {}", e))?;

    Ok(annotate_queue(entries, &catalog)
        .into_iter()
        .map(|QueuePosition { position, estimated_wait_minutes, entry }| BoardRow {
            position,
            name: entry.name,
            status: entry.status.to_string(),
            activities: entry.activities.join(", "),
            urgent: urgency_cell(entry.urgency),
            wait: if entry.status == EntryStatus::Using {
                "now".to_string()
            } else {
                format!("~{} min", estimated_wait_minutes)
            },
        })
        .collect())
}

async fn run(cli: Cli) -> Result<()> {
    let client = WaitlistClient::connect(&cli.url).context("Invalid daemon URL")?;

    match cli.command {
        Commands::Join {
            name,
            activities,
            urgent,
        } => {
            let entry = client
                .submit(&SubmitRequest {
                    name,
                    activities,
                    urgency: urgent,
                    timestamp: None,
                })
                .await?;

            println!("{}", "✓ Joined the waitlist".green().bold());
            println!();
            println!("{}", Table::new(vec![entry_row(&entry)]));
        }

        Commands::Leave { id } => {
            let response = client.remove(&id).await?;
            println!("{}", format!("✓ {} ({})", response.message, response.id).green().bold());
        }

        Commands::Use { id } => {
            let entry = client.set_status(&id, EntryStatus::Using).await?;
            println!("{}", format!("✓ {} is now using it", entry.name).green().bold());
        }

        Commands::Status { id, status } => {
            let entry = client.set_status(&id, status).await?;
            println!(
                "{}",
                format!("✓ {} is now {}", entry.name, entry.status).green().bold()
            );
        }

        Commands::List => {
            let entries = client.list().await?;
            if entries.is_empty() {
                println!("{}", "The waitlist is empty".yellow());
            } else {
                let rows: Vec<EntryRow> = entries.iter().map(entry_row).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Board => {
            let entries = client.list().await?;
            let activities = client.activities().await?;

            println!("{}", "Waitlist".cyan().bold());
            println!();
            if entries.is_empty() {
                println!("{}", "Nobody is waiting".yellow());
            } else {
                println!("{}", Table::new(board_rows(entries, activities)?));
            }
        }

        Commands::Cleanup => {
            let response = client.cleanup().await?;
            println!("{}", format!("✓ {}", response.message).green());
        }

        Commands::Activities => {
            let rows: Vec<ActivityRow> = client
                .activities()
                .await?
                .into_iter()
                .map(|a| ActivityRow {
                    code: a.code,
                    label: a.label,
                    minutes: a.duration_minutes,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
