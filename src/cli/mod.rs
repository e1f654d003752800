use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{BallotService, VoteFilter};
use crate::domain::Vote;
use crate::storage::FileStore;

/// Ballot - Vote List Manager
#[derive(Parser)]
#[command(name = "ballot")]
#[command(about = "A local-first list of votes stored as JSON")]
#[command(version)]
pub struct Cli {
    /// Store file path
    #[arg(short, long, default_value = "ballot.json")]
    pub store: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a vote
    Add {
        /// Vote title
        title: String,

        /// Voter age (defaults to 18)
        #[arg(short, long)]
        age: Option<u32>,
    },

    /// List votes
    List {
        /// Only votes not yet completed
        #[arg(long, conflicts_with = "completed")]
        active: bool,

        /// Only completed votes
        #[arg(long)]
        completed: bool,
    },

    /// Flip the completed flag of a vote
    Toggle {
        /// Vote title
        title: String,
    },

    /// Mark every vote as completed
    DoneAll,

    /// Remove the first vote with the given title
    Remove {
        /// Vote title
        title: String,
    },

    /// Remove all completed votes
    ClearCompleted,

    /// Sort votes by title
    Sort,

    /// Show the first vote with the given title
    Find {
        /// Vote title
        title: String,
    },

    /// Change the title of a vote (a blank title removes it)
    Rename {
        /// Current title
        title: String,

        /// New title
        new_title: String,
    },

    /// Show counts and average age
    Stats,

    /// Export votes to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Remove everything from the store
    Reset,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        let store = FileStore::new(&self.store);
        let mut service = BallotService::open(store)
            .with_context(|| format!("Failed to open store: {}", self.store))?;

        match self.command {
            Commands::Add { title, age } => {
                let vote = service.add_vote(&title, age)?;
                println!("Added vote #{}: {} (age {})", vote.id, vote.title, vote.age);
            }

            Commands::List { active, completed } => {
                let filter = if active {
                    VoteFilter::Active
                } else if completed {
                    VoteFilter::Completed
                } else {
                    VoteFilter::All
                };
                print_votes(&service.list(filter));
            }

            Commands::Toggle { title } => {
                let vote = service.toggle_vote(&title)?;
                let state = if vote.completed { "completed" } else { "active" };
                println!("{} is now {}", vote.title, state);
            }

            Commands::DoneAll => {
                service.complete_all()?;
                println!("All votes marked as completed");
            }

            Commands::Remove { title } => {
                let vote = service.remove_vote(&title)?;
                println!("Removed vote #{}: {}", vote.id, vote.title);
            }

            Commands::ClearCompleted => {
                let removed = service.clear_completed()?;
                println!("Removed {} completed vote(s)", removed);
            }

            Commands::Sort => {
                service.sort()?;
                print_votes(&service.list(VoteFilter::All));
            }

            Commands::Find { title } => {
                let vote = service.find_vote(&title)?;
                print_votes(&[vote]);
            }

            Commands::Rename { title, new_title } => {
                match service.rename_vote(&title, &new_title)? {
                    Some(vote) => println!("Renamed '{}' to '{}'", title, vote.title),
                    None => println!("Removed '{}' (blank title)", title),
                }
            }

            Commands::Stats => {
                let summary = service.summary();
                println!("Total:      {}", summary.total);
                println!("Remaining:  {}", summary.remaining);
                println!("Completed:  {}", summary.completed);
                println!("All done:   {}", if summary.all_done { "yes" } else { "no" });
                match summary.average_age {
                    Some(avg) => println!("Avg. age:   {:.1}", avg),
                    None => println!("Avg. age:   n/a"),
                }
            }

            Commands::Export { format, output } => {
                run_export_command(&service, &format, output.as_deref())?;
            }

            Commands::Reset => {
                service.reset()?;
                println!("Store cleared: {}", service.store().path().display());
            }
        }

        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "ballot=debug" } else { "ballot=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Ignore a second initialization, e.g. when run from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_votes(votes: &[&Vote]) {
    if votes.is_empty() {
        println!("No votes found.");
        return;
    }

    println!("{:<5} {:<24} {:>4}  {}", "ID", "TITLE", "AGE", "DONE");
    println!("{}", "-".repeat(42));
    for vote in votes {
        println!(
            "{:<5} {:<24} {:>4}  {}",
            vote.id,
            vote.title,
            vote.age,
            if vote.completed { "x" } else { "" }
        );
    }
}

fn run_export_command(
    service: &BallotService<FileStore>,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service.ballot());

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        "csv" => exporter.export_votes_csv(writer)?,
        "json" => exporter.export_votes_json(writer)?,
        _ => anyhow::bail!("Unknown export format '{}'. Valid formats: csv, json", format),
    };

    if output.is_some() {
        eprintln!("Exported {} votes", count);
    }

    Ok(())
}
