//! # hn CLI
//!
//! Command-line front end for the Hacker News search API.
//!
//! ## Usage
//!
//! ```bash
//! hn [--config ./hn.toml] [-v] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hn search [QUERY]` | Search by relevance or date and print the hits |
//! | `hn encode` | Print the encoded `tags` and `numericFilters` values |
//! | `hn validate <FILE>` | Normalize a saved response body and print it as JSON |
//!
//! ## Examples
//!
//! ```bash
//! # Stories about Rust with more than 100 points
//! hn search rust --tag story --filter "points>100"
//!
//! # Latest comments by a user, as JSON
//! hn search --by date --tag comment --tag author_dang --json
//!
//! # Check what a filter list encodes to
//! hn encode --filter "created_at_i<1700000000" --filter "num_comments>=10"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use hn_search::commands::{self, SearchArgs};
use hn_search::config::{self, Config};

/// Search Hacker News from the command line.
#[derive(Parser)]
#[command(
    name = "hn",
    about = "Search Hacker News through the Algolia search API",
    version
)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search and print the hits.
    Search {
        /// Free-text query. Omit to match everything the tags and filters allow.
        query: Option<String>,

        /// Sort order: `relevance` (`/search`) or `date` (`/search_by_date`).
        #[arg(long = "by", default_value = "relevance")]
        order: String,

        /// Tag restriction, e.g. `story`, `author_dang`, `story_8863`. Repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Numeric filter, e.g. `points>100`. Repeatable; all must match.
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Page number, starting at 0.
        #[arg(long)]
        page: Option<u32>,

        /// Results per page.
        #[arg(long)]
        hits_per_page: Option<u32>,

        /// Print the normalized result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the encoded query-string values for tags and filters.
    Encode {
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Validate and normalize a saved JSON response.
    Validate {
        /// Path to the response body.
        path: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries results; logs go to stderr
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
    {
        eprintln!("Failed to initialize tracing: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Search {
            query,
            order,
            tags,
            filters,
            page,
            hits_per_page,
            json,
        } => {
            commands::run_search(
                &cfg,
                SearchArgs {
                    query,
                    order,
                    tags,
                    filters,
                    page,
                    hits_per_page,
                    json,
                },
            )
            .await?;
        }
        Commands::Encode { tags, filters } => {
            commands::run_encode(&tags, &filters)?;
        }
        Commands::Validate { path } => {
            commands::run_validate(&path)?;
        }
    }

    Ok(())
}
