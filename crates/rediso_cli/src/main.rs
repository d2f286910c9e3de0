//! rediso CLI
//!
//! Command-line tools for rediso.
//!
//! # Commands
//!
//! - `demo` - Walk through insert, update, search and delete
//! - `search` - Load records from a file and query them
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use commands::search::SearchArgs;
use commands::Format;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// rediso command-line tools.
#[derive(Parser)]
#[command(name = "rediso")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Key namespace
    #[arg(global = true, short, long, default_value = "rediso")]
    namespace: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through insert, update, search and delete on an in-memory store
    Demo {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Load records from a JSON file and search them
    Search {
        /// JSON array of records, or one record per line
        input: PathBuf,

        /// Collection to load the records into
        #[arg(short, long, default_value = "records")]
        collection: String,

        /// Field to index while loading (repeatable)
        #[arg(short, long)]
        index: Vec<String>,

        /// Filter such as `age>=30` (repeatable, OR-combined)
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,

        /// Field search such as `name=ali` (repeatable)
        #[arg(short = 'm', long = "match")]
        matches: Vec<String>,

        /// Search term matched against every field
        #[arg(short = 's', long = "search", conflicts_with = "matches")]
        term: Option<String>,

        /// Field to sort by
        #[arg(short, long)]
        order_by: Option<String>,

        /// Sort direction (asc, desc)
        #[arg(long, requires = "order_by")]
        order: Option<String>,

        /// Maximum number of records to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Records to skip
        #[arg(long)]
        offset: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Demo { format } => {
            commands::demo::run(&cli.namespace, format)?;
        }
        Commands::Search {
            input,
            collection,
            index,
            filters,
            matches,
            term,
            order_by,
            order,
            limit,
            offset,
            format,
        } => {
            let args = SearchArgs {
                collection,
                index,
                filters,
                matches,
                term,
                order_by,
                order,
                limit,
                offset,
            };
            commands::search::run(&input, &cli.namespace, &args, format)?;
        }
        Commands::Version => {
            println!("rediso CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("rediso Core v{}", rediso_core::VERSION);
        }
    }

    Ok(())
}
