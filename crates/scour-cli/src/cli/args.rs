use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scour", about = "Disk cleaner prototype", version)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the cleaning options, optionally filtered by a search term
    Options {
        /// Case-insensitive search term
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the files that would be deleted
    Preview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Seed for reproducible results
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Delete files for the enabled options
    Clean {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Seed for reproducible results
        #[arg(long)]
        seed: Option<u64>,
    },
}
