//! Command-line interface for strictly_memory.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Memory - find every pair of matching cards
#[derive(Parser, Debug)]
#[command(name = "strictly_memory")]
#[command(about = "Memory-match game for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "strictly_memory.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Grid size: rows of four cards (2, 4, 6, 8 or 10, or e.g. "4x6")
        #[arg(short, long)]
        rows: Option<String>,

        /// Seed for reproducible decks
        #[arg(short, long)]
        seed: Option<u64>,

        /// Override the flag store file from the config
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Deal a deck face up and print it
    Deal {
        /// Grid size: rows of four cards (2, 4, 6, 8 or 10, or e.g. "4x6")
        #[arg(short, long, default_value = "4")]
        rows: String,

        /// Seed for reproducible decks
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
}
