//! Strictly Memory - terminal memory-match game
//!
//! Flip two cards at a time and clear the board in as few moves as you can.

#![warn(missing_docs)]

mod cli;
mod config;
mod flags;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::TuiConfig;
use flags::{FileFlags, FlagStore, GRID_ROWS};
use std::path::PathBuf;
use strictly_memory::{GridSize, MatchGame};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use tui::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = TuiConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Command::Play { rows, seed, state } => run_play(config, rows, seed, state).await,
        Command::Deal { rows, seed, json } => run_deal(&config, &rows, seed, json),
    }
}

/// Grid size for a new session: command line, then the remembered size,
/// then the config default.
fn pick_size(cli_rows: Option<&str>, flags: &impl FlagStore, config: &TuiConfig) -> GridSize {
    if let Some(label) = cli_rows {
        return GridSize::from_label(label);
    }
    flags
        .get(GRID_ROWS)
        .map(|rows| GridSize::from_label(&rows))
        .unwrap_or_else(|| config.grid_size())
}

fn build_game(size: GridSize, seed: Option<u64>) -> Result<MatchGame> {
    let game = match seed {
        Some(seed) => MatchGame::seeded(seed, size.config()),
        None => MatchGame::from_entropy(size.config()),
    };
    game.with_context(|| format!("Failed to deal a {size} grid"))
}

/// Run the game in the terminal
async fn run_play(
    config: TuiConfig,
    rows: Option<String>,
    seed: Option<u64>,
    state: Option<PathBuf>,
) -> Result<()> {
    let config = match state {
        Some(path) => config.with_state_file(path),
        None => config,
    };
    let flags = FileFlags::open(config.state_file());
    let size = pick_size(rows.as_deref(), &flags, &config);
    let game = build_game(size, seed)?;

    let app = App::new(game, size, flags);
    tui::run_tui(app, config.log_file(), config.log_filter()).await
}

/// Deal one deck and print it face up
#[instrument(skip(config))]
fn run_deal(config: &TuiConfig, rows: &str, seed: Option<u64>, json: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let size = GridSize::from_label(rows);
    let game = build_game(size, seed)?;
    let deck = game.round().deck();
    info!(%size, cards = deck.len(), "Dealt deck");

    if json {
        let value = serde_json::json!({
            "rows": size.rows(),
            "columns": game.grid().columns(),
            "cards": deck.cards(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", tui::deck_text(deck.cards(), game.grid().columns()));
    }
    Ok(())
}
