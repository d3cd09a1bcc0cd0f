//! Terminal UI for Strictly Memory

mod app;
mod input;
mod timers;
mod ui;

pub use app::App;
pub use ui::deck_text;

use crate::flags::FlagStore;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use strictly_memory::Task;
use timers::Timers;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// How long the key poller blocks before checking for shutdown.
const KEY_POLL: Duration = Duration::from_millis(100);

type Screen = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the terminal game until the player quits.
pub async fn run_tui<F: FlagStore>(app: App<F>, log_file: &Path, log_filter: &str) -> Result<()> {
    // Log to a file so output does not tear the screen
    let file = std::fs::File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter)),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();

    info!("Starting Strictly Memory TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("TUI exited");
    res
}

/// Input and timer events, multiplexed onto one loop.
#[instrument(skip_all)]
async fn run_loop<F: FlagStore>(terminal: &mut Screen, mut app: App<F>) -> Result<()> {
    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let (task_tx, mut task_rx) = mpsc::unbounded_channel::<Task>();
    let mut timers = Timers::new(task_tx);

    tokio::task::spawn_blocking(move || poll_keys(key_tx));

    loop {
        draw(terminal, &app)?;
        if app.should_quit() {
            break;
        }

        let commands = tokio::select! {
            event = key_rx.recv() => match event {
                Some(Event::Key(key)) => match input::action_for(key) {
                    Some(action) => app.handle(action, Instant::now()),
                    None => Vec::new(),
                },
                // Anything else, e.g. a resize, just redraws
                Some(_) => Vec::new(),
                None => {
                    info!("Terminal input closed");
                    break;
                }
            },
            Some(task) = task_rx.recv() => app.handle_task(task),
        };

        for command in commands {
            timers.apply(command);
        }
        timers.reap();
    }

    info!(round = %app.game().round_id(), timers = timers.len(), "Leaving game loop");
    timers.cancel_all();
    Ok(())
}

fn draw<F: FlagStore>(terminal: &mut Screen, app: &App<F>) -> Result<()> {
    let snapshot = app.snapshot(Instant::now());
    let view = ui::View {
        snapshot: &snapshot,
        cursor: app.cursor(),
        status: app.status_message(),
        size_label: app.size().to_string(),
        splash: app.show_splash(),
    };
    terminal.draw(|frame| ui::draw(frame, &view))?;
    Ok(())
}

/// Forwards terminal events until the loop hangs up.
fn poll_keys(tx: mpsc::UnboundedSender<Event>) {
    while !tx.is_closed() {
        match event::poll(KEY_POLL) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to read terminal event");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "Failed to poll terminal");
                break;
            }
        }
    }
    debug!("Key poller stopped");
}
