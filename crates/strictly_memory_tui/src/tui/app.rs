//! Application state and logic.

use super::input::{Action, move_cursor};
use crate::flags::{FlagStore, GRID_ROWS, SPLASH_SEEN};
use std::time::Instant;
use strictly_memory::{
    Effect, GridConfig, GridSize, Ignored, MatchGame, Selection, Snapshot, Task, TaskOutcome,
};
use tracing::{debug, info, instrument, warn};

/// Instruction from the app to the timer host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start deferred work.
    Schedule(Effect),
    /// Stop a periodic task.
    Stop(Task),
    /// Drop everything pending; a new round was dealt.
    CancelAll,
}

/// Main application state.
pub struct App<F> {
    game: MatchGame,
    size: GridSize,
    cursor: usize,
    flags: F,
    show_splash: bool,
    status_message: String,
    should_quit: bool,
}

impl<F: FlagStore> App<F> {
    /// Creates a new application around a dealt game.
    pub fn new(game: MatchGame, size: GridSize, flags: F) -> Self {
        let show_splash = !flags.is_set(SPLASH_SEEN);
        Self {
            game,
            size,
            cursor: 0,
            flags,
            show_splash,
            status_message: "Find every pair.".to_string(),
            should_quit: false,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &MatchGame {
        &self.game
    }

    /// Current grid size.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Position under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the welcome splash is up.
    pub fn show_splash(&self) -> bool {
        self.show_splash
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Whether the player asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Snapshot of the live round at `now`.
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        self.game.snapshot_at(now)
    }

    /// Handles a player action at time `now`.
    #[instrument(skip(self, now))]
    pub fn handle(&mut self, action: Action, now: Instant) -> Vec<TimerCommand> {
        if self.show_splash {
            return match action {
                Action::Quit => {
                    self.should_quit = true;
                    Vec::new()
                }
                _ => {
                    self.dismiss_splash();
                    Vec::new()
                }
            };
        }

        match action {
            Action::Move(direction) => {
                let len = self.game.round().deck().len();
                self.cursor = move_cursor(self.cursor, direction, self.game.grid().columns(), len);
                Vec::new()
            }
            Action::Select => self.select(now),
            Action::NewRound => self.deal(self.size),
            Action::Bigger => self.deal(self.size.next()),
            Action::Smaller => self.deal(self.size.prev()),
            Action::Quit => {
                info!("User quit");
                self.should_quit = true;
                Vec::new()
            }
        }
    }

    /// Handles a deferred task that fired.
    #[instrument(skip(self))]
    pub fn handle_task(&mut self, task: Task) -> Vec<TimerCommand> {
        let outcome = self.game.run_task(task);
        debug!(?outcome, "Task ran");
        if let TaskOutcome::Hidden { .. } = outcome {
            self.status_message = "Try again.".to_string();
        }
        if outcome.keep_going() {
            Vec::new()
        } else {
            vec![TimerCommand::Stop(task)]
        }
    }

    fn dismiss_splash(&mut self) {
        debug!("Splash dismissed");
        self.show_splash = false;
        self.flags.set(SPLASH_SEEN, "yes");
    }

    fn select(&mut self, now: Instant) -> Vec<TimerCommand> {
        let turn = self.game.select_at(self.cursor, now);
        match turn.selection {
            Selection::Ignored(Ignored::Locked) => {
                self.status_message = "Wait for the cards to turn back.".to_string();
            }
            Selection::Ignored(_) => {}
            Selection::Revealed { .. } => {
                self.status_message = "Pick its partner.".to_string();
            }
            Selection::Matched { complete: false, .. } => {
                self.status_message = "Match!".to_string();
            }
            Selection::Matched { complete: true, .. } => {
                let round = self.game.round();
                self.status_message = format!(
                    "Complete! {} moves in {}s. Press 'n' to play again.",
                    round.move_count(),
                    round.elapsed_secs(now)
                );
            }
            Selection::Mismatched { .. } => {
                self.status_message = "No match...".to_string();
            }
        }
        turn.effect.map(TimerCommand::Schedule).into_iter().collect()
    }

    fn deal(&mut self, size: GridSize) -> Vec<TimerCommand> {
        self.deal_grid(size, size.config())
    }

    /// Deals `grid` as `size`. A rejected grid keeps the live round and
    /// its timers.
    fn deal_grid(&mut self, size: GridSize, grid: GridConfig) -> Vec<TimerCommand> {
        match self.game.new_round(grid) {
            Ok(_) => {
                info!(%size, "New round");
                self.size = size;
                self.cursor = self.cursor.min(grid.card_count().saturating_sub(1));
                self.flags.set(GRID_ROWS, &size.rows().to_string());
                self.status_message = format!("New {size} round. Find every pair.");
                vec![TimerCommand::CancelAll]
            }
            Err(e) => {
                warn!(error = %e, "Could not deal");
                self.status_message = format!("Could not deal: {e}");
                Vec::new()
            }
        }
    }
}
