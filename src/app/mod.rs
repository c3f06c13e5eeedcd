//! Terminal front-end and event loop

pub mod input;
pub mod state;

use std::io::{self, Stdout};

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::config::progress::Progress;
use crate::quiz::{Quiz, QuizSession, ScoreSummary, TimerPulse, TimerService};
use crate::ui;
use state::{AppState, Flow};

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Recorded quiz history
    progress: Progress,

    /// Pulses from the session countdown
    pulses: mpsc::UnboundedReceiver<TimerPulse>,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance with `quiz` loaded
    ///
    /// Must be called from within a tokio runtime when a time limit is set.
    pub fn new(config: Config, progress: Progress, quiz: Quiz, time_limit_secs: u32) -> Result<Self> {
        let (tx, pulses) = mpsc::unbounded_channel();
        let session = QuizSession::new(TimerService::driven(tx));
        let state = AppState::new(session, quiz, time_limit_secs)?;
        let terminal = Self::setup_terminal()?;

        Ok(Self { config, state, progress, pulses, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let theme = self.config.active_theme();

        loop {
            // Draw UI
            self.terminal.draw(|frame| {
                ui::draw(frame, &mut self.state, &theme);
            })?;

            // Handle events
            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let action =
                            input::key_to_action(key.code, key.modifiers, self.config.vim_mode);
                        if let Some(action) = action {
                            if self.state.apply(action) == Flow::Quit {
                                break;
                            }
                        }
                    }
                }
            }

            // Countdown pulses are applied here, between key events
            while let Ok(pulse) = self.pulses.try_recv() {
                self.state.on_pulse(pulse);
            }

            self.record_completion();
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Score of the last completed session, if the quiz was finished
    pub fn summary(&self) -> Option<&ScoreSummary> {
        self.state.view.summary.as_ref()
    }

    /// Append a finished quiz to the history file
    fn record_completion(&mut self) {
        let Some((summary, reason)) = self.state.take_completion() else {
            return;
        };
        if !self.config.record_history {
            return;
        }

        let difficulty = self.state.source().difficulty;
        self.progress.record(&summary, difficulty, reason, Utc::now());
        if let Err(e) = self.progress.save() {
            tracing::error!("Failed to save progress: {:#}", e);
            self.state.status.set_error("Could not save quiz history");
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
