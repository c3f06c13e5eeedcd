//! Application state and intent dispatch

use crate::quiz::{
    CompletionReason, Phase, Quiz, QuizSession, ScoreSummary, SessionError, TimerPulse, ViewState,
};

use super::input::Action;

/// Whether the event loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Status line under the quiz panel
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Message to display
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
}

impl StatusLine {
    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

/// Scroll state for the results review
#[derive(Debug, Clone, Default)]
pub struct ResultsScroll {
    /// Current scroll position (rows from top)
    pub scroll_offset: usize,
    /// Total rendered rows (updated on render)
    pub total_lines: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl ResultsScroll {
    /// Get the maximum allowed scroll offset
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height)
    }

    /// Clamp scroll offset to valid range
    pub fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Scroll by `delta` rows, staying in range
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp_scroll();
    }
}

/// Full application state
#[derive(Debug)]
pub struct AppState {
    /// The running quiz session
    pub session: QuizSession,

    /// Latest projection of the session
    pub view: ViewState,

    /// Status line state
    pub status: StatusLine,

    /// Scroll position of the results review
    pub results: ResultsScroll,

    /// Quiz as loaded, used for retakes
    source: Quiz,

    /// Time limit applied to every take
    time_limit_secs: u32,

    /// Whether the current completion has been handed out for recording
    completion_taken: bool,
}

impl AppState {
    /// Load `quiz` into `session` and build the initial state
    pub fn new(mut session: QuizSession, quiz: Quiz, time_limit_secs: u32) -> Result<Self, SessionError> {
        let view = session.load_quiz(quiz.clone(), time_limit_secs)?;
        Ok(Self {
            session,
            view,
            status: StatusLine::default(),
            results: ResultsScroll::default(),
            source: quiz,
            time_limit_secs,
            completion_taken: false,
        })
    }

    /// Apply a user action
    pub fn apply(&mut self, action: Action) -> Flow {
        // The highlight keys scroll the review once the quiz is over
        if self.view.phase == Phase::Completed {
            match action {
                Action::HighlightUp => {
                    self.results.scroll_by(-1);
                    return Flow::Continue;
                }
                Action::HighlightDown => {
                    self.results.scroll_by(1);
                    return Flow::Continue;
                }
                _ => {}
            }
        }

        let result = match action {
            Action::Quit => return Flow::Quit,
            Action::HighlightUp => self.move_highlight(-1),
            Action::HighlightDown => self.move_highlight(1),
            Action::Pick(option) => self.session.select_option(option),
            Action::Primary => self.session.confirm(),
            Action::Skip => self.session.skip(),
            Action::Next => self.session.next(),
            Action::Retake => self.retake(),
        };

        match result {
            Ok(view) => {
                self.status.clear_message();
                self.set_view(view);
            }
            Err(e) => {
                tracing::warn!(?action, error = %e, "intent rejected");
                self.status.set_error(e.to_string());
            }
        }

        Flow::Continue
    }

    /// Apply a pulse from the countdown
    pub fn on_pulse(&mut self, pulse: TimerPulse) {
        if let Some(view) = self.session.handle_timer_pulse(pulse) {
            self.set_view(view);
        }
    }

    /// Hand out the result of a completed session, once per completion
    pub fn take_completion(&mut self) -> Option<(ScoreSummary, CompletionReason)> {
        if self.completion_taken || self.view.phase != Phase::Completed {
            return None;
        }
        let summary = self.view.summary.clone()?;
        let reason = self.view.completion?;
        self.completion_taken = true;
        Some((summary, reason))
    }

    /// Quiz as loaded
    pub fn source(&self) -> &Quiz {
        &self.source
    }

    fn set_view(&mut self, view: ViewState) {
        if view.phase == Phase::Completed && self.view.phase != Phase::Completed {
            if view.completion == Some(CompletionReason::TimeExpired) {
                self.status.set_error("Time's up!");
            } else {
                self.status.set_message("Quiz complete");
            }
        }
        self.view = view;
    }

    fn move_highlight(&mut self, delta: isize) -> Result<ViewState, SessionError> {
        let count = self.session.current_question().map(|q| q.options.len()).unwrap_or(0);
        let target = match self.session.highlighted() {
            Some(current) => current.saturating_add_signed(delta).min(count.saturating_sub(1)),
            None => 0,
        };
        self.session.select_option(target)
    }

    /// Throw away the finished session and take the same quiz again
    fn retake(&mut self) -> Result<ViewState, SessionError> {
        self.session.restart()?;
        let view = self.session.load_quiz(self.source.clone(), self.time_limit_secs)?;
        self.completion_taken = false;
        self.results = ResultsScroll::default();
        Ok(view)
    }
}
