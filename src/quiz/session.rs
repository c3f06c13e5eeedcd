//! Quiz-taking session controller
//!
//! [`QuizSession`] is the single owner of everything that changes while a quiz
//! is taken: the current question, the committed answers, the skip queue, the
//! reveal flag and the countdown. Callers only ever see it through the intent
//! methods and the [`ViewState`] projection.

use serde::{Deserialize, Serialize};

use super::error::SessionError;
use super::model::{Question, Quiz};
use super::scoring::{self, AnswerMap, ScoreSummary};
use super::timer::{TimerEvent, TimerPulse, TimerService};
use super::view::{self, ViewState};

/// Where the session is in its lifecycle; only ever moves forward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No quiz loaded
    #[default]
    Idle,
    /// First pass through every question in order
    MainSequence,
    /// Second pass over the skipped questions, in skip order
    ReviewingSkipped,
    /// Terminal; the score summary is available
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Idle => "no quiz is loaded",
            Phase::MainSequence => "answering questions",
            Phase::ReviewingSkipped => "reviewing skipped questions",
            Phase::Completed => "the quiz is finished",
        })
    }
}

/// User intents, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SelectOption,
    Skip,
    Next,
    Confirm,
    Restart,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Intent::SelectOption => "select an option",
            Intent::Skip => "skip",
            Intent::Next => "move to the next question",
            Intent::Confirm => "confirm",
            Intent::Restart => "restart",
        })
    }
}

/// How a session reached `Completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionReason {
    /// Every question was worked through
    Finished,
    /// The countdown ran out
    TimeExpired,
}

/// Controller for one quiz-taking session
#[derive(Debug, Default)]
pub struct QuizSession {
    quiz: Option<Quiz>,
    phase: Phase,
    current: usize,
    answers: AnswerMap,
    skipped: Vec<usize>,
    /// Whether the current question has been confirmed and revealed
    revealed: bool,
    highlighted: Option<usize>,
    timer: TimerService,
    summary: Option<ScoreSummary>,
    completion: Option<CompletionReason>,
}

impl QuizSession {
    /// Create an idle session around a timer
    pub fn new(timer: TimerService) -> Self {
        Self { timer, ..Self::default() }
    }

    /// Load a quiz and start the main sequence at question 0
    ///
    /// A malformed quiz is rejected before anything changes.
    pub fn load_quiz(&mut self, quiz: Quiz, time_limit_secs: u32) -> Result<ViewState, SessionError> {
        quiz.validate()?;

        self.timer.reset();
        tracing::info!(
            topic = %quiz.topic,
            questions = quiz.len(),
            time_limit_secs,
            "quiz loaded"
        );

        self.quiz = Some(quiz);
        self.phase = Phase::MainSequence;
        self.current = 0;
        self.answers.clear();
        self.skipped.clear();
        self.revealed = false;
        self.highlighted = None;
        self.summary = None;
        self.completion = None;
        self.timer.start(time_limit_secs);

        Ok(self.view())
    }

    /// Highlight an option on the current question without committing it
    pub fn select_option(&mut self, option: usize) -> Result<ViewState, SessionError> {
        self.ensure_active(Intent::SelectOption)?;
        if self.revealed {
            return Err(SessionError::AnswerLocked);
        }

        let count = self.current_question().map(|q| q.options.len()).unwrap_or(0);
        if option >= count {
            return Err(SessionError::OptionOutOfRange { option, count });
        }

        self.highlighted = Some(option);
        Ok(self.view())
    }

    /// Defer the current question to the review pass
    pub fn skip(&mut self) -> Result<ViewState, SessionError> {
        if self.phase != Phase::MainSequence || self.revealed {
            return Err(self.rejected(Intent::Skip));
        }

        if !self.skipped.contains(&self.current) {
            self.skipped.push(self.current);
        }
        tracing::debug!(question = self.current, skipped = self.skipped.len(), "question skipped");

        self.advance();
        Ok(self.view())
    }

    /// Move on, committing the highlighted option without revealing it
    pub fn next(&mut self) -> Result<ViewState, SessionError> {
        if self.phase != Phase::MainSequence || self.is_last_question() {
            return Err(self.rejected(Intent::Next));
        }

        self.commit_highlighted();
        self.advance();
        Ok(self.view())
    }

    /// Primary action: reveal on first press, navigate on the second
    pub fn confirm(&mut self) -> Result<ViewState, SessionError> {
        self.ensure_active(Intent::Confirm)?;

        if self.revealed {
            self.advance();
            return Ok(self.view());
        }

        if self.highlighted.is_none() {
            return Err(SessionError::NoOptionSelected);
        }

        self.commit_highlighted();
        self.revealed = true;
        tracing::debug!(
            question = self.current,
            correct = self.current_answer_correct().unwrap_or(false),
            "answer revealed"
        );

        Ok(self.view())
    }

    /// Force completion because the countdown ran out
    ///
    /// Returns `None` when there is no session to end.
    pub fn timer_expired(&mut self) -> Option<ViewState> {
        if !self.is_active() {
            self.timer.stop();
            return None;
        }

        if !self.revealed {
            self.commit_highlighted();
        }
        tracing::info!(phase = ?self.phase, question = self.current, "time expired");
        self.complete(CompletionReason::TimeExpired);
        Some(self.view())
    }

    /// Apply one pulse from the background timer
    ///
    /// Returns the refreshed view when the pulse changed anything.
    pub fn handle_timer_pulse(&mut self, pulse: TimerPulse) -> Option<ViewState> {
        let event = self.timer.on_pulse(pulse);
        self.apply_timer_event(event)
    }

    /// Count one second down on a manually driven timer
    pub fn tick(&mut self) -> Option<ViewState> {
        let event = self.timer.elapse_second();
        self.apply_timer_event(event)
    }

    fn apply_timer_event(&mut self, event: Option<TimerEvent>) -> Option<ViewState> {
        match event? {
            TimerEvent::Tick { .. } => Some(self.view()),
            TimerEvent::Expired => self.timer_expired(),
        }
    }

    /// Throw away a finished session and return to idle
    pub fn restart(&mut self) -> Result<ViewState, SessionError> {
        if self.phase != Phase::Completed {
            return Err(self.rejected(Intent::Restart));
        }

        self.timer.reset();
        self.quiz = None;
        self.phase = Phase::Idle;
        self.current = 0;
        self.answers.clear();
        self.skipped.clear();
        self.revealed = false;
        self.highlighted = None;
        self.summary = None;
        self.completion = None;
        tracing::debug!("session restarted");

        Ok(self.view())
    }

    /// Project the current state for presentation
    pub fn view(&self) -> ViewState {
        view::project(self)
    }

    /// Shared forward-motion rule for skip, next and the second confirm
    fn advance(&mut self) {
        match self.phase {
            Phase::ReviewingSkipped => {
                let following = self
                    .skipped
                    .iter()
                    .position(|&i| i == self.current)
                    .and_then(|pos| self.skipped.get(pos + 1))
                    .copied();
                match following {
                    Some(index) => self.move_to(index),
                    None => self.complete(CompletionReason::Finished),
                }
            }
            Phase::MainSequence => {
                if !self.is_last_question() {
                    self.move_to(self.current + 1);
                } else if let Some(&first) = self.skipped.first() {
                    tracing::debug!(skipped = self.skipped.len(), "reviewing skipped questions");
                    self.phase = Phase::ReviewingSkipped;
                    self.move_to(first);
                } else {
                    self.complete(CompletionReason::Finished);
                }
            }
            Phase::Idle | Phase::Completed => {}
        }
    }

    fn move_to(&mut self, index: usize) {
        self.current = index;
        self.revealed = false;
        self.highlighted = None;
    }

    fn complete(&mut self, reason: CompletionReason) {
        self.timer.stop();

        let Some(quiz) = self.quiz.as_ref() else {
            return;
        };
        let summary = scoring::score(quiz, &self.answers);
        tracing::info!(
            topic = %summary.topic,
            correct = summary.correct_count,
            total = summary.total,
            percentage = summary.percentage,
            ?reason,
            "quiz completed"
        );

        self.summary = Some(summary);
        self.completion = Some(reason);
        self.phase = Phase::Completed;
        self.revealed = false;
        self.highlighted = None;
    }

    fn commit_highlighted(&mut self) {
        if let Some(option) = self.highlighted {
            self.answers.insert(self.current, option);
        }
    }

    fn ensure_active(&self, intent: Intent) -> Result<(), SessionError> {
        if self.is_active() { Ok(()) } else { Err(self.rejected(intent)) }
    }

    fn rejected(&self, intent: Intent) -> SessionError {
        SessionError::InvalidTransition { intent, phase: self.phase }
    }

    fn is_active(&self) -> bool {
        matches!(self.phase, Phase::MainSequence | Phase::ReviewingSkipped)
    }

    fn is_last_question(&self) -> bool {
        self.quiz.as_ref().is_none_or(|quiz| self.current >= quiz.last_index())
    }

    /// Whether the committed answer for the current question is correct
    fn current_answer_correct(&self) -> Option<bool> {
        let question = self.current_question()?;
        self.answers.get(&self.current).map(|&a| a == question.correct_index)
    }

    // Read-only accessors

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The loaded quiz
    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    /// Index of the displayed question
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The displayed question
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref().and_then(|quiz| quiz.questions.get(self.current))
    }

    /// Committed answers
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Skip queue, in skip order
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    /// Highlighted option on the displayed question
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether the displayed question has been revealed
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Countdown state
    pub fn timer(&self) -> &TimerService {
        &self.timer
    }

    /// Final score, once completed
    pub fn summary(&self) -> Option<&ScoreSummary> {
        self.summary.as_ref()
    }

    /// Why the session completed
    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }
}
