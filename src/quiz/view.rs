//! What the presentation layer should show right now
//!
//! Everything here is derived from [`QuizSession`] by [`project`]; nothing in a
//! [`ViewState`] feeds back into the session.

use serde::Serialize;

use super::scoring::ScoreSummary;
use super::session::{CompletionReason, Phase, QuizSession};

/// Per-option feedback after a reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionFeedback {
    /// Not revealed yet
    Hidden,
    /// The correct option
    Correct,
    /// The user's pick, and it is wrong
    IncorrectPick,
    /// Neither correct nor picked
    Neutral,
}

/// What the primary button does next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimaryAction {
    /// Grade and reveal the highlighted option
    Confirm,
    /// Go to the following question
    NextQuestion,
    /// Leave the main sequence for the skipped questions
    ReviewSkipped,
    /// Finish and show the score
    ViewResults,
}

impl PrimaryAction {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirm => "Submit Answer",
            Self::NextQuestion => "Next Question",
            Self::ReviewSkipped => "Review Skipped Questions",
            Self::ViewResults => "View Results",
        }
    }
}

/// One option as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// Letter shown next to the option
    pub letter: char,
    pub text: String,
    pub highlighted: bool,
    pub feedback: OptionFeedback,
}

/// The displayed question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    /// Zero-based question index
    pub index: usize,
    pub text: String,
    pub options: Vec<OptionView>,
    pub highlighted: Option<usize>,
    pub revealed: bool,
    /// Whether the committed answer is right; only set once revealed
    pub answered_correctly: Option<bool>,
    /// Only set once revealed
    pub explanation: Option<String>,
    /// 1-based position within the skip queue and its length, during review
    pub review_position: Option<(usize, usize)>,
}

/// Countdown as displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimerView {
    /// Seconds left, or None when there is no limit or the countdown is hidden
    pub seconds_remaining: Option<u32>,
    pub low_time: bool,
}

/// Full description of the screen for one session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub phase: Phase,
    pub topic: Option<String>,
    pub question: Option<QuestionView>,
    pub total_questions: usize,
    pub answered_count: usize,
    pub skipped_count: usize,
    pub timer: TimerView,
    pub primary_action: Option<PrimaryAction>,
    pub can_skip: bool,
    pub can_next: bool,
    pub summary: Option<ScoreSummary>,
    pub completion: Option<CompletionReason>,
}

/// Project a session into a view state
pub fn project(session: &QuizSession) -> ViewState {
    let phase = session.phase();
    let quiz = session.quiz();
    let total_questions = quiz.map(|q| q.len()).unwrap_or(0);
    let active = matches!(phase, Phase::MainSequence | Phase::ReviewingSkipped);
    let is_last = session.current_index() + 1 >= total_questions;

    let question = if active { project_question(session) } else { None };

    // The countdown keeps running during review but is not shown
    let timer = if phase == Phase::MainSequence && session.timer().is_running() {
        TimerView {
            seconds_remaining: Some(session.timer().seconds_remaining()),
            low_time: session.timer().is_low_time(),
        }
    } else {
        TimerView::default()
    };

    let (summary, completion) = if phase == Phase::Completed {
        (session.summary().cloned(), session.completion())
    } else {
        (None, None)
    };

    ViewState {
        phase,
        topic: quiz.map(|q| q.topic.clone()),
        question,
        total_questions,
        answered_count: session.answers().len(),
        skipped_count: session.skipped().len(),
        timer,
        primary_action: if active { Some(primary_action(session)) } else { None },
        can_skip: phase == Phase::MainSequence && !session.is_revealed(),
        can_next: phase == Phase::MainSequence && !is_last,
        summary,
        completion,
    }
}

fn project_question(session: &QuizSession) -> Option<QuestionView> {
    let question = session.current_question()?;
    let index = session.current_index();
    let revealed = session.is_revealed();
    let highlighted = session.highlighted();
    let committed = session.answers().get(&index).copied();

    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let feedback = if !revealed {
                OptionFeedback::Hidden
            } else if i == question.correct_index {
                OptionFeedback::Correct
            } else if Some(i) == committed {
                OptionFeedback::IncorrectPick
            } else {
                OptionFeedback::Neutral
            };
            OptionView {
                letter: option_letter(i),
                text: text.clone(),
                highlighted: highlighted == Some(i),
                feedback,
            }
        })
        .collect();

    let review_position = if session.phase() == Phase::ReviewingSkipped {
        session
            .skipped()
            .iter()
            .position(|&i| i == index)
            .map(|pos| (pos + 1, session.skipped().len()))
    } else {
        None
    };

    Some(QuestionView {
        index,
        text: question.question.clone(),
        options,
        highlighted,
        revealed,
        answered_correctly: if revealed {
            committed.map(|c| c == question.correct_index)
        } else {
            None
        },
        explanation: if revealed { question.explanation.clone() } else { None },
        review_position,
    })
}

/// Label of the primary button, derived from where `advance` would go
fn primary_action(session: &QuizSession) -> PrimaryAction {
    if !session.is_revealed() {
        return PrimaryAction::Confirm;
    }

    let total = session.quiz().map(|q| q.len()).unwrap_or(0);
    let current = session.current_index();
    match session.phase() {
        Phase::ReviewingSkipped => {
            let skipped = session.skipped();
            let has_following =
                skipped.iter().position(|&i| i == current).is_some_and(|pos| pos + 1 < skipped.len());
            if has_following { PrimaryAction::NextQuestion } else { PrimaryAction::ViewResults }
        }
        _ if current + 1 < total => PrimaryAction::NextQuestion,
        _ if !session.skipped().is_empty() => PrimaryAction::ReviewSkipped,
        _ => PrimaryAction::ViewResults,
    }
}

/// `A`, `B`, … for option indices
pub fn option_letter(index: usize) -> char {
    if index < 26 { (b'A' + index as u8) as char } else { '?' }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::model::{Question, Quiz};
    use crate::quiz::timer::TimerService;
    use pretty_assertions::assert_eq;

    fn session(n: usize, limit: u32) -> QuizSession {
        let questions = (0..n)
            .map(|i| Question::new(format!("Q{i}"), ["yes", "no", "maybe"], 1).with_explanation("Because."))
            .collect();
        let mut session = QuizSession::new(TimerService::manual());
        session.load_quiz(Quiz::new("Views", questions), limit).unwrap();
        session
    }

    #[test]
    fn idle_view_is_empty() {
        let view = QuizSession::default().view();
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.question.is_none());
        assert!(view.primary_action.is_none());
        assert!(!view.can_skip);
        assert_eq!(view.total_questions, 0);
    }

    #[test]
    fn unrevealed_question_hides_feedback_and_explanation() {
        let mut session = session(2, 0);
        let view = session.select_option(2).unwrap();
        let question = view.question.unwrap();

        assert!(question.options.iter().all(|o| o.feedback == OptionFeedback::Hidden));
        assert!(question.options[2].highlighted);
        assert_eq!(question.explanation, None);
        assert_eq!(question.answered_correctly, None);
        assert_eq!(view.primary_action, Some(PrimaryAction::Confirm));
        assert!(view.can_skip);
        assert!(view.can_next);
    }

    #[test]
    fn reveal_marks_correct_and_wrong_pick() {
        let mut session = session(1, 0);
        session.select_option(0).unwrap();
        let view = session.confirm().unwrap();
        let question = view.question.unwrap();

        let feedback: Vec<_> = question.options.iter().map(|o| o.feedback).collect();
        assert_eq!(
            feedback,
            vec![OptionFeedback::IncorrectPick, OptionFeedback::Correct, OptionFeedback::Neutral]
        );
        assert_eq!(question.answered_correctly, Some(false));
        assert_eq!(question.explanation.as_deref(), Some("Because."));
        assert_eq!(view.primary_action, Some(PrimaryAction::ViewResults));
        assert!(!view.can_skip);
    }

    #[test]
    fn primary_action_offers_review_when_questions_were_skipped() {
        let mut session = session(2, 0);
        session.skip().unwrap();
        session.select_option(1).unwrap();
        let view = session.confirm().unwrap();
        assert_eq!(view.primary_action, Some(PrimaryAction::ReviewSkipped));
        assert_eq!(PrimaryAction::ReviewSkipped.label(), "Review Skipped Questions");
    }

    #[test]
    fn review_shows_position_and_hides_countdown() {
        let mut session = session(3, 600);
        session.skip().unwrap();
        session.next().unwrap();
        let main = session.skip().unwrap();
        assert_eq!(main.phase, Phase::ReviewingSkipped);

        let question = main.question.unwrap();
        assert_eq!(question.index, 0);
        assert_eq!(question.review_position, Some((1, 2)));
        assert_eq!(main.timer.seconds_remaining, None);
        assert!(!main.can_next);

        session.select_option(1).unwrap();
        let revealed = session.confirm().unwrap();
        assert_eq!(revealed.primary_action, Some(PrimaryAction::NextQuestion));
    }

    #[test]
    fn main_sequence_shows_countdown_and_low_time() {
        let mut session = session(2, 60);
        let view = session.view();
        assert_eq!(view.timer, TimerView { seconds_remaining: Some(60), low_time: false });

        let view = session.tick().unwrap();
        assert_eq!(view.timer, TimerView { seconds_remaining: Some(59), low_time: true });
    }

    #[test]
    fn completed_view_carries_summary() {
        let mut session = session(1, 0);
        session.select_option(1).unwrap();
        session.confirm().unwrap();
        let view = session.confirm().unwrap();

        assert_eq!(view.phase, Phase::Completed);
        assert!(view.question.is_none());
        assert_eq!(view.summary.as_ref().map(|s| s.percentage), Some(100));
        assert_eq!(view.completion, Some(CompletionReason::Finished));
    }

    #[test]
    fn letters() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }
}
