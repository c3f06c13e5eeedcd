//! Error types for quiz sessions

use thiserror::Error;

use super::session::{Intent, Phase};

/// Reasons a quiz object cannot be used for a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The quiz contains no questions
    #[error("quiz has no questions")]
    NoQuestions,

    /// A question offers fewer than two options
    #[error("question {} has {count} option(s), at least 2 are required", .question + 1)]
    TooFewOptions {
        /// Zero-based question index
        question: usize,
        /// Number of options found
        count: usize,
    },

    /// A question's correct index points past its options
    #[error("question {} marks option {correct} as correct but only has {count} options", .question + 1)]
    CorrectOutOfRange {
        /// Zero-based question index
        question: usize,
        /// The offending correct index
        correct: usize,
        /// Number of options found
        count: usize,
    },
}

/// Errors returned by session operations
///
/// Every variant leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Confirm was pressed before any option was highlighted
    #[error("Select an answer first")]
    NoOptionSelected,

    /// The option does not exist on the current question
    #[error("Option {option} does not exist (question has {count} options)")]
    OptionOutOfRange {
        /// Requested option index
        option: usize,
        /// Number of options on the question
        count: usize,
    },

    /// The current question was already revealed, its answer can no longer change
    #[error("Answer already submitted for this question")]
    AnswerLocked,

    /// The intent is not valid in the current phase
    #[error("Cannot {intent} while {phase}")]
    InvalidTransition {
        /// The rejected intent
        intent: Intent,
        /// Phase the session was in
        phase: Phase,
    },

    /// The quiz could not be loaded
    #[error("Malformed quiz: {0}")]
    MalformedQuiz(#[from] QuizError),
}

impl SessionError {
    /// Bad user input for an otherwise valid intent
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SessionError::NoOptionSelected
                | SessionError::OptionOutOfRange { .. }
                | SessionError::AnswerLocked
        )
    }

    /// Intent issued in a phase that does not accept it
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, SessionError::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_errors_use_one_based_question_numbers() {
        let err = QuizError::CorrectOutOfRange { question: 0, correct: 4, count: 4 };
        assert_eq!(err.to_string(), "question 1 marks option 4 as correct but only has 4 options");
    }

    #[test]
    fn invalid_transition_message_names_intent_and_phase() {
        let err = SessionError::InvalidTransition { intent: Intent::Skip, phase: Phase::ReviewingSkipped };
        assert_eq!(err.to_string(), "Cannot skip while reviewing skipped questions");
        assert!(err.is_invalid_transition());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn classification_of_input_errors() {
        assert!(SessionError::NoOptionSelected.is_invalid_input());
        assert!(SessionError::AnswerLocked.is_invalid_input());
        assert!(!SessionError::MalformedQuiz(QuizError::NoQuestions).is_invalid_input());
    }
}
