//! Quiz session engine
//!
//! Question sequencing with a skip/review pass, a quiz-wide countdown and
//! final scoring, independent of how the quiz is rendered.

pub mod error;
pub mod model;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod view;

// Re-export commonly used types
pub use error::{QuizError, SessionError};
pub use model::{Difficulty, Question, Quiz};
pub use scoring::{AnswerMap, QuestionReview, ScoreSummary, score};
pub use session::{CompletionReason, Intent, Phase, QuizSession};
pub use timer::{TimerEvent, TimerPulse, TimerService};
pub use view::{OptionFeedback, PrimaryAction, ViewState};
