//! quizdojo - terminal quiz runner
//!
//! Takes a generated multiple-choice quiz through a main pass, an optional
//! review pass over skipped questions and a quiz-wide countdown, then shows a
//! full answer review.

pub mod app;
pub mod config;
pub mod quiz;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use quiz::{Quiz, QuizSession};
pub use theme::Theme;
