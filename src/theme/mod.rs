//! Colour themes for the quiz screens

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::quiz::OptionFeedback;

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

impl Theme {
    /// Built-in theme with the given name, ignoring case
    pub fn named(name: &str) -> Option<Self> {
        [Theme::tokyo_night()].into_iter().find(|theme| theme.name.eq_ignore_ascii_case(name))
    }

    /// Foreground for an option given its reveal feedback
    pub fn feedback_color(&self, feedback: OptionFeedback) -> Color {
        match feedback {
            OptionFeedback::Hidden => self.fg_secondary,
            OptionFeedback::Correct => self.success,
            OptionFeedback::IncorrectPick => self.error,
            OptionFeedback::Neutral => self.fg_muted,
        }
    }

    /// Foreground for the countdown
    pub fn clock_color(&self, low_time: bool) -> Color {
        if low_time { self.warning } else { self.info }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}
