//! UI rendering components

pub mod layout;
pub mod quiz_panel;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::state::AppState;
use crate::quiz::Phase;
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    match state.view.phase {
        Phase::Idle => {
            layout::draw_placeholder(frame, "No quiz loaded", theme);
        }
        Phase::MainSequence | Phase::ReviewingSkipped | Phase::Completed => {
            quiz_panel::draw(frame, area, state, theme);
        }
    }
}
