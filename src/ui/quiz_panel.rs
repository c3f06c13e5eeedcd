//! Quiz panel: question, results and status line

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::centered_rect;
use crate::app::state::{AppState, ResultsScroll};
use crate::quiz::timer::format_clock;
use crate::quiz::view::{OptionFeedback, PrimaryAction, QuestionView, ViewState};
use crate::quiz::{CompletionReason, Phase, ScoreSummary};
use crate::theme::Theme;

/// Percentage shown as a pass on the results screen
const PASS_PERCENTAGE: u32 = 70;

/// Draw the quiz panel as a centered overlay
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let overlay_area = centered_rect(80, 80, area);
    frame.render_widget(Clear, overlay_area);

    let view = &state.view;
    let block = Block::default()
        .title(title(view))
        .title(clock_title(view, theme).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let [body, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    match (&view.phase, &view.question, &view.summary) {
        (Phase::Completed, _, Some(summary)) => {
            draw_results(frame, body, summary, view, &mut state.results, theme)
        }
        (_, Some(question), _) => draw_question(frame, body, question, view, theme),
        _ => {}
    }

    draw_status(frame, status, state, theme);
}

/// Panel title for the current phase
fn title(view: &ViewState) -> String {
    let topic = view.topic.as_deref().unwrap_or("Quiz");
    match view.phase {
        Phase::ReviewingSkipped => format!(" {} - Reviewing Skipped ", topic),
        Phase::Completed => format!(" {} - Results ", topic),
        _ => format!(" {} ", topic),
    }
}

/// Countdown shown in the top-right corner, empty when hidden
fn clock_title<'a>(view: &ViewState, theme: &Theme) -> Line<'a> {
    match view.timer.seconds_remaining {
        Some(seconds) => {
            let style = Style::default().fg(theme.clock_color(view.timer.low_time));
            let style =
                if view.timer.low_time { style.add_modifier(Modifier::BOLD) } else { style };
            Line::from(Span::styled(format!(" {} ", format_clock(seconds)), style))
        }
        None => Line::default(),
    }
}

/// Draw current question
fn draw_question(
    frame: &mut Frame,
    area: Rect,
    question: &QuestionView,
    view: &ViewState,
    theme: &Theme,
) {
    let mut lines = vec![];

    let position = match question.review_position {
        Some((pos, len)) => format!("Skipped question {} of {}", pos, len),
        None => format!("Question {} of {}", question.index + 1, view.total_questions),
    };
    let mut header = vec![Span::styled(position, Style::default().fg(theme.fg_muted))];
    if view.skipped_count > 0 && view.phase == Phase::MainSequence {
        header.push(Span::styled(
            format!("    {} skipped", view.skipped_count),
            Style::default().fg(theme.warning),
        ));
    }
    lines.push(Line::from(header));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        question.text.as_str(),
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for option in &question.options {
        let prefix = match option.feedback {
            OptionFeedback::Correct => "\u{2713}",       // ✓
            OptionFeedback::IncorrectPick => "\u{2717}", // ✗
            _ if option.highlighted => "\u{25CF}",       // ●
            _ => "\u{25CB}",                             // ○
        };

        let mut style = if option.feedback == OptionFeedback::Hidden && option.highlighted {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.feedback_color(option.feedback))
        };
        if option.highlighted {
            style = style.bg(theme.selection);
        }

        lines.push(Line::from(Span::styled(
            format!("  {} {}) {}", prefix, option.letter, option.text),
            style,
        )));
    }

    if question.revealed {
        lines.push(Line::from(""));
        let (verdict, color) = match question.answered_correctly {
            Some(true) => ("Correct!", theme.success),
            _ => ("Incorrect", theme.error),
        };
        lines.push(Line::from(Span::styled(
            verdict,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        if let Some(ref explanation) = question.explanation {
            lines.push(Line::from(Span::styled(
                explanation.as_str(),
                Style::default().fg(theme.fg_secondary),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(hint(view), Style::default().fg(theme.fg_muted))));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}

/// Key hints derived from what the session currently accepts
fn hint(view: &ViewState) -> String {
    let mut parts = vec![];
    if view.primary_action == Some(PrimaryAction::Confirm) {
        parts.push("[j/k] Select".to_string());
    }
    if let Some(action) = view.primary_action {
        parts.push(format!("[Enter] {}", action.label()));
    }
    if view.can_skip {
        parts.push("[s] Skip".to_string());
    }
    if view.can_next {
        parts.push("[n] Next".to_string());
    }
    parts.push("[q] Quit".to_string());
    parts.join("    ")
}

/// Draw results screen
fn draw_results(
    frame: &mut Frame,
    area: Rect,
    summary: &ScoreSummary,
    view: &ViewState,
    scroll: &mut ResultsScroll,
    theme: &Theme,
) {
    let [review_area, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);


    let mut lines = vec![Line::from("")];

    if view.completion == Some(CompletionReason::TimeExpired) {
        lines.push(Line::from(Span::styled(
            "Time's up!",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )));
    }

    let score_color = if summary.passed(PASS_PERCENTAGE) { theme.success } else { theme.error };
    lines.push(Line::from(Span::styled(
        format!(
            "{}/{} correct ({}%)",
            summary.correct_count, summary.total, summary.percentage
        ),
        Style::default().fg(score_color).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("{} of {} answered", summary.answered_count(), summary.total),
        Style::default().fg(theme.fg_muted),
    )));
    lines.push(Line::from(""));

    for review in &summary.per_question {
        let (marker, color) = if review.is_correct {
            ("\u{2713}", theme.success)
        } else if review.is_answered() {
            ("\u{2717}", theme.error)
        } else {
            ("-", theme.warning)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{} Q{}. ", marker, review.index + 1), Style::default().fg(color)),
            Span::styled(review.question.as_str(), Style::default().fg(theme.fg_primary)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("     Your answer: ", Style::default().fg(theme.fg_muted)),
            Span::styled(review.chosen_display(), Style::default().fg(color)),
        ]));
        if !review.is_correct {
            lines.push(Line::from(vec![
                Span::styled("     Correct answer: ", Style::default().fg(theme.fg_muted)),
                Span::styled(review.correct_text.as_str(), Style::default().fg(theme.success)),
            ]));
        }
        if let Some(ref explanation) = review.explanation {
            lines.push(Line::from(Span::styled(
                format!("     {}", explanation),
                Style::default().fg(theme.fg_secondary),
            )));
        }
    }

    // Reserve 1 column for scrollbar
    let content_area = Rect { width: review_area.width.saturating_sub(1), ..review_area };
    let scrollbar_x = review_area.x + review_area.width.saturating_sub(1);

    let width = content_area.width.max(1) as usize;
    scroll.total_lines = lines.iter().map(|line| line.width().max(1).div_ceil(width)).sum();
    scroll.visible_height = content_area.height as usize;
    scroll.clamp_scroll();

    let offset = u16::try_from(scroll.scroll_offset).unwrap_or(u16::MAX);
    let para = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((offset, 0));
    frame.render_widget(para, content_area);

    draw_scrollbar(frame, scrollbar_x, review_area.y, review_area.height, scroll, theme);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "[j/k] Scroll    [r] Retake    [q] Quit",
            Style::default().fg(theme.fg_muted),
        )),
        footer,
    );
}

/// Draw a scrollbar beside the review when it overflows
fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    scroll: &ResultsScroll,
    theme: &Theme,
) {
    let height = height as usize;
    if height == 0 || scroll.total_lines <= height {
        return;
    }

    let thumb_height = (height * height).div_ceil(scroll.total_lines).max(1);
    let max_scroll = scroll.max_scroll();
    let thumb_top = if max_scroll == 0 {
        0
    } else {
        (height - thumb_height) * scroll.scroll_offset / max_scroll
    };

    for i in 0..height {
        let in_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, color) = if in_thumb {
            ("\u{2588}", theme.accent_secondary) // █
        } else {
            ("\u{2591}", theme.border) // ░
        };
        frame.render_widget(
            Paragraph::new(ch).style(Style::default().fg(color)),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}

/// Draw the status line
fn draw_status(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(ref message) = state.status.message else {
        return;
    };
    let color = if state.status.is_error { theme.error } else { theme.info };
    let para = Paragraph::new(Span::styled(message.as_str(), Style::default().fg(color)));
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::Action;
    use crate::quiz::{Question, Quiz, QuizSession, TimerService};
    use ratatui::{Terminal, backend::TestBackend};

    fn state(limit: u32) -> AppState {
        let quiz = Quiz::new(
            "Rendering",
            vec![
                Question::new("Pick the vowel", ["b", "e", "k"], 1).with_explanation("E is a vowel."),
                Question::new("Pick the digit", ["7", "x"], 0),
            ],
        );
        AppState::new(QuizSession::new(TimerService::manual()), quiz, limit).unwrap()
    }

    fn render(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| crate::ui::draw(frame, state, &Theme::default())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn renders_question_and_countdown() {
        let mut state = state(120);
        let screen = render(&mut state);
        assert!(screen.contains("Question 1 of 2"));
        assert!(screen.contains("Pick the vowel"));
        assert!(screen.contains("02:00"));
    }

    #[test]
    fn renders_reveal_explanation() {
        let mut state = state(0);
        state.apply(Action::Pick(1));
        state.apply(Action::Primary);
        let screen = render(&mut state);
        assert!(screen.contains("Correct!"));
        assert!(screen.contains("E is a vowel."));
        assert!(screen.contains("Next Question"));
    }

    #[test]
    fn renders_results() {
        let mut state = state(0);
        state.apply(Action::Pick(0));
        state.apply(Action::Next);
        state.apply(Action::Skip);
        assert_eq!(state.view.phase, Phase::ReviewingSkipped);
        state.apply(Action::Pick(0));
        state.apply(Action::Primary);
        state.apply(Action::Primary);

        let screen = render(&mut state);
        assert!(screen.contains("1/2 correct (50%)"));
        assert!(screen.contains("Correct answer: e"));
    }

    #[test]
    fn long_review_scrolls_to_the_last_question() {
        let questions = (1..=12)
            .map(|n| {
                Question::new(format!("Question {n}?"), ["wrong", "right"], 1)
                    .with_explanation(format!("Explanation for question {n}."))
            })
            .collect();
        let quiz = Quiz::new("Long", questions);
        let mut state = AppState::new(QuizSession::new(TimerService::manual()), quiz, 0).unwrap();
        for _ in 0..11 {
            state.apply(Action::Pick(0));
            state.apply(Action::Next);
        }
        state.apply(Action::Pick(0));
        state.apply(Action::Primary);
        state.apply(Action::Primary);
        assert_eq!(state.view.phase, Phase::Completed);

        let screen = render(&mut state);
        assert!(screen.contains("Q1. Question 1?"));
        assert!(!screen.contains("Q12. Question 12?"));
        assert!(screen.contains("[r] Retake"));
        assert!(state.results.max_scroll() > 0);

        for _ in 0..200 {
            state.apply(Action::HighlightDown);
        }
        let screen = render(&mut state);
        assert!(screen.contains("Q12. Question 12?"));
        assert!(screen.contains("Explanation for question 12."));
        assert!(!screen.contains("Q1. Question 1?"));
        assert!(screen.contains("[r] Retake"));
    }

    #[test]
    fn hint_lists_available_actions() {
        let state = state(0);
        let hint = hint(&state.view);
        assert!(hint.contains("[Enter] Submit Answer"));
        assert!(hint.contains("[s] Skip"));
        assert!(hint.contains("[n] Next"));
    }
}
