//! Key mapping for the quiz screen

use crossterm::event::{KeyCode, KeyModifiers};

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Highlight
    HighlightUp,
    HighlightDown,
    Pick(usize),

    // Session intents
    Primary,
    Skip,
    Next,
    Retake,

    Quit,
}

/// Map a key press to an action
pub fn key_to_action(key: KeyCode, modifiers: KeyModifiers, vim_mode: bool) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key {
        KeyCode::Up => Some(Action::HighlightUp),
        KeyCode::Down => Some(Action::HighlightDown),
        KeyCode::Char('k') if vim_mode => Some(Action::HighlightUp),
        KeyCode::Char('j') if vim_mode => Some(Action::HighlightDown),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Pick(c as usize - '1' as usize)),
        KeyCode::Char(c @ 'a'..='h') => Some(Action::Pick(c as usize - 'a' as usize)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Primary),
        KeyCode::Char('s') => Some(Action::Skip),
        KeyCode::Char('n') | KeyCode::Right => Some(Action::Next),
        KeyCode::Char('r') => Some(Action::Retake),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(key: KeyCode) -> Option<Action> {
        key_to_action(key, KeyModifiers::NONE, true)
    }

    #[test]
    fn vim_keys_move_highlight() {
        assert_eq!(plain(KeyCode::Char('j')), Some(Action::HighlightDown));
        assert_eq!(plain(KeyCode::Char('k')), Some(Action::HighlightUp));
    }

    #[test]
    fn vim_keys_ignored_without_vim_mode() {
        assert_eq!(key_to_action(KeyCode::Char('j'), KeyModifiers::NONE, false), None);
        assert_eq!(
            key_to_action(KeyCode::Down, KeyModifiers::NONE, false),
            Some(Action::HighlightDown)
        );
    }

    #[test]
    fn digits_and_letters_pick_options() {
        assert_eq!(plain(KeyCode::Char('1')), Some(Action::Pick(0)));
        assert_eq!(plain(KeyCode::Char('4')), Some(Action::Pick(3)));
        assert_eq!(plain(KeyCode::Char('a')), Some(Action::Pick(0)));
        assert_eq!(plain(KeyCode::Char('c')), Some(Action::Pick(2)));
    }

    #[test]
    fn enter_is_primary_action() {
        assert_eq!(plain(KeyCode::Enter), Some(Action::Primary));
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(key_to_action(KeyCode::Char('c'), KeyModifiers::CONTROL, true), Some(Action::Quit));
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(plain(KeyCode::Char('x')), None);
    }
}
