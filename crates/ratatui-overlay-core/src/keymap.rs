//! Key patterns. Modifiers must match exactly, so `Shift+Esc` is not `Esc`.

use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && pattern.modifiers == event.modifiers
}

pub fn matches_any(patterns: &[KeyEvent], event: &KeyEvent) -> bool {
    patterns.iter().any(|p| key_event_matches(p, event))
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        ctrl: true,
        ..KeyModifiers::none()
    })
}

pub fn key_esc() -> KeyEvent {
    KeyEvent::new(KeyCode::Esc)
}

/// Keys that dismiss a fickle modal.
pub fn default_dismiss_keys() -> Vec<KeyEvent> {
    vec![key_esc()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_match_exact_modifiers() {
        let quit = [key_char('q')];
        assert!(matches_any(&quit, &key_char('q')));
        assert!(!matches_any(&quit, &key_ctrl('q')));
    }

    #[test]
    fn esc_with_modifiers_is_a_different_key() {
        let shifted = key_esc().with_modifiers(KeyModifiers {
            shift: true,
            ..KeyModifiers::none()
        });
        let dismiss = default_dismiss_keys();
        assert!(matches_any(&dismiss, &key_esc()));
        assert!(!matches_any(&dismiss, &shifted));
    }
}
