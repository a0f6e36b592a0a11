//! Event handling.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// Terminal event handler.
pub struct EventHandler {
    poll_timeout: Duration,
}

impl EventHandler {
    const DEFAULT_POLL_TIMEOUT_MS: u64 = 100;

    /// Creates new handler with default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_timeout: Duration::from_millis(Self::DEFAULT_POLL_TIMEOUT_MS),
        }
    }

    /// Creates handler with custom timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            poll_timeout: timeout,
        }
    }

    /// Polls for events.
    ///
    /// # Errors
    /// Returns IO error if polling fails.
    pub fn poll(&self) -> std::io::Result<Option<Event>> {
        if event::poll(self.poll_timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Checks if key is a quit event.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            } | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
    }

}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test]
    fn test_quit_events() {
        assert!(EventHandler::is_quit_event(&make_key_event(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
        assert!(EventHandler::is_quit_event(&make_key_event(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn test_non_quit_events() {
        assert!(!EventHandler::is_quit_event(&make_key_event(
            KeyCode::Char('a'),
            KeyModifiers::NONE
        )));
        assert!(!EventHandler::is_quit_event(&make_key_event(
            KeyCode::Esc,
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_poll_timeout_construction() {
        let handler = EventHandler::with_timeout(Duration::from_millis(10));
        assert_eq!(handler.poll_timeout, Duration::from_millis(10));
    }
}
