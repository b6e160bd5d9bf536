//! Key map: terminal events to dashboard actions.

#![allow(missing_docs)]

#[cfg(feature = "cli")]
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Everything the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputAction {
    ScrollLeft,
    ScrollRight,
    Quit,
    /// Terminal resized to `height` rows by `width` columns.
    Resize {
        height: u16,
        width: u16,
    },
    #[default]
    NoOp,
}

/// Resolve a key press. Releases and repeats of unbound keys are `NoOp`.
#[cfg(feature = "cli")]
#[must_use]
pub fn resolve_key(key: &KeyEvent) -> InputAction {
    if key.kind == KeyEventKind::Release {
        return InputAction::NoOp;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => InputAction::ScrollLeft,
        KeyCode::Char('l') | KeyCode::Right => InputAction::ScrollRight,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        _ => InputAction::NoOp,
    }
}

/// Resolve one polled event; `None` (nothing pending) is `NoOp`.
#[cfg(feature = "cli")]
#[must_use]
pub fn resolve_event(event: Option<&Event>) -> InputAction {
    match event {
        Some(Event::Key(key)) => resolve_key(key),
        Some(Event::Resize(cols, rows)) => InputAction::Resize {
            height: *rows,
            width: *cols,
        },
        _ => InputAction::NoOp,
    }
}
