//! TUI event handling with crossterm.
//!
//! # Overview
//! Key presses are translated into flow [`Action`]s. The same key means
//! different things depending on context: letters are typed into text
//! fields, but answer "y"/"n" while a dialog is open.
//!
//! | Key              | Action                                  |
//! |------------------|-----------------------------------------|
//! | Enter            | Submit / confirm dialog                 |
//! | Esc              | Back / dismiss dialog                   |
//! | Tab, Up, Down    | Switch login field                      |
//! | Backspace        | Delete last character                   |
//! | Ctrl+U           | Clear field                             |
//! | r                | Rescan (Confirmation)                   |
//! | Ctrl+C, Ctrl+Q   | Exit prompt                             |

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use crate::flow::field::TextEdit;
use crate::flow::{Action, Screen};

/// Error type for event polling.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to read terminal event: {0}")]
    Io(#[from] io::Error),
}

/// What the key is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub screen: Screen,
    /// A modal dialog is open.
    pub dialog_open: bool,
    /// The focused screen has a text field.
    pub text_entry: bool,
}

/// Map a key press to an action.
#[must_use]
pub fn map_key(key: &KeyEvent, ctx: KeyContext) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('u') if ctx.text_entry && !ctx.dialog_open => {
                Some(Action::Edit(TextEdit::Clear))
            }
            _ => None,
        };
    }

    if ctx.dialog_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Confirm),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::Cancel),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PreviousField),
        KeyCode::Backspace if ctx.text_entry => Some(Action::Edit(TextEdit::Backspace)),
        KeyCode::Char(c) if ctx.text_entry && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Action::Edit(TextEdit::Insert(c)))
        }
        KeyCode::Char('r') | KeyCode::Char('R') if ctx.screen == Screen::Confirmation => {
            Some(Action::Rescan)
        }
        _ => None,
    }
}

/// Polls the terminal for key presses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventHandler;

impl EventHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for a key press. Other events are ignored.
    pub fn poll(&self, timeout: Duration) -> Result<Option<KeyEvent>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}
