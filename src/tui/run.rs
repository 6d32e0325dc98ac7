//! TUI main loop.
//!
//! The kiosk takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Hiding the cursor
//!
//! All these changes are reverted on exit, including on panic.
//!
//! # Event Loop
//!
//! 1. Apply finished requests and scanner input (`FlowController::pump`)
//! 2. Render the current state
//! 3. Poll for a key press with a timeout and hand it to the flow
//! 4. Limit frame rate to ~60 FPS

use std::io::{self, Stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::events::{map_key, EventHandler, KeyContext};
use super::theme::Theme;
use super::ui::render;
use crate::flow::{FlowController, Screen};
use crate::input::InputMode;

/// Frame rate limit: 60 FPS = ~16.67ms per frame.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout: Use the frame duration for responsive rendering.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),

    /// The TUI was interrupted by a shutdown signal.
    #[error("interrupted by shutdown signal")]
    Interrupted,
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive kiosk until the guard exits or a shutdown is signalled.
///
/// The terminal is always restored to its original state, even on error or panic.
///
/// # Errors
///
/// Returns `TuiError::Interrupted` if `shutdown_flag` was set.
pub fn run_kiosk(
    flow: &mut FlowController,
    theme: Theme,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_inner(flow, &theme, shutdown_flag);

    let _ = panic::take_hook();
    result
}

fn run_inner(
    flow: &mut FlowController,
    theme: &Theme,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, flow, theme, shutdown_flag);
    restore_terminal()?;
    result
}

fn event_loop(
    terminal: &mut Terminal,
    flow: &mut FlowController,
    theme: &Theme,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    let event_handler = EventHandler::new();
    let mut last_render = Instant::now();

    loop {
        if let Some(ref flag) = shutdown_flag {
            if flag.load(Ordering::SeqCst) {
                log::info!("Shutdown signal received, exiting kiosk");
                return Err(TuiError::Interrupted);
            }
        }

        if flow.should_quit() {
            log::info!("Kiosk exited normally");
            return Ok(());
        }

        flow.pump();
        terminal.draw(|frame| render(frame, flow, theme))?;

        if let Some(key) = event_handler.poll(POLL_TIMEOUT)? {
            if let Some(action) = map_key(&key, key_context(flow)) {
                if !flow.handle_action(action) {
                    log::trace!("Action not handled: {:?}", action);
                }
            }
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }
}

/// Key interpretation context for the flow's current state.
fn key_context(flow: &FlowController) -> KeyContext {
    let text_entry = match flow.screen() {
        Screen::Login => true,
        Screen::Scanner => flow.input().mode() == InputMode::Manual,
        Screen::Confirmation => false,
    };
    KeyContext {
        screen: flow.screen(),
        dialog_open: flow.dialog().is_some(),
        text_entry,
    }
}

fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");
    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal() -> TuiResult<()> {
    log::debug!("Restoring terminal");
    let _ = terminal::disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    Ok(())
}
