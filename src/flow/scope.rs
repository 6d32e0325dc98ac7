//! Screen focus scopes and cancellation.
//!
//! Every visit to a screen owns a [`ScreenScope`]. Work started during the
//! visit carries the scope's [`CancelToken`]; dropping the scope when the
//! screen is left cancels the token, and completions that arrive afterwards
//! are discarded instead of being written into another visit's state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Screen;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// One focused visit to a screen. Cancels its token on drop.
#[derive(Debug)]
pub struct ScreenScope {
    screen: Screen,
    token: CancelToken,
}

impl ScreenScope {
    /// Subscribe to focus for `screen`.
    #[must_use]
    pub fn enter(screen: Screen) -> Self {
        log::debug!("Focus: {}", screen);
        Self {
            screen,
            token: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Token for work tied to this visit.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.token.cancel();
        log::debug!("Blur: {}", self.screen);
    }
}
