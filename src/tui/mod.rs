//! Terminal User Interface module.
//!
//! The interactive kiosk, built on ratatui with the crossterm backend.
//!
//! # Overview
//!
//! - [`events`]: Key press to flow action translation
//! - [`ui`]: Ratatui rendering
//! - [`run`]: Terminal setup and the main loop
//! - [`theme`]: Color palettes
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Events are translated to flow Actions
//! 3. Actions modify the FlowController state
//! 4. The UI renders based on the current FlowController state

pub mod events;
pub mod run;
pub mod theme;
pub mod ui;

pub use events::{map_key, EventError, EventHandler, KeyContext};
pub use run::{run_kiosk, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::render;
