//! Manual worker-ID entry.

use super::{InputError, InputMode, ScanInputProvider};
use crate::flow::field::{TextEdit, TextField};

/// Worker-ID typed into a text field.
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    field: TextField,
    scanned: bool,
}

impl ManualEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanInputProvider for ManualEntry {
    fn mode(&self) -> InputMode {
        InputMode::Manual
    }

    fn focus(&mut self) {
        self.scanned = false;
        self.field.clear();
    }

    fn edit(&mut self, edit: TextEdit) {
        if !self.scanned {
            self.field.apply(edit);
        }
    }

    fn submit(&mut self) -> Result<Option<String>, InputError> {
        if self.scanned {
            return Ok(None);
        }
        let code = self.field.value();
        if code.trim().is_empty() {
            return Err(InputError::Empty);
        }
        self.scanned = true;
        Ok(Some(code.to_string()))
    }

    fn poll(&mut self) -> Option<String> {
        None
    }

    fn scanned(&self) -> bool {
        self.scanned
    }

    fn text(&self) -> Option<&str> {
        Some(self.field.value())
    }
}
