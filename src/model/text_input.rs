//! Typed filter-name input
//!
//! The raw text buffer behind the "exact file name" strategies, with its own
//! validation state machine: `Unset -> Pending -> {Valid, Invalid}`.
//! Keystrokes only touch the buffer; a value is handed to the selector only
//! when validation runs (confirm or initial mount).

use crate::logic::entries::{strip_managed_suffix, MANAGED_SUFFIX};
use crate::logic::validation::{classify, ValidationState};

/// Result of a validation pass that the owner must act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// A valid name, suffix appended
    Accepted(String),
    /// The field was emptied by the user
    Cleared,
}

#[derive(Clone, Debug)]
pub struct FilenameInput {
    buffer: String,
    state: ValidationState,
    focused: bool,
}

impl FilenameInput {
    /// Create an input preloaded with a persisted value (suffix stripped for editing)
    pub fn new(initial_value: &str) -> Self {
        Self {
            buffer: strip_managed_suffix(initial_value).to_string(),
            state: ValidationState::Unset,
            focused: false,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> ValidationState {
        self.state
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Leave the field; leaving counts as confirming the edit
    pub fn blur(&mut self) -> Option<InputOutcome> {
        if !self.focused {
            return None;
        }
        self.focused = false;
        self.validate(false)
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.focused {
            return;
        }
        self.buffer.push(c);
        self.state = ValidationState::Pending;
    }

    pub fn backspace(&mut self) {
        if !self.focused {
            return;
        }
        self.buffer.pop();
        self.state = ValidationState::Pending;
    }

    /// Explicit confirmation (Enter)
    pub fn confirm(&mut self) -> Option<InputOutcome> {
        self.validate(false)
    }

    /// Validate the current buffer
    ///
    /// An empty buffer only reports `Cleared` outside the initial pass, so a
    /// blank field at startup never clobbers an already persisted choice.
    /// Invalid input reports nothing and stays `Invalid` until corrected.
    pub fn validate(&mut self, initial: bool) -> Option<InputOutcome> {
        self.state = classify(&self.buffer);

        match self.state {
            ValidationState::Unset if !initial => Some(InputOutcome::Cleared),
            ValidationState::Valid => Some(InputOutcome::Accepted(format!(
                "{}{}",
                self.buffer.trim(),
                MANAGED_SUFFIX
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> FilenameInput {
        let mut input = FilenameInput::new("");
        input.focus();
        for c in text.chars() {
            input.insert_char(c);
        }
        input
    }

    #[test]
    fn test_new_strips_suffix_for_editing() {
        let input = FilenameInput::new("strict.filter");
        assert_eq!(input.buffer(), "strict");
        assert_eq!(input.state(), ValidationState::Unset);
    }

    #[test]
    fn test_keystrokes_move_to_pending_without_outcome() {
        let input = typed("abc");
        assert_eq!(input.buffer(), "abc");
        assert_eq!(input.state(), ValidationState::Pending);
    }

    #[test]
    fn test_keystrokes_ignored_when_not_focused() {
        let mut input = FilenameInput::new("");
        input.insert_char('x');
        assert_eq!(input.buffer(), "");
        assert_eq!(input.state(), ValidationState::Unset);
    }

    #[test]
    fn test_confirm_valid_appends_suffix() {
        let mut input = typed("  myfilter ");
        assert_eq!(
            input.confirm(),
            Some(InputOutcome::Accepted("myfilter.filter".to_string()))
        );
        assert_eq!(input.state(), ValidationState::Valid);
    }

    #[test]
    fn test_confirm_invalid_reports_nothing() {
        let mut input = typed("a/b");
        assert_eq!(input.confirm(), None);
        assert_eq!(input.state(), ValidationState::Invalid);
    }

    #[test]
    fn test_confirm_empty_reports_cleared() {
        let mut input = typed("x");
        input.backspace();
        assert_eq!(input.state(), ValidationState::Pending);
        assert_eq!(input.confirm(), Some(InputOutcome::Cleared));
        assert_eq!(input.state(), ValidationState::Unset);
    }

    #[test]
    fn test_initial_empty_pass_does_not_clear() {
        let mut input = FilenameInput::new("");
        assert_eq!(input.validate(true), None);
        assert_eq!(input.state(), ValidationState::Unset);
    }

    #[test]
    fn test_initial_pass_accepts_preloaded_value() {
        let mut input = FilenameInput::new("strict.filter");
        assert_eq!(
            input.validate(true),
            Some(InputOutcome::Accepted("strict.filter".to_string()))
        );
        assert_eq!(input.state(), ValidationState::Valid);
    }

    #[test]
    fn test_blur_confirms_only_when_focused() {
        let mut input = FilenameInput::new("");
        assert_eq!(input.blur(), None);

        let mut input = typed("soft");
        assert_eq!(
            input.blur(),
            Some(InputOutcome::Accepted("soft.filter".to_string()))
        );
        assert!(!input.is_focused());
    }
}
