//! UI Model
//!
//! This sub-model contains all state related to the user interface:
//! focus, dialogs, popups, and visual state.

use std::path::PathBuf;
use std::time::Instant;

use crate::DirectoryKind;

/// How long a toast stays on screen
pub const TOAST_DURATION_MS: u128 = 2500;

/// Text prompt standing in for a native directory dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryPrompt {
    pub kind: DirectoryKind,
    pub buffer: String,
    /// Last rejection, shown under the input
    pub error: Option<String>,
}

impl DirectoryPrompt {
    pub fn new(kind: DirectoryKind, initial: PathBuf) -> Self {
        Self {
            kind,
            buffer: initial.display().to_string(),
            error: None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
        self.error = None;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.error = None;
    }

    /// The entered path (None for a blank prompt)
    pub fn value(&self) -> Option<PathBuf> {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

/// UI state and popups
#[derive(Clone, Debug)]
pub struct UiModel {
    // ============================================
    // FOCUS & VIEW
    // ============================================
    /// Panel receiving keystrokes
    pub focus: DirectoryKind,

    /// Compact ("minimized") view: status line only
    pub compact: bool,

    /// Mirrors the watcher's paused flag
    pub paused: bool,

    // ============================================
    // DIALOGS & POPUPS
    // ============================================
    /// Directory prompt (replaces the native folder picker)
    pub directory_prompt: Option<DirectoryPrompt>,

    /// Settings popup
    pub settings_open: bool,

    /// Key legend popup
    pub help_open: bool,

    /// Toast message (text, is_error, timestamp)
    pub toast_message: Option<(String, bool, Instant)>,

    /// Whether app should quit
    pub should_quit: bool,
}

impl UiModel {
    pub fn new(start_compact: bool) -> Self {
        Self {
            focus: DirectoryKind::Filters,
            compact: start_compact,
            paused: false,
            directory_prompt: None,
            settings_open: false,
            help_open: false,
            toast_message: None,
            should_quit: false,
        }
    }

    /// Check if any modal dialog is currently showing
    pub fn has_modal(&self) -> bool {
        self.directory_prompt.is_some() || self.settings_open || self.help_open
    }

    pub fn close_all_modals(&mut self) {
        self.directory_prompt = None;
        self.settings_open = false;
        self.help_open = false;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some((message.into(), false, Instant::now()));
    }

    pub fn show_error_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some((message.into(), true, Instant::now()));
    }

    pub fn should_dismiss_toast(&self) -> bool {
        self.toast_message
            .as_ref()
            .is_some_and(|(_, _, shown)| shown.elapsed().as_millis() >= TOAST_DURATION_MS)
    }

    pub fn dismiss_toast(&mut self) {
        self.toast_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_model_creation() {
        let model = UiModel::new(true);
        assert!(model.compact);
        assert_eq!(model.focus, DirectoryKind::Filters);
        assert!(!model.has_modal());
        assert!(!model.should_quit);
    }

    #[test]
    fn test_close_all_modals() {
        let mut model = UiModel::new(false);
        model.settings_open = true;
        model.directory_prompt = Some(DirectoryPrompt::new(
            DirectoryKind::Downloads,
            PathBuf::from("/dl"),
        ));
        assert!(model.has_modal());

        model.close_all_modals();
        assert!(!model.has_modal());
    }

    #[test]
    fn test_toggle_focus() {
        let mut model = UiModel::new(false);
        model.toggle_focus();
        assert_eq!(model.focus, DirectoryKind::Downloads);
        model.toggle_focus();
        assert_eq!(model.focus, DirectoryKind::Filters);
    }

    #[test]
    fn test_toast() {
        let mut model = UiModel::new(false);
        model.show_error_toast("Nope");
        assert!(matches!(model.toast_message, Some((_, true, _))));
        assert!(!model.should_dismiss_toast());

        model.dismiss_toast();
        assert!(model.toast_message.is_none());
    }

    #[test]
    fn test_directory_prompt_editing() {
        let mut prompt = DirectoryPrompt::new(DirectoryKind::Filters, PathBuf::from("/poe"));
        prompt.error = Some("bad".to_string());
        prompt.insert_char('2');
        assert_eq!(prompt.value(), Some(PathBuf::from("/poe2")));
        assert!(prompt.error.is_none());

        prompt.clear();
        prompt.insert_char(' ');
        assert_eq!(prompt.value(), None);
    }
}
