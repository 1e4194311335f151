use filtersnatch::logic::validation::ValidationState;
use filtersnatch::model::{InputKind, SelectorState};

use crate::App;

impl App {
    fn focused_selector(&self) -> &SelectorState {
        self.sync.selector(self.ui.focus)
    }

    /// Whether keystrokes currently go into the focused panel's text field
    pub(crate) fn is_typing(&self) -> bool {
        self.focused_selector().input().is_focused()
    }

    pub(crate) fn cycle_mode(&mut self, forward: bool) {
        let kind = self.ui.focus;
        self.sync.update_selector(kind, |s| s.cycle_mode(forward));
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        let kind = self.ui.focus;
        self.sync.update_selector(kind, |s| {
            s.move_cursor(delta);
            None
        });
    }

    /// Enter outside the text field: pick the highlighted file or start typing
    pub(crate) fn activate_selection(&mut self) {
        let kind = self.ui.focus;
        match self.focused_selector().input_kind() {
            InputKind::FromEntries => {
                self.sync.update_selector(kind, |s| s.pick_highlighted());
            }
            InputKind::TypedText => {
                self.sync.update_selector(kind, |s| {
                    s.focus_input();
                    None
                });
            }
            InputKind::SingleNewestEntry => {}
        }
    }

    pub(crate) fn type_char(&mut self, c: char) {
        let kind = self.ui.focus;
        self.sync.update_selector(kind, |s| {
            s.type_char(c);
            None
        });
    }

    pub(crate) fn delete_char(&mut self) {
        let kind = self.ui.focus;
        self.sync.update_selector(kind, |s| {
            s.backspace();
            None
        });
    }

    /// Enter inside the text field: confirm and leave it
    ///
    /// Invalid text keeps the field focused so it can be corrected.
    pub(crate) fn confirm_text(&mut self) {
        let kind = self.ui.focus;
        self.sync.update_selector(kind, |s| s.confirm_text());

        if self.focused_selector().validation_state() != ValidationState::Invalid {
            self.sync.update_selector(kind, |s| s.blur_input());
        }
    }

    pub(crate) fn leave_text(&mut self) {
        let kind = self.ui.focus;
        self.sync.update_selector(kind, |s| s.blur_input());
    }

    /// Tab: leave any text field, then move to the other panel
    pub(crate) fn switch_panel(&mut self) {
        if self.is_typing() {
            self.leave_text();
        }
        self.ui.toggle_focus();
    }
}
