//! Selection Mode Controller
//!
//! State machine behind one "file + strategy" panel. For a directory listing
//! and a fixed set of selection modes it maintains exactly one canonical
//! `Choice` and reports every change of it.
//!
//! Every transition returns `Option<Chosen>`: `Some` exactly when the
//! transition changed the active mode, the selected entry name or the typed
//! text, `None` otherwise. Ticks never report.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::logic::entries::{Entry, EntryList};
use crate::logic::formatting::format_relative_time;
use crate::logic::validation::ValidationState;
use crate::model::text_input::{FilenameInput, InputOutcome};

/// How a mode derives its choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    FromEntries,       // User picks one entry from the listing
    SingleNewestEntry, // Always the newest entry in the listing
    TypedText,         // User types an exact name
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMode {
    /// Stable name, persisted as the strategy
    pub name: String,
    /// Text shown on the mode's radio option
    pub label: String,
    pub input_kind: InputKind,
    /// Prompt above the text field (TypedText modes)
    pub text_prompt: Option<String>,
}

impl SelectionMode {
    pub fn new(name: impl Into<String>, label: impl Into<String>, input_kind: InputKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input_kind,
            text_prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.text_prompt = Some(prompt.into());
        self
    }
}

/// Canonical selection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Entry(String),
    Text(String),
}

impl Choice {
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Choice::Entry(name) => Some(name),
            Choice::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Choice::Text(text) => Some(text),
            Choice::Entry(_) => None,
        }
    }
}

/// A choice reported on behalf of the mode that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chosen {
    pub mode: String,
    pub choice: Choice,
}

/// Externally supplied initial values
#[derive(Debug, Clone, Default)]
pub struct SelectorInit {
    pub selected_mode: Option<String>,
    pub selected_entry_name: Option<String>,
    pub input_text: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("a selector needs at least one selection mode")]
    NoModes,
}

const NO_ENTRIES_MESSAGE: &str = "No filter files here.";
const NO_DOWNLOADS_MESSAGE: &str = "No filter files downloaded yet.";

#[derive(Clone, Debug)]
pub struct SelectorState {
    modes: Vec<SelectionMode>,
    active: usize,
    selected_entry_name: String,
    /// Initial entry name supplied from outside; survives refreshes until the
    /// user picks an entry or changes mode
    entry_pinned: bool,
    typed_text: String,
    input: FilenameInput,
    entries: EntryList,
    /// Highlighted row in the entry list
    cursor: usize,
    now: DateTime<Utc>,
}

/// (active mode, selected entry, typed text): the state emission compares
type Snapshot = (usize, String, String);

impl SelectorState {
    pub fn new(
        modes: Vec<SelectionMode>,
        init: SelectorInit,
        now: DateTime<Utc>,
    ) -> Result<Self, SelectorError> {
        if modes.is_empty() {
            return Err(SelectorError::NoModes);
        }

        let active = init
            .selected_mode
            .as_deref()
            .and_then(|name| modes.iter().position(|m| m.name == name))
            .unwrap_or(0);
        let selected_entry_name = init.selected_entry_name.unwrap_or_default();
        let typed_text = init.input_text.unwrap_or_default();

        Ok(Self {
            modes,
            active,
            entry_pinned: !selected_entry_name.is_empty(),
            selected_entry_name,
            input: FilenameInput::new(&typed_text),
            typed_text,
            entries: EntryList::empty(),
            cursor: 0,
            now,
        })
    }

    // ============================================
    // ACCESSORS
    // ============================================

    pub fn modes(&self) -> &[SelectionMode] {
        &self.modes
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_mode(&self) -> &SelectionMode {
        &self.modes[self.active]
    }

    pub fn input_kind(&self) -> InputKind {
        self.active_mode().input_kind
    }

    pub fn selected_entry_name(&self) -> &str {
        &self.selected_entry_name
    }

    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    pub fn is_entry_pinned(&self) -> bool {
        self.entry_pinned
    }

    /// Current canonical choice of the active mode
    pub fn choice(&self) -> Choice {
        match self.input_kind() {
            InputKind::FromEntries | InputKind::SingleNewestEntry => {
                Choice::Entry(self.selected_entry_name.clone())
            }
            InputKind::TypedText => Choice::Text(self.typed_text.clone()),
        }
    }

    pub fn entries(&self) -> &EntryList {
        &self.entries
    }

    pub fn newest_entry(&self) -> Option<&Entry> {
        self.entries.newest()
    }

    pub fn input(&self) -> &FilenameInput {
        &self.input
    }

    pub fn validation_state(&self) -> ValidationState {
        self.input.state()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Age label for an entry, relative to the last tick
    pub fn relative_time(&self, entry: &Entry) -> String {
        format_relative_time(entry.created_time, self.now)
    }

    /// Placeholder text when the listing is empty (None when there is nothing to show)
    pub fn no_entries_message(&self) -> Option<&'static str> {
        if !self.entries.is_empty() {
            return None;
        }
        match self.input_kind() {
            InputKind::FromEntries => Some(NO_ENTRIES_MESSAGE),
            InputKind::SingleNewestEntry => Some(NO_DOWNLOADS_MESSAGE),
            InputKind::TypedText => None,
        }
    }

    // ============================================
    // TRANSITIONS
    // ============================================

    /// Initial mount: validate a preloaded typed value
    ///
    /// Reports only if validation normalized the preloaded value into
    /// something different (an already valid value stays silent).
    pub fn mount(&mut self) -> Option<Chosen> {
        let before = self.snapshot();
        if let Some(outcome) = self.input.validate(true) {
            self.apply_input(outcome);
        }
        self.derive_newest();
        self.emit_if_changed(before)
    }

    /// Switch to the mode with the given name (unknown names are ignored)
    pub fn select_mode(&mut self, name: &str) -> Option<Chosen> {
        let idx = self.modes.iter().position(|m| m.name == name)?;
        self.select_mode_index(idx)
    }

    pub fn select_mode_index(&mut self, idx: usize) -> Option<Chosen> {
        if idx >= self.modes.len() || idx == self.active {
            return None;
        }

        let before = self.snapshot();
        self.active = idx;
        self.entry_pinned = false;
        self.derive_newest();
        self.sync_cursor();
        self.emit_if_changed(before)
    }

    /// Move to the next (or previous) mode, wrapping around
    pub fn cycle_mode(&mut self, forward: bool) -> Option<Chosen> {
        let len = self.modes.len();
        let next = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
        self.select_mode_index(next)
    }

    /// Pick an entry by name (FromEntries modes only, names from the current listing only)
    pub fn pick_entry(&mut self, name: &str) -> Option<Chosen> {
        if self.input_kind() != InputKind::FromEntries {
            return None;
        }
        let idx = self.entries.position(name)?;

        let before = self.snapshot();
        self.selected_entry_name = name.to_string();
        self.entry_pinned = false;
        self.cursor = idx;
        self.emit_if_changed(before)
    }

    /// Pick the highlighted entry
    pub fn pick_highlighted(&mut self) -> Option<Chosen> {
        let name = self.entries.get(self.cursor)?.name.clone();
        self.pick_entry(&name)
    }

    /// Move the highlight within the entry list
    pub fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.entries.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }

    /// Start editing the typed name (TypedText modes only)
    pub fn focus_input(&mut self) -> bool {
        if self.input_kind() != InputKind::TypedText {
            return false;
        }
        self.input.focus();
        true
    }

    pub fn type_char(&mut self, c: char) {
        if self.input_kind() == InputKind::TypedText {
            self.input.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.input_kind() == InputKind::TypedText {
            self.input.backspace();
        }
    }

    /// Confirm the typed name (Enter)
    pub fn confirm_text(&mut self) -> Option<Chosen> {
        if self.input_kind() != InputKind::TypedText {
            return None;
        }

        let before = self.snapshot();
        if let Some(outcome) = self.input.confirm() {
            self.apply_input(outcome);
        }
        self.emit_if_changed(before)
    }

    /// Leave the text field (validates like a confirm)
    pub fn blur_input(&mut self) -> Option<Chosen> {
        let before = self.snapshot();
        if let Some(outcome) = self.input.blur() {
            self.apply_input(outcome);
        }
        self.emit_if_changed(before)
    }

    /// Replace the listing with a freshly fetched one
    ///
    /// A selected name that vanished from the listing is cleared unless it is
    /// still pinned. Typed text is never touched.
    pub fn refresh(&mut self, entries: EntryList) -> Option<Chosen> {
        let before = self.snapshot();
        self.entries = entries;

        if !self.selected_entry_name.is_empty()
            && !self.entry_pinned
            && !self.entries.contains(&self.selected_entry_name)
        {
            self.selected_entry_name.clear();
        }

        self.derive_newest();
        self.sync_cursor();
        self.emit_if_changed(before)
    }

    /// Periodic clock update for relative-time labels (never reports)
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    // ============================================
    // INTERNALS
    // ============================================

    fn snapshot(&self) -> Snapshot {
        (
            self.active,
            self.selected_entry_name.clone(),
            self.typed_text.clone(),
        )
    }

    fn emit_if_changed(&self, before: Snapshot) -> Option<Chosen> {
        if self.snapshot() == before {
            return None;
        }
        Some(Chosen {
            mode: self.active_mode().name.clone(),
            choice: self.choice(),
        })
    }

    fn apply_input(&mut self, outcome: InputOutcome) {
        match outcome {
            InputOutcome::Accepted(text) => self.typed_text = text,
            InputOutcome::Cleared => self.typed_text.clear(),
        }
    }

    fn derive_newest(&mut self) {
        if self.input_kind() == InputKind::SingleNewestEntry {
            self.selected_entry_name = self
                .entries
                .newest()
                .map(|e| e.name.clone())
                .unwrap_or_default();
        }
    }

    fn sync_cursor(&mut self) {
        self.cursor = self.entries.position(&self.selected_entry_name).unwrap_or(0);
    }
}
