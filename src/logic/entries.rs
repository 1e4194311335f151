//! Entry list logic
//!
//! Pure types and functions for the filter files found in a directory.

use chrono::{DateTime, Utc};

/// Suffix of the files this application manages
pub const MANAGED_SUFFIX: &str = ".filter";

/// One filter file in a watched directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub created_time: DateTime<Utc>,
}

impl Entry {
    pub fn new(name: impl Into<String>, created_time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created_time,
        }
    }

    /// Name without the managed suffix (for display next to a dimmed ".filter")
    pub fn stem(&self) -> &str {
        strip_managed_suffix(&self.name)
    }
}

/// Snapshot of one directory listing, newest entry first
///
/// A refresh always builds a new list; nothing about a previous list
/// (order, selection) carries over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    pub fn new(mut entries: Vec<Entry>) -> Self {
        sort_newest_first(&mut entries);
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Entry with the latest creation time (first one listed on ties)
    pub fn newest(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort entries by creation time, newest first
///
/// `sort_by` is stable, so entries with equal timestamps keep the order the
/// listing produced them in.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.created_time.cmp(&a.created_time));
}

/// Check whether a file name carries the managed suffix (case-insensitive)
pub fn has_managed_suffix(name: &str) -> bool {
    let suffix_len = MANAGED_SUFFIX.len();
    name.len() >= suffix_len
        && name.is_char_boundary(name.len() - suffix_len)
        && name[name.len() - suffix_len..].eq_ignore_ascii_case(MANAGED_SUFFIX)
}

/// Remove the managed suffix if present, otherwise return the name unchanged
pub fn strip_managed_suffix(name: &str) -> &str {
    if has_managed_suffix(name) {
        &name[..name.len() - MANAGED_SUFFIX.len()]
    } else {
        name
    }
}
