//! App Orchestration Methods
//!
//! `impl App` methods grouped by what they drive:
//! - directories: the directory prompt and listing refreshes
//! - selectors: keystrokes routed into the focused panel
//! - settings: pause, compact view and the start-in-tray preference
//!
//! State lives in `ConfigSync` (library) and `UiModel`; these methods only
//! translate user intent into controller calls and toasts.

pub(crate) mod directories;
pub(crate) mod selectors;
pub(crate) mod settings;
