//! Application Model
//!
//! Plain state types, free of I/O:
//!
//! - **SelectorState**: one "file + strategy" panel (selection modes, choice)
//! - **FilenameInput**: the typed-name field and its validation state
//! - **DirectoryModel**: a managed directory's path and listing generation
//! - **UiModel**: focus, dialogs, toasts

pub mod directory;
pub mod selector;
pub mod text_input;
pub mod ui;

pub use directory::DirectoryModel;
pub use selector::{Choice, Chosen, InputKind, SelectionMode, SelectorInit, SelectorState};
pub use text_input::FilenameInput;
pub use ui::{DirectoryPrompt, UiModel};
