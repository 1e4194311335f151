// UI module - handles all TUI rendering using Ratatui
//
// Architecture:
// - layout: Calculates screen layout (title, panels, legend, status)
// - render: Main orchestration function that coordinates all rendering
// - title_bar: Renders the top bar (app name, watching/paused)
// - selector: Renders one directory panel (modes, files, typed name)
// - legend: Renders hotkey legend
// - status_bar: Renders bottom status bar with the active policy
// - dialogs: Renders the directory prompt, settings and help popups
// - toast: Renders toast notifications (brief pop-up messages)

pub mod dialogs;
pub mod layout;
pub mod legend;
pub mod render;
pub mod selector;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

// Re-export main render function for convenience
pub use render::render;
