//! Event Handlers
//!
//! - keyboard: user keyboard input
//!
//! Background results (listings, notifications, ticks) are drained in the
//! main loop and applied by `App::process_background`.

pub mod keyboard;
