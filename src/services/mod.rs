//! Background Services
//!
//! This module contains services that run off the UI loop:
//! - listing: Directory listing worker
//! - notifications: Watch notification hub
//! - ticker: Relative-time refresh timer
//! - watcher: Filesystem watcher and filter replacer

pub mod listing;
pub mod notifications;
pub mod ticker;
pub mod watcher;

// Re-export commonly used types for convenience
pub use listing::{ListingRequest, ListingResponse};
pub use notifications::{Channel, Notification, NotificationHub};
pub use watcher::WatcherCommand;
