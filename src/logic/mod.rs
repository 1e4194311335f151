//! Business Logic
//!
//! This module contains pure business logic functions that can be unit tested:
//! - entries: Filter file entries and newest-first ordering
//! - formatting: Relative-time labels
//! - path: Environment expansion and directory comparison
//! - strategy: Persisted strategy names
//! - validation: Filename safety rules
//! - watch: Download detection, publish cooldown and replacement decisions

pub mod entries;
pub mod formatting;
pub mod path;
pub mod strategy;
pub mod validation;
pub mod watch;
