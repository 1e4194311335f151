//! Watch decision logic
//!
//! Pure functions deciding what a filesystem event means for the watcher:
//! whether it completes a download, whether a notification may be
//! published yet, and which file a completed download replaces.

use std::time::{Duration, Instant};

use crate::logic::path::names_equal;
use crate::logic::strategy::WatchStrategy;

/// Minimum spacing between two publications on the same channel
pub const EMIT_COOLDOWN: Duration = Duration::from_millis(500);

/// Delay before publishing, giving the writer time to flush
pub const FLUSH_WAIT: Duration = Duration::from_millis(200);

/// A download must finish within this long after its file appeared
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(2);

/// Filesystem event kinds the watcher distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    Created,
    Modified,
    Removed,
    Renamed,
    Metadata,
    Other,
}

/// What to do with an event in the downloads directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadAction {
    /// New file: remember it and wait for its content
    TrackPending,
    /// Content written within the timeout: notify and replace
    Completed,
    /// Content written too late: forget the pending download
    Expired,
    /// Some other change worth refreshing listings for
    Notify,
    Ignore,
}

/// Classify a downloads-directory event
///
/// # Arguments
/// * `kind` - Event kind
/// * `pending_since` - When this file was first seen, if it is a pending download
/// * `now` - Current time
pub fn classify_download_event(
    kind: FsEventKind,
    pending_since: Option<Instant>,
    now: Instant,
) -> DownloadAction {
    match kind {
        FsEventKind::Created => DownloadAction::TrackPending,
        FsEventKind::Modified => match pending_since {
            None => DownloadAction::Ignore,
            Some(started) if now.duration_since(started) > DOWNLOAD_TIMEOUT => {
                DownloadAction::Expired
            }
            Some(_) => DownloadAction::Completed,
        },
        FsEventKind::Removed | FsEventKind::Renamed | FsEventKind::Metadata => {
            DownloadAction::Notify
        }
        FsEventKind::Other => DownloadAction::Ignore,
    }
}

/// Check whether a channel may publish again
pub fn cooldown_elapsed(last_emit: Option<Instant>, now: Instant) -> bool {
    match last_emit {
        Some(last) => now.duration_since(last) >= EMIT_COOLDOWN,
        None => true,
    }
}

/// The part of the configuration the watcher needs to replace files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacePolicy {
    pub watch_strategy: Option<WatchStrategy>,
    /// Exact download name required under `WatchStrategy::NamedFile`
    pub named_file: String,
    /// File in the filters directory that gets overwritten
    pub target_file: String,
}

/// Decide which filter file a completed download should overwrite
///
/// Returns `None` when no target is selected, the strategy is unknown, or
/// the download does not match the required name.
pub fn replacement_target<'a>(policy: &'a ReplacePolicy, downloaded_name: &str) -> Option<&'a str> {
    let strategy = policy.watch_strategy?;

    if policy.target_file.is_empty() {
        return None;
    }

    if strategy == WatchStrategy::NamedFile && !names_equal(downloaded_name, &policy.named_file) {
        return None;
    }

    Some(policy.target_file.as_str())
}
