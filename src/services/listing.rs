use chrono::{DateTime, Utc};
use glob::{MatchOptions, Pattern};
use std::path::Path;
use std::time::SystemTime;
use tokio::sync::mpsc;

use crate::logic::entries::{Entry, MANAGED_SUFFIX};
use crate::DirectoryKind;

/// Ask for a fresh listing of one managed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub kind: DirectoryKind,
    /// Env-expanded directory path
    pub path: String,
    /// Directory generation at request time (used to drop stale responses)
    pub generation: u64,
}

/// Result of a listing request, echoing the request's identity
#[derive(Debug, Clone)]
pub struct ListingResponse {
    pub kind: DirectoryKind,
    pub path: String,
    pub generation: u64,
    pub entries: Vec<Entry>,
}

/// List the filter files directly inside `dir`
///
/// Only regular files whose name ends in `.filter` (any case) are returned.
/// A file's creation time is the later of its modification and birth time,
/// so a file overwritten in place counts as new. A missing or unreadable
/// directory yields an empty list.
pub fn list_directory_entries(dir: &str) -> Vec<Entry> {
    if dir.is_empty() {
        return Vec::new();
    }

    let pattern = Path::new(&Pattern::escape(dir))
        .join(format!("*{}", MANAGED_SUFFIX))
        .display()
        .to_string();
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::default()
    };

    let paths = match glob::glob_with(&pattern, options) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!("Invalid listing pattern for {}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir, e);
                continue;
            }
        };

        let metadata = match path.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Failed to stat {}: {}", path.display(), e);
                continue;
            }
        };

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let modified = metadata.modified().ok();
        let born = metadata.created().ok();
        let created = match (modified, born) {
            (Some(m), Some(b)) => m.max(b),
            (Some(t), None) | (None, Some(t)) => t,
            (None, None) => SystemTime::UNIX_EPOCH,
        };

        entries.push(Entry::new(name, DateTime::<Utc>::from(created)));
    }

    if entries.is_empty() && !Path::new(dir).is_dir() {
        tracing::warn!("Directory {} does not exist or is not readable", dir);
    }

    entries
}

/// Spawn the listing service
///
/// Each request is served on the blocking pool; responses are sent as soon
/// as they are ready, so they may arrive out of request order.
pub fn spawn_listing_service() -> (
    mpsc::UnboundedSender<ListingRequest>,
    mpsc::UnboundedReceiver<ListingResponse>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ListingRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ListingResponse>();

    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            let response_tx = response_tx.clone();

            tokio::spawn(async move {
                let path = request.path.clone();
                let entries =
                    match tokio::task::spawn_blocking(move || list_directory_entries(&path)).await {
                        Ok(entries) => entries,
                        Err(e) => {
                            tracing::error!("Listing task for {} failed: {}", request.path, e);
                            Vec::new()
                        }
                    };

                tracing::debug!(
                    "Listed {} {} entries in {} (generation {})",
                    entries.len(),
                    request.kind.as_str(),
                    request.path,
                    request.generation
                );

                let _ = response_tx.send(ListingResponse {
                    kind: request.kind,
                    path: request.path,
                    generation: request.generation,
                    entries,
                });
            });
        }
        tracing::debug!("Listing service stopped");
    });

    (request_tx, response_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_lists_only_filter_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.filter"), "a").unwrap();
        fs::write(dir.path().join("B.FILTER"), "b").unwrap();
        fs::write(dir.path().join("notes.txt"), "n").unwrap();
        fs::create_dir(dir.path().join("dir.filter")).unwrap();

        let mut names: Vec<String> = list_directory_entries(dir.path().to_str().unwrap())
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["B.FILTER".to_string(), "a.filter".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(list_directory_entries(missing.to_str().unwrap()).is_empty());
        assert!(list_directory_entries("").is_empty());
    }

    #[test]
    fn test_directory_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("[poe] filters");
        fs::create_dir(&odd).unwrap();
        fs::write(odd.join("x.filter"), "x").unwrap();

        let entries = list_directory_entries(odd.to_str().unwrap());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "x.filter");
    }

    #[tokio::test]
    async fn test_service_echoes_request_identity() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.filter"), "1").unwrap();
        let path = dir.path().to_str().unwrap().to_string();

        let (tx, mut rx) = spawn_listing_service();
        tx.send(ListingRequest {
            kind: DirectoryKind::Downloads,
            path: path.clone(),
            generation: 7,
        })
        .unwrap();

        let response = rx.recv().await.unwrap();
        assert_eq!(response.kind, DirectoryKind::Downloads);
        assert_eq!(response.path, path);
        assert_eq!(response.generation, 7);
        assert_eq!(response.entries.len(), 1);
    }
}
