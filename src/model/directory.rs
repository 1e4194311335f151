//! Directory Model
//!
//! Path and listing bookkeeping for one managed directory. Every path change
//! and every listing request bumps the generation; a listing response is only
//! accepted when it carries the current generation and path.

use chrono::{DateTime, Utc};

use crate::logic::path::expand_env;
use crate::services::listing::{ListingRequest, ListingResponse};
use crate::DirectoryKind;

#[derive(Clone, Debug)]
pub struct DirectoryModel {
    kind: DirectoryKind,
    /// Path as configured (may contain environment variables)
    path: String,
    generation: u64,
    loading: bool,
    last_listed: Option<DateTime<Utc>>,
}

impl DirectoryModel {
    pub fn new(kind: DirectoryKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            generation: 0,
            loading: false,
            last_listed: None,
        }
    }

    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path with environment variables expanded
    pub fn expanded_path(&self) -> String {
        expand_env(&self.path)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_listed(&self) -> Option<DateTime<Utc>> {
        self.last_listed
    }

    /// Point at a new path; returns false if it is the same path
    pub fn set_path(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path == self.path {
            return false;
        }
        self.path = path;
        self.generation += 1;
        self.loading = false;
        true
    }

    /// Build the request for a fresh listing (None while no path is set)
    pub fn next_request(&mut self) -> Option<ListingRequest> {
        if self.path.is_empty() {
            return None;
        }
        self.generation += 1;
        self.loading = true;
        Some(ListingRequest {
            kind: self.kind,
            path: self.expanded_path(),
            generation: self.generation,
        })
    }

    /// Check whether a response answers the latest request for the current path
    pub fn accepts(&self, response: &ListingResponse) -> bool {
        response.kind == self.kind
            && response.generation == self.generation
            && response.path == self.expanded_path()
    }

    pub fn finish_loading(&mut self, now: DateTime<Utc>) {
        self.loading = false;
        self.last_listed = Some(now);
    }
}
