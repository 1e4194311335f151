//! Strategy names
//!
//! The persisted names of the selection strategies for both directories.
//! These strings are stored in the config file and double as selector mode
//! names, so they must stay stable across versions.

/// How the file to overwrite in the filters directory is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteStrategy {
    SelectedFile, // Pick an existing file from the listing
    NamedFile,    // Type an exact file name
}

impl OverwriteStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverwriteStrategy::SelectedFile => "selected_file",
            OverwriteStrategy::NamedFile => "named_file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "selected_file" => Some(OverwriteStrategy::SelectedFile),
            "named_file" => Some(OverwriteStrategy::NamedFile),
            _ => None,
        }
    }
}

/// Which downloaded file triggers a replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStrategy {
    NewestFilterFile, // Any newly downloaded filter file
    NamedFile,        // Only a download with this exact name
}

impl WatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStrategy::NewestFilterFile => "newest_filter_file",
            WatchStrategy::NamedFile => "named_file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "newest_filter_file" => Some(WatchStrategy::NewestFilterFile),
            "named_file" => Some(WatchStrategy::NamedFile),
            _ => None,
        }
    }
}
