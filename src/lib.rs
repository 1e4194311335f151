//! filtersnatch Library
//!
//! Exposes modules for the TUI binary and for testing

pub mod config;
pub mod controller;
pub mod logic;
pub mod model;
pub mod services;

/// Which of the two managed directories an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryKind {
    Filters,   // Holds the filter file that gets overwritten
    Downloads, // Watched for newly downloaded filter files
}

impl DirectoryKind {
    pub fn as_str(&self) -> &str {
        match self {
            DirectoryKind::Filters => "filters",
            DirectoryKind::Downloads => "downloads",
        }
    }

    /// The other managed directory (a directory may not be chosen for both)
    pub fn other(&self) -> DirectoryKind {
        match self {
            DirectoryKind::Filters => DirectoryKind::Downloads,
            DirectoryKind::Downloads => DirectoryKind::Filters,
        }
    }
}

/// Version string shown in the status bar
///
/// Release builds carry "Version <build type>-<tag or commit>"; local builds
/// fall back to the crate version and build date.
pub fn version_string() -> String {
    let build_type = env!("FILTERSNATCH_BUILD_TYPE");
    let tag = env!("FILTERSNATCH_VERSION_TAG");
    let commit = env!("FILTERSNATCH_GIT_COMMIT");

    if !build_type.is_empty() && (!tag.is_empty() || !commit.is_empty()) {
        let identifier = if !tag.is_empty() { tag } else { commit };
        format!("Version {}-{}", build_type, identifier)
    } else {
        format!(
            "v{} ({})",
            env!("CARGO_PKG_VERSION"),
            env!("FILTERSNATCH_BUILD_DATE")
        )
    }
}
