//! Persisted configuration
//!
//! A flat YAML record of the user's directory and strategy choices. Field
//! names are stable across versions: unknown fields are ignored on load and
//! missing fields fall back to an empty string / `false`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logic::strategy::{OverwriteStrategy, WatchStrategy};
use crate::logic::watch::ReplacePolicy;
use crate::DirectoryKind;

const CONFIG_DIR_NAME: &str = "filtersnatch";
const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub filters: FiltersConfig,
    pub downloads: DownloadsConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    #[serde(deserialize_with = "null_as_empty")]
    pub directory: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub overwrite_strategy: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub selected_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadsConfig {
    #[serde(deserialize_with = "null_as_empty")]
    pub directory: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub watch_strategy: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub named_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start_in_tray: bool,
}

// Older config files wrote unset names as `~`
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One persisted config field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    FiltersDirectory,
    FiltersOverwriteStrategy,
    FiltersSelectedFile,
    DownloadsDirectory,
    DownloadsWatchStrategy,
    DownloadsNamedFile,
    WindowStartInTray,
}

impl ConfigField {
    /// Dotted key as it appears in the YAML file
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::FiltersDirectory => "filters.directory",
            ConfigField::FiltersOverwriteStrategy => "filters.overwrite_strategy",
            ConfigField::FiltersSelectedFile => "filters.selected_file",
            ConfigField::DownloadsDirectory => "downloads.directory",
            ConfigField::DownloadsWatchStrategy => "downloads.watch_strategy",
            ConfigField::DownloadsNamedFile => "downloads.named_file",
            ConfigField::WindowStartInTray => "window.start_in_tray",
        }
    }

    pub fn directory(kind: DirectoryKind) -> ConfigField {
        match kind {
            DirectoryKind::Filters => ConfigField::FiltersDirectory,
            DirectoryKind::Downloads => ConfigField::DownloadsDirectory,
        }
    }
}

/// Value written to a config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl ControllerConfig {
    /// Config written on first run: platform directories and default strategies
    pub fn first_run_defaults() -> Self {
        let filters_dir = dirs::document_dir()
            .map(|d| d.join("My Games").join("Path of Exile"))
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        let downloads_dir = dirs::download_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();

        Self {
            filters: FiltersConfig {
                directory: filters_dir,
                overwrite_strategy: OverwriteStrategy::SelectedFile.as_str().to_string(),
                selected_file: String::new(),
            },
            downloads: DownloadsConfig {
                directory: downloads_dir,
                watch_strategy: WatchStrategy::NewestFilterFile.as_str().to_string(),
                named_file: String::new(),
            },
            window: WindowConfig::default(),
        }
    }

    pub fn get(&self, field: ConfigField) -> FieldValue {
        match field {
            ConfigField::FiltersDirectory => self.filters.directory.as_str().into(),
            ConfigField::FiltersOverwriteStrategy => self.filters.overwrite_strategy.as_str().into(),
            ConfigField::FiltersSelectedFile => self.filters.selected_file.as_str().into(),
            ConfigField::DownloadsDirectory => self.downloads.directory.as_str().into(),
            ConfigField::DownloadsWatchStrategy => self.downloads.watch_strategy.as_str().into(),
            ConfigField::DownloadsNamedFile => self.downloads.named_file.as_str().into(),
            ConfigField::WindowStartInTray => self.window.start_in_tray.into(),
        }
    }

    /// Set one field; a value of the wrong shape is an error
    pub fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<()> {
        match (field, value) {
            (ConfigField::WindowStartInTray, FieldValue::Flag(flag)) => {
                self.window.start_in_tray = flag;
            }
            (_, FieldValue::Flag(flag)) => {
                bail!("'{}' expects text, got boolean {}", field.key(), flag)
            }
            (field, FieldValue::Text(text)) => {
                let slot = match field {
                    ConfigField::FiltersDirectory => &mut self.filters.directory,
                    ConfigField::FiltersOverwriteStrategy => &mut self.filters.overwrite_strategy,
                    ConfigField::FiltersSelectedFile => &mut self.filters.selected_file,
                    ConfigField::DownloadsDirectory => &mut self.downloads.directory,
                    ConfigField::DownloadsWatchStrategy => &mut self.downloads.watch_strategy,
                    ConfigField::DownloadsNamedFile => &mut self.downloads.named_file,
                    ConfigField::WindowStartInTray => {
                        bail!("'{}' expects a boolean, got text '{}'", field.key(), text)
                    }
                };
                *slot = text;
            }
        }
        Ok(())
    }

    pub fn directory(&self, kind: DirectoryKind) -> &str {
        match kind {
            DirectoryKind::Filters => &self.filters.directory,
            DirectoryKind::Downloads => &self.downloads.directory,
        }
    }

    pub fn replace_policy(&self) -> ReplacePolicy {
        ReplacePolicy {
            watch_strategy: WatchStrategy::parse(&self.downloads.watch_strategy),
            named_file: self.downloads.named_file.clone(),
            target_file: self.filters.selected_file.clone(),
        }
    }
}

/// Key-value persisted store for `ControllerConfig`
pub trait ConfigStore: Send {
    fn load(&self) -> Result<ControllerConfig>;

    fn save_field(&mut self, field: ConfigField, value: FieldValue) -> Result<()>;

    /// Human-readable location (shown in the status bar)
    fn location(&self) -> String;
}

/// YAML file store
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Open the store at `path`, creating it with first-run defaults if missing
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };

        if !store.path.exists() {
            tracing::warn!("Config not found, creating at path: {}", store.path.display());
            store.write(&ControllerConfig::first_run_defaults())?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, config: &ControllerConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory {}", parent.display()))?;
            }
        }

        let yaml = serde_yaml::to_string(config)?;

        // Write to a sibling file first so a crash never leaves half a config behind
        let tmp_path = self.path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ControllerConfig> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;

        if contents.trim().is_empty() {
            return Ok(ControllerConfig::default());
        }

        let config = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(config)
    }

    fn save_field(&mut self, field: ConfigField, value: FieldValue) -> Result<()> {
        let mut config = self.load()?;
        config.set(field, value)?;
        self.write(&config)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store, used when no config file can be created and in tests
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: ControllerConfig,
    fail_writes: bool,
    writes: usize,
}

impl MemoryConfigStore {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            fail_writes: false,
            writes: 0,
        }
    }

    /// Make every subsequent write fail (for exercising error paths)
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<ControllerConfig> {
        Ok(self.config.clone())
    }

    fn save_field(&mut self, field: ConfigField, value: FieldValue) -> Result<()> {
        if self.fail_writes {
            bail!("config store is read-only");
        }
        self.config.set(field, value)?;
        self.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

/// Determine the config file path
///
/// An explicit `--config` path is used as given (and created if missing).
/// Otherwise `<config dir>/filtersnatch/config.yaml`, falling back to
/// `./config.yaml` on platforms without a config directory.
pub fn resolve_config_path(cli_path: Option<String>) -> PathBuf {
    if let Some(path) = cli_path {
        return PathBuf::from(path);
    }

    match dirs::config_dir() {
        Some(config_dir) => config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}
