//! Config Synchronization Controller
//!
//! Owns the persisted configuration and keeps it consistent with both
//! selector panels, the directory listings, the watch notifications and the
//! watcher task. All methods run on the UI task; background work is reached
//! through channels only.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{ConfigField, ConfigStore, ControllerConfig, FieldValue};
use crate::logic::entries::EntryList;
use crate::logic::path::{dir_exists, expand_env, is_banned_directory};
use crate::logic::strategy::{OverwriteStrategy, WatchStrategy};
use crate::model::directory::DirectoryModel;
use crate::model::selector::{
    Choice, Chosen, InputKind, SelectionMode, SelectorInit, SelectorState,
};
use crate::services::listing::{ListingRequest, ListingResponse};
use crate::services::notifications::{Channel, Notification, NotificationHub, Subscription};
use crate::services::watcher::WatcherCommand;
use crate::DirectoryKind;

const CHANNELS: [Channel; 2] = [Channel::WatchEventTriggered, Channel::FilterFileReplaced];

/// Rejected directory choice
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error(
        "{} is already your {} directory; the filters and downloads directories must differ",
        .path.display(),
        .conflicts_with.as_str()
    )]
    BannedDirectory {
        path: PathBuf,
        conflicts_with: DirectoryKind,
    },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Selection modes of one panel, in display order
pub fn selection_modes(kind: DirectoryKind) -> Vec<SelectionMode> {
    match kind {
        DirectoryKind::Filters => vec![
            SelectionMode::new(
                OverwriteStrategy::SelectedFile.as_str(),
                "Select existing file",
                InputKind::FromEntries,
            ),
            SelectionMode::new(
                OverwriteStrategy::NamedFile.as_str(),
                "Specify exact file name",
                InputKind::TypedText,
            )
            .with_prompt("(Over)write only this filter file:"),
        ],
        DirectoryKind::Downloads => vec![
            SelectionMode::new(
                WatchStrategy::NewestFilterFile.as_str(),
                "Use newest *.filter file",
                InputKind::SingleNewestEntry,
            ),
            SelectionMode::new(
                WatchStrategy::NamedFile.as_str(),
                "Specify exact file name",
                InputKind::TypedText,
            )
            .with_prompt("Only take a filter with this exact name:"),
        ],
    }
}

/// Initial selector values derived from the persisted config
///
/// The stored file name seeds either the entry pick or the typed text,
/// depending on which strategy stored it.
pub fn selector_init(kind: DirectoryKind, config: &ControllerConfig) -> SelectorInit {
    match kind {
        DirectoryKind::Filters => {
            let strategy = OverwriteStrategy::parse(&config.filters.overwrite_strategy);
            let file = &config.filters.selected_file;
            SelectorInit {
                selected_mode: Some(config.filters.overwrite_strategy.clone()),
                selected_entry_name: (strategy == Some(OverwriteStrategy::SelectedFile))
                    .then(|| file.clone()),
                input_text: (strategy == Some(OverwriteStrategy::NamedFile))
                    .then(|| file.clone()),
            }
        }
        DirectoryKind::Downloads => {
            let strategy = WatchStrategy::parse(&config.downloads.watch_strategy);
            SelectorInit {
                selected_mode: Some(config.downloads.watch_strategy.clone()),
                selected_entry_name: None,
                input_text: (strategy == Some(WatchStrategy::NamedFile))
                    .then(|| config.downloads.named_file.clone()),
            }
        }
    }
}

pub struct ConfigSync {
    config: ControllerConfig,
    store: Box<dyn ConfigStore>,
    hub: NotificationHub,
    subscriptions: Vec<Subscription>,
    mounted: bool,

    filters_dir: DirectoryModel,
    downloads_dir: DirectoryModel,
    filters: SelectorState,
    downloads: SelectorState,

    listing_tx: mpsc::UnboundedSender<ListingRequest>,
    watcher_tx: Option<mpsc::UnboundedSender<WatcherCommand>>,
}

impl ConfigSync {
    /// Load the config and build both panels from it
    pub fn new(
        store: Box<dyn ConfigStore>,
        hub: NotificationHub,
        listing_tx: mpsc::UnboundedSender<ListingRequest>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let config = load_or_default(store.as_ref());
        tracing::info!("Loaded config from {}", store.location());

        let filters = SelectorState::new(
            selection_modes(DirectoryKind::Filters),
            selector_init(DirectoryKind::Filters, &config),
            now,
        )?;
        let downloads = SelectorState::new(
            selection_modes(DirectoryKind::Downloads),
            selector_init(DirectoryKind::Downloads, &config),
            now,
        )?;

        Ok(Self {
            filters_dir: DirectoryModel::new(DirectoryKind::Filters, config.filters.directory.clone()),
            downloads_dir: DirectoryModel::new(
                DirectoryKind::Downloads,
                config.downloads.directory.clone(),
            ),
            config,
            store,
            hub,
            subscriptions: Vec::new(),
            mounted: false,
            filters,
            downloads,
            listing_tx,
            watcher_tx: None,
        })
    }

    /// Forward directory and policy changes to a running watcher
    pub fn with_watcher(mut self, watcher_tx: mpsc::UnboundedSender<WatcherCommand>) -> Self {
        self.watcher_tx = Some(watcher_tx);
        self
    }

    // ============================================
    // ACCESSORS
    // ============================================

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store_location(&self) -> String {
        self.store.location()
    }

    pub fn selector(&self, kind: DirectoryKind) -> &SelectorState {
        match kind {
            DirectoryKind::Filters => &self.filters,
            DirectoryKind::Downloads => &self.downloads,
        }
    }

    fn selector_mut(&mut self, kind: DirectoryKind) -> &mut SelectorState {
        match kind {
            DirectoryKind::Filters => &mut self.filters,
            DirectoryKind::Downloads => &mut self.downloads,
        }
    }

    pub fn directory(&self, kind: DirectoryKind) -> &DirectoryModel {
        match kind {
            DirectoryKind::Filters => &self.filters_dir,
            DirectoryKind::Downloads => &self.downloads_dir,
        }
    }

    fn directory_mut(&mut self, kind: DirectoryKind) -> &mut DirectoryModel {
        match kind {
            DirectoryKind::Filters => &mut self.filters_dir,
            DirectoryKind::Downloads => &mut self.downloads_dir,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ============================================
    // CONFIG
    // ============================================

    /// Read the persisted config; any failure yields the empty config
    pub fn load_config(&self) -> ControllerConfig {
        load_or_default(self.store.as_ref())
    }

    /// Update one field in memory and write it through the store
    ///
    /// The in-memory value stays authoritative when the write fails.
    pub fn persist_choice(&mut self, field: ConfigField, value: FieldValue) {
        if let Err(e) = self.config.set(field, value.clone()) {
            tracing::error!("Rejected config update: {}", e);
            return;
        }
        tracing::debug!("Persisting {} = {:?}", field.key(), value);

        if let Err(e) = self.store.save_field(field, value) {
            tracing::error!("Failed to update config key '{}': {:#}", field.key(), e);
        }
    }

    pub fn set_start_in_tray(&mut self, start_in_tray: bool) {
        tracing::debug!("Updating start in tray option to: {}", start_in_tray);
        self.persist_choice(ConfigField::WindowStartInTray, start_in_tray.into());
    }

    // ============================================
    // LIFECYCLE
    // ============================================

    /// Start synchronizing: subscribe, validate preloaded input, point the
    /// watcher at both directories and request both listings
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.renew_subscriptions();

        for kind in [DirectoryKind::Filters, DirectoryKind::Downloads] {
            let path = self.directory(kind).expanded_path();
            self.send_watcher(WatcherCommand::SetDirectory { kind, path });

            if let Some(chosen) = self.selector_mut(kind).mount() {
                self.handle_chosen(kind, chosen);
            }
        }
        self.push_policy();

        self.refresh_listing(DirectoryKind::Filters);
        self.refresh_listing(DirectoryKind::Downloads);
    }

    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        for channel in CHANNELS {
            self.hub.unsubscribe(channel);
        }
        self.subscriptions.clear();
    }

    fn renew_subscriptions(&mut self) {
        for channel in CHANNELS {
            self.hub.unsubscribe(channel);
        }
        self.subscriptions = CHANNELS
            .iter()
            .map(|channel| self.hub.subscribe(*channel))
            .collect();
    }

    /// Drain pending watch notifications and refresh the affected listings
    pub fn poll_notifications(&mut self) -> Vec<Notification> {
        let mut received = Vec::new();
        for subscription in &mut self.subscriptions {
            while let Some(notification) = subscription.try_next() {
                received.push(notification);
            }
        }

        for notification in &received {
            tracing::debug!("Handling {} notification", notification.channel.as_str());
            match notification.channel {
                Channel::WatchEventTriggered => {
                    self.refresh_listing(DirectoryKind::Downloads);
                    self.refresh_listing(DirectoryKind::Filters);
                }
                Channel::FilterFileReplaced => {
                    self.refresh_listing(DirectoryKind::Filters);
                }
            }
        }

        received
    }

    // ============================================
    // DIRECTORIES
    // ============================================

    /// Directory the picker should start in
    pub fn begin_directory_pick(&self, kind: DirectoryKind) -> PathBuf {
        let configured = self.directory(kind).expanded_path();
        tracing::trace!(
            "Expanded {} into {} ({} directory)",
            self.directory(kind).path(),
            configured,
            kind.as_str()
        );

        if !configured.is_empty() && dir_exists(Path::new(&configured)) {
            PathBuf::from(configured)
        } else {
            dirs::home_dir().unwrap_or_default()
        }
    }

    /// Apply the outcome of a directory pick
    ///
    /// Returns the stored path, or `None` when the pick was cancelled.
    pub fn complete_directory_pick(
        &mut self,
        kind: DirectoryKind,
        chosen: Option<PathBuf>,
    ) -> Result<Option<PathBuf>, PickError> {
        let Some(path) = chosen else {
            tracing::debug!("No {} directory chosen", kind.as_str());
            return Ok(None);
        };

        let path_str = path.display().to_string();
        let expanded = expand_env(&path_str);

        let other = kind.other();
        if is_banned_directory(&expanded, &[self.directory(other).path()]) {
            tracing::error!("Chosen directory is already the {} directory: {}", other.as_str(), expanded);
            return Err(PickError::BannedDirectory {
                path,
                conflicts_with: other,
            });
        }

        if !dir_exists(Path::new(&expanded)) {
            return Err(PickError::NotADirectory(path));
        }

        tracing::debug!("Chosen new path {} for {} directory", path_str, kind.as_str());
        self.persist_choice(ConfigField::directory(kind), path_str.clone().into());
        if self.directory_mut(kind).set_path(path_str) {
            self.clear_listing(kind);
        }

        if self.mounted {
            self.renew_subscriptions();
        }
        self.send_watcher(WatcherCommand::SetDirectory {
            kind,
            path: expanded,
        });
        self.refresh_listing(kind);

        Ok(Some(path))
    }

    /// Request a fresh listing (no-op while the directory is unset)
    pub fn refresh_listing(&mut self, kind: DirectoryKind) {
        let Some(request) = self.directory_mut(kind).next_request() else {
            tracing::trace!("Not listing {} directory: no path set", kind.as_str());
            return;
        };

        tracing::debug!(
            "Refreshing {} dir contents (generation {})",
            kind.as_str(),
            request.generation
        );
        if self.listing_tx.send(request).is_err() {
            tracing::warn!("Listing service is gone, {} listing not refreshed", kind.as_str());
        }
    }

    /// Drop the entries of a directory that is no longer current
    ///
    /// A pinned pick survives like it does any other refresh.
    fn clear_listing(&mut self, kind: DirectoryKind) {
        tracing::trace!("Clearing {} listing after path change", kind.as_str());
        if let Some(chosen) = self.selector_mut(kind).refresh(EntryList::empty()) {
            self.handle_chosen(kind, chosen);
        }
    }

    /// Feed a listing into its panel unless a newer request superseded it
    ///
    /// Returns whether the response was applied.
    pub fn apply_listing(&mut self, response: ListingResponse) -> bool {
        let kind = response.kind;
        if !self.directory(kind).accepts(&response) {
            tracing::trace!(
                "Discarding stale {} listing for {} (generation {}, current {})",
                kind.as_str(),
                response.path,
                response.generation,
                self.directory(kind).generation()
            );
            return false;
        }

        self.directory_mut(kind).finish_loading(Utc::now());
        let entries = EntryList::new(response.entries);
        if let Some(chosen) = self.selector_mut(kind).refresh(entries) {
            self.handle_chosen(kind, chosen);
        }
        true
    }

    // ============================================
    // SELECTORS
    // ============================================

    /// Run a selector transition and route whatever it reports
    ///
    /// Returns whether the transition produced a new choice.
    pub fn update_selector<F>(&mut self, kind: DirectoryKind, transition: F) -> bool
    where
        F: FnOnce(&mut SelectorState) -> Option<Chosen>,
    {
        match transition(self.selector_mut(kind)) {
            Some(chosen) => {
                self.handle_chosen(kind, chosen);
                true
            }
            None => false,
        }
    }

    /// Advance the relative-time clock of both panels
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.filters.tick(now);
        self.downloads.tick(now);
    }

    /// Persist a reported choice according to the mode that reported it
    pub fn handle_chosen(&mut self, kind: DirectoryKind, chosen: Chosen) {
        match kind {
            DirectoryKind::Filters => match (OverwriteStrategy::parse(&chosen.mode), chosen.choice) {
                (Some(OverwriteStrategy::SelectedFile), Choice::Entry(name)) => {
                    tracing::debug!("Selected filter file to overwrite: {}", name);
                    self.persist_filters_strategy(OverwriteStrategy::SelectedFile, name);
                }
                (Some(OverwriteStrategy::NamedFile), Choice::Text(text)) => {
                    tracing::debug!("Selected exact file to overwrite: {}", text);
                    self.persist_filters_strategy(OverwriteStrategy::NamedFile, text);
                }
                (_, choice) => {
                    tracing::warn!("Unroutable filters choice {:?} from mode '{}'", choice, chosen.mode);
                    return;
                }
            },
            DirectoryKind::Downloads => match (WatchStrategy::parse(&chosen.mode), chosen.choice) {
                (Some(WatchStrategy::NewestFilterFile), Choice::Entry(name)) => {
                    if name.is_empty() {
                        return;
                    }
                    tracing::debug!("Selected to take newest filter file: {}", name);
                    self.persist_downloads_strategy(WatchStrategy::NewestFilterFile, String::new());
                }
                (Some(WatchStrategy::NamedFile), Choice::Text(text)) => {
                    tracing::debug!("Selected to take only exact file: {}", text);
                    self.persist_downloads_strategy(WatchStrategy::NamedFile, text);
                }
                (_, choice) => {
                    tracing::warn!("Unroutable downloads choice {:?} from mode '{}'", choice, chosen.mode);
                    return;
                }
            },
        }

        self.push_policy();
    }

    fn persist_filters_strategy(&mut self, strategy: OverwriteStrategy, file_name: String) {
        self.persist_choice(ConfigField::FiltersOverwriteStrategy, strategy.as_str().into());
        self.persist_choice(ConfigField::FiltersSelectedFile, file_name.into());
    }

    fn persist_downloads_strategy(&mut self, strategy: WatchStrategy, file_name: String) {
        self.persist_choice(ConfigField::DownloadsWatchStrategy, strategy.as_str().into());
        self.persist_choice(ConfigField::DownloadsNamedFile, file_name.into());
    }

    // ============================================
    // WATCHER
    // ============================================

    pub fn toggle_pause(&self) {
        self.send_watcher(WatcherCommand::TogglePause);
    }

    pub fn stop_watcher(&self) {
        self.send_watcher(WatcherCommand::Shutdown);
    }

    fn push_policy(&self) {
        self.send_watcher(WatcherCommand::SetPolicy(self.config.replace_policy()));
    }

    fn send_watcher(&self, command: WatcherCommand) {
        if let Some(tx) = &self.watcher_tx {
            if tx.send(command).is_err() {
                tracing::warn!("Watcher is not running, command dropped");
            }
        }
    }
}

fn load_or_default(store: &dyn ConfigStore) -> ControllerConfig {
    match store.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to read config from {}: {:#}", store.location(), e);
            ControllerConfig::default()
        }
    }
}
