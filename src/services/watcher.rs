use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;

use crate::logic::entries::has_managed_suffix;
use crate::logic::path::names_equal;
use crate::logic::watch::{
    classify_download_event, cooldown_elapsed, replacement_target, DownloadAction, FsEventKind,
    ReplacePolicy, DOWNLOAD_TIMEOUT, FLUSH_WAIT,
};
use crate::services::notifications::{Channel, Notification, NotificationHub};
use crate::DirectoryKind;

/// Commands accepted by the watcher task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherCommand {
    /// Watch a new (env-expanded) path for this directory; empty stops watching it
    SetDirectory { kind: DirectoryKind, path: String },
    /// Replace the policy used for completed downloads
    SetPolicy(ReplacePolicy),
    TogglePause,
    Shutdown,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WatcherOptions {
    /// Log replacements instead of copying files
    pub dry_run: bool,
}

/// Map a notify event kind onto the kinds the watcher distinguishes
pub fn map_event_kind(kind: &EventKind) -> FsEventKind {
    match kind {
        EventKind::Create(_) => FsEventKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => FsEventKind::Renamed,
        EventKind::Modify(ModifyKind::Metadata(_)) => FsEventKind::Metadata,
        EventKind::Modify(_) => FsEventKind::Modified,
        EventKind::Remove(_) => FsEventKind::Removed,
        _ => FsEventKind::Other,
    }
}

fn trim_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        path
    } else {
        trimmed
    }
}

/// Check whether `file` sits directly inside the directory `dir`
fn is_inside(file: &Path, dir: &str) -> bool {
    if dir.is_empty() {
        return false;
    }
    file.parent()
        .map(|parent| {
            names_equal(
                trim_separators(&parent.to_string_lossy()),
                trim_separators(dir),
            )
        })
        .unwrap_or(false)
}

/// Watcher state, independent of the OS watch handle
pub struct WatcherState {
    hub: NotificationHub,
    options: WatcherOptions,
    filters_dir: String,
    downloads_dir: String,
    policy: ReplacePolicy,
    paused: bool,
    /// Downloads that were created but have not received content yet
    pending: HashMap<PathBuf, Instant>,
    last_emit: HashMap<Channel, Instant>,
}

impl WatcherState {
    pub fn new(hub: NotificationHub, options: WatcherOptions) -> Self {
        Self {
            hub,
            options,
            filters_dir: String::new(),
            downloads_dir: String::new(),
            policy: ReplacePolicy {
                watch_strategy: None,
                named_file: String::new(),
                target_file: String::new(),
            },
            paused: false,
            pending: HashMap::new(),
            last_emit: HashMap::new(),
        }
    }

    pub fn directory(&self, kind: DirectoryKind) -> &str {
        match kind {
            DirectoryKind::Filters => &self.filters_dir,
            DirectoryKind::Downloads => &self.downloads_dir,
        }
    }

    pub fn set_directory(&mut self, kind: DirectoryKind, path: String) {
        match kind {
            DirectoryKind::Filters => self.filters_dir = path,
            DirectoryKind::Downloads => {
                self.downloads_dir = path;
                self.pending.clear();
            }
        }
    }

    pub fn set_policy(&mut self, policy: ReplacePolicy) {
        self.policy = policy;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::info!("Watcher {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_downloads(&self) -> usize {
        self.pending.len()
    }

    /// React to one filesystem event
    pub async fn handle_event(&mut self, event: Event) {
        let kind = map_event_kind(&event.kind);

        for path in event.paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if !has_managed_suffix(&name) {
                continue;
            }
            if self.paused || self.filters_dir.is_empty() || self.downloads_dir.is_empty() {
                tracing::trace!("Ignoring {:?} on {} (watcher idle)", kind, name);
                continue;
            }

            if is_inside(&path, &self.filters_dir) {
                tracing::debug!("Filters directory event {:?}: {}", kind, name);
                self.publish(Channel::WatchEventTriggered, &name).await;
            } else if is_inside(&path, &self.downloads_dir) {
                self.handle_download_event(kind, path, name).await;
            }
        }
    }

    async fn handle_download_event(&mut self, kind: FsEventKind, path: PathBuf, name: String) {
        let now = Instant::now();
        let action = classify_download_event(kind, self.pending.get(&path).copied(), now);
        tracing::debug!("Downloads directory event {:?}: {} -> {:?}", kind, name, action);

        match action {
            DownloadAction::TrackPending => {
                // Downloads that never completed
                self.pending
                    .retain(|_, started| now.duration_since(*started) <= DOWNLOAD_TIMEOUT);
                self.pending.insert(path, now);
            }
            DownloadAction::Completed => {
                self.pending.remove(&path);
                self.publish(Channel::WatchEventTriggered, &name).await;
                self.replace(&path, &name).await;
            }
            DownloadAction::Expired => {
                self.pending.remove(&path);
            }
            DownloadAction::Notify => {
                self.publish(Channel::WatchEventTriggered, &name).await;
            }
            DownloadAction::Ignore => {}
        }
    }

    /// Copy a completed download over the selected filter file
    async fn replace(&mut self, source: &Path, downloaded_name: &str) {
        let Some(target_name) = replacement_target(&self.policy, downloaded_name) else {
            tracing::debug!("No replacement for {} under current policy", downloaded_name);
            return;
        };
        let target = Path::new(&self.filters_dir).join(target_name);

        if self.options.dry_run {
            tracing::info!(
                "[dry run] Would replace {} with {}",
                target.display(),
                source.display()
            );
        } else if let Err(e) = tokio::fs::copy(source, &target).await {
            tracing::error!(
                "Failed to replace {} with {}: {}",
                target.display(),
                source.display(),
                e
            );
            return;
        } else {
            tracing::info!("Replaced {} with {}", target.display(), source.display());
        }

        let target_name = target_name.to_string();
        self.publish(Channel::FilterFileReplaced, &target_name).await;
    }

    /// Publish on `channel` unless it published within the cooldown
    ///
    /// Returns whether the notification went out.
    async fn publish(&mut self, channel: Channel, file_name: &str) -> bool {
        let now = Instant::now();
        if !cooldown_elapsed(self.last_emit.get(&channel).copied(), now) {
            tracing::trace!("Throttled {} for {}", channel.as_str(), file_name);
            return false;
        }
        self.last_emit.insert(channel, now);

        tokio::time::sleep(FLUSH_WAIT).await;
        self.hub.publish(Notification::about(channel, file_name));
        true
    }
}

fn rewatch(watcher: &mut RecommendedWatcher, old: &str, new: &str) {
    if !old.is_empty() {
        if let Err(e) = watcher.unwatch(Path::new(old)) {
            tracing::debug!("Failed to unwatch {}: {}", old, e);
        }
    }
    if new.is_empty() {
        return;
    }
    match watcher.watch(Path::new(new), RecursiveMode::NonRecursive) {
        Ok(()) => tracing::info!("Watching {}", new),
        Err(e) => tracing::warn!("Failed to watch {}: {}", new, e),
    }
}

/// Spawn the watcher task
///
/// The task owns the OS watch handle and all watcher state; it is driven by
/// `WatcherCommand`s and filesystem events, and publishes on `hub`.
pub fn spawn_watcher(
    hub: NotificationHub,
    options: WatcherOptions,
) -> Result<mpsc::UnboundedSender<WatcherCommand>> {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<WatcherCommand>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = notify::recommended_watcher(move |event| {
        if event_tx.send(event).is_err() {
            tracing::trace!("Watch event dropped because the watcher task is gone");
        }
    })
    .context("creating filesystem watcher")?;

    tokio::spawn(async move {
        let mut state = WatcherState::new(hub, options);

        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(WatcherCommand::SetDirectory { kind, path }) => {
                            rewatch(&mut watcher, state.directory(kind), &path);
                            state.set_directory(kind, path);
                        }
                        Some(WatcherCommand::SetPolicy(policy)) => state.set_policy(policy),
                        Some(WatcherCommand::TogglePause) => {
                            state.toggle_pause();
                        }
                        Some(WatcherCommand::Shutdown) | None => break,
                    }
                }

                Some(event) = event_rx.recv() => {
                    match event {
                        Ok(event) => state.handle_event(event).await,
                        Err(e) => tracing::warn!("Watch backend error: {}", e),
                    }
                }
            }
        }
        tracing::debug!("Watcher stopped");
    });

    Ok(command_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::strategy::WatchStrategy;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};
    use std::fs;

    struct Fixture {
        _root: tempfile::TempDir,
        filters: PathBuf,
        downloads: PathBuf,
        hub: NotificationHub,
        state: WatcherState,
    }

    fn fixture(options: WatcherOptions) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let filters = root.path().join("filters");
        let downloads = root.path().join("downloads");
        fs::create_dir(&filters).unwrap();
        fs::create_dir(&downloads).unwrap();

        let hub = NotificationHub::new();
        let mut state = WatcherState::new(hub.clone(), options);
        state.set_directory(DirectoryKind::Filters, filters.display().to_string());
        state.set_directory(DirectoryKind::Downloads, downloads.display().to_string());
        state.set_policy(ReplacePolicy {
            watch_strategy: Some(WatchStrategy::NewestFilterFile),
            named_file: String::new(),
            target_file: "main.filter".to_string(),
        });

        Fixture {
            _root: root,
            filters,
            downloads,
            hub,
            state,
        }
    }

    fn event(kind: EventKind, path: &Path) -> Event {
        Event::new(kind).add_path(path.to_path_buf())
    }

    fn created() -> EventKind {
        EventKind::Create(CreateKind::File)
    }

    fn modified() -> EventKind {
        EventKind::Modify(ModifyKind::Data(DataChange::Content))
    }

    #[test]
    fn test_map_event_kind() {
        assert_eq!(map_event_kind(&created()), FsEventKind::Created);
        assert_eq!(map_event_kind(&modified()), FsEventKind::Modified);
        assert_eq!(
            map_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::Any))),
            FsEventKind::Renamed
        );
        assert_eq!(
            map_event_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))),
            FsEventKind::Metadata
        );
        assert_eq!(
            map_event_kind(&EventKind::Remove(RemoveKind::File)),
            FsEventKind::Removed
        );
        assert_eq!(map_event_kind(&EventKind::Any), FsEventKind::Other);
    }

    #[test]
    fn test_is_inside_ignores_case_and_trailing_separator() {
        assert!(is_inside(Path::new("/home/Exile/Downloads/a.filter"), "/home/exile/downloads/"));
        assert!(!is_inside(Path::new("/home/exile/downloads/sub/a.filter"), "/home/exile/downloads"));
        assert!(!is_inside(Path::new("/a.filter"), ""));
    }

    #[tokio::test]
    async fn test_completed_download_replaces_selected_file() {
        let mut f = fixture(WatcherOptions::default());
        let mut replaced = f.hub.subscribe(Channel::FilterFileReplaced);
        let mut watch = f.hub.subscribe(Channel::WatchEventTriggered);

        let download = f.downloads.join("new.filter");
        fs::write(&download, "Show # new").unwrap();

        f.state.handle_event(event(created(), &download)).await;
        assert_eq!(f.state.pending_downloads(), 1);
        f.state.handle_event(event(modified(), &download)).await;
        assert_eq!(f.state.pending_downloads(), 0);

        assert_eq!(fs::read_to_string(f.filters.join("main.filter")).unwrap(), "Show # new");
        assert_eq!(watch.try_next().unwrap().file_name.as_deref(), Some("new.filter"));
        assert_eq!(replaced.try_next().unwrap().file_name.as_deref(), Some("main.filter"));
    }

    #[tokio::test]
    async fn test_abandoned_downloads_are_forgotten() {
        let mut f = fixture(WatcherOptions::default());

        let abandoned = f.downloads.join("abandoned.filter");
        f.state.handle_event(event(created(), &abandoned)).await;
        assert_eq!(f.state.pending_downloads(), 1);

        std::thread::sleep(DOWNLOAD_TIMEOUT + std::time::Duration::from_millis(100));

        let fresh = f.downloads.join("fresh.filter");
        f.state.handle_event(event(created(), &fresh)).await;
        assert_eq!(f.state.pending_downloads(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_publishes_without_copying() {
        let mut f = fixture(WatcherOptions { dry_run: true });
        let mut replaced = f.hub.subscribe(Channel::FilterFileReplaced);

        let download = f.downloads.join("new.filter");
        fs::write(&download, "x").unwrap();
        f.state.handle_event(event(created(), &download)).await;
        f.state.handle_event(event(modified(), &download)).await;

        assert!(!f.filters.join("main.filter").exists());
        assert!(replaced.try_next().is_some());
    }

    #[tokio::test]
    async fn test_named_strategy_skips_other_downloads() {
        let mut f = fixture(WatcherOptions::default());
        f.state.set_policy(ReplacePolicy {
            watch_strategy: Some(WatchStrategy::NamedFile),
            named_file: "strict.filter".to_string(),
            target_file: "main.filter".to_string(),
        });

        let download = f.downloads.join("soft.filter");
        fs::write(&download, "x").unwrap();
        f.state.handle_event(event(created(), &download)).await;
        f.state.handle_event(event(modified(), &download)).await;

        assert!(!f.filters.join("main.filter").exists());
    }

    #[tokio::test]
    async fn test_non_filter_files_and_pause_are_ignored() {
        let mut f = fixture(WatcherOptions::default());
        let mut watch = f.hub.subscribe(Channel::WatchEventTriggered);

        f.state
            .handle_event(event(EventKind::Remove(RemoveKind::File), &f.downloads.join("x.txt")))
            .await;
        assert!(watch.try_next().is_none());

        assert!(f.state.toggle_pause());
        f.state
            .handle_event(event(EventKind::Remove(RemoveKind::File), &f.filters.join("a.filter")))
            .await;
        assert!(watch.try_next().is_none());

        assert!(!f.state.toggle_pause());
        f.state
            .handle_event(event(EventKind::Remove(RemoveKind::File), &f.filters.join("a.filter")))
            .await;
        assert!(watch.try_next().is_some());
    }

    #[tokio::test]
    async fn test_unset_directory_silences_watcher() {
        let mut f = fixture(WatcherOptions::default());
        let mut watch = f.hub.subscribe(Channel::WatchEventTriggered);
        f.state.set_directory(DirectoryKind::Downloads, String::new());

        f.state
            .handle_event(event(EventKind::Remove(RemoveKind::File), &f.filters.join("a.filter")))
            .await;
        assert!(watch.try_next().is_none());
    }

    #[tokio::test]
    async fn test_publish_cooldown_per_channel() {
        let mut f = fixture(WatcherOptions::default());
        let mut watch = f.hub.subscribe(Channel::WatchEventTriggered);
        let removed = EventKind::Remove(RemoveKind::File);

        f.state.handle_event(event(removed, &f.filters.join("a.filter"))).await;
        f.state.handle_event(event(removed, &f.filters.join("b.filter"))).await;

        assert!(watch.try_next().is_some());
        assert!(watch.try_next().is_none());
    }

    #[tokio::test]
    async fn test_modify_of_unknown_download_is_ignored() {
        let mut f = fixture(WatcherOptions::default());
        let mut watch = f.hub.subscribe(Channel::WatchEventTriggered);

        f.state
            .handle_event(event(modified(), &f.downloads.join("old.filter")))
            .await;
        assert!(watch.try_next().is_none());
    }
}
