use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex, time::Duration};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use filtersnatch::config::{
    resolve_config_path, ConfigStore, ControllerConfig, MemoryConfigStore, YamlConfigStore,
};
use filtersnatch::controller::ConfigSync;
use filtersnatch::model::UiModel;
use filtersnatch::services::listing::{spawn_listing_service, ListingResponse};
use filtersnatch::services::notifications::{Channel, NotificationHub};
use filtersnatch::services::ticker::RelativeTimeTicker;
use filtersnatch::services::watcher::{spawn_watcher, WatcherOptions};

/// Path of Exile filter watcher & replacer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to <temp dir>/filtersnatch-debug.log
    #[arg(short, long)]
    debug: bool,

    /// Path to config file (default: platform config dir)
    #[arg(short, long)]
    config: Option<String>,

    /// Log replacements instead of copying files
    #[arg(long)]
    dry_run: bool,
}

mod app;
mod handlers;
mod ui;

pub struct App {
    pub sync: ConfigSync,
    pub ui: UiModel,

    // Background channels
    listing_rx: mpsc::UnboundedReceiver<ListingResponse>,
    tick_rx: mpsc::UnboundedReceiver<chrono::DateTime<chrono::Utc>>,
    ticker: RelativeTimeTicker,
}

impl App {
    fn new(store: Box<dyn ConfigStore>, options: WatcherOptions) -> Result<Self> {
        let hub = NotificationHub::new();
        let (listing_tx, listing_rx) = spawn_listing_service();

        let mut sync = ConfigSync::new(store, hub.clone(), listing_tx, chrono::Utc::now())?;
        match spawn_watcher(hub, options) {
            Ok(watcher_tx) => sync = sync.with_watcher(watcher_tx),
            Err(e) => tracing::warn!("Filesystem watcher unavailable: {:#}", e),
        }

        let (ticker, tick_rx) = RelativeTimeTicker::start();
        let ui = UiModel::new(sync.config().window.start_in_tray);

        let mut app = App {
            sync,
            ui,
            listing_rx,
            tick_rx,
            ticker,
        };
        app.sync.mount();
        Ok(app)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        handlers::keyboard::handle_key(self, key)
    }

    /// Drain background results into the controller (non-blocking)
    fn process_background(&mut self) {
        while let Ok(response) = self.listing_rx.try_recv() {
            self.sync.apply_listing(response);
        }

        for notification in self.sync.poll_notifications() {
            if notification.channel == Channel::FilterFileReplaced {
                let name = notification.file_name.unwrap_or_default();
                self.ui.show_toast(format!("Replaced {}", name));
            }
        }

        // Only the latest tick matters
        let mut latest = None;
        while let Ok(now) = self.tick_rx.try_recv() {
            latest = Some(now);
        }
        if let Some(now) = latest {
            self.sync.tick(now);
        }
    }

    fn shutdown(&mut self) {
        self.sync.stop_watcher();
        self.sync.unmount();
        self.ticker.stop();
    }
}

fn init_logging(debug: bool) -> Result<()> {
    let log_path: PathBuf = std::env::temp_dir().join("filtersnatch-debug.log");
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_store(cli_path: Option<String>) -> Box<dyn ConfigStore> {
    let config_path = resolve_config_path(cli_path);
    tracing::info!("Loading config from: {}", config_path.display());

    match YamlConfigStore::open(&config_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::error!(
                "Config file {} unusable, changes will not be saved: {:#}",
                config_path.display(),
                e
            );
            Box::new(MemoryConfigStore::new(ControllerConfig::first_run_defaults()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.debug)?;
    tracing::info!("Starting filtersnatch {}", filtersnatch::version_string());

    let store = open_store(args.config);
    let mut app = App::new(
        store,
        WatcherOptions {
            dry_run: args.dry_run,
        },
    )?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.ui.should_dismiss_toast() {
            app.ui.dismiss_toast();
        }

        if app.ui.should_quit {
            break;
        }

        app.process_background();

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key)?;
            }
        }
    }

    Ok(())
}
