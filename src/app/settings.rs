use crate::App;

impl App {
    pub(crate) fn toggle_pause(&mut self) {
        self.sync.toggle_pause();
        self.ui.paused = !self.ui.paused;
        if self.ui.paused {
            self.ui.show_toast("Watching paused");
        } else {
            self.ui.show_toast("Watching resumed");
        }
    }

    pub(crate) fn toggle_compact(&mut self) {
        self.ui.compact = !self.ui.compact;
    }

    /// Flip the start-in-tray preference (takes effect on next launch)
    pub(crate) fn toggle_start_in_tray(&mut self) {
        let enabled = !self.sync.config().window.start_in_tray;
        self.sync.set_start_in_tray(enabled);
    }
}

#[cfg(test)]
mod tests {
    use filtersnatch::config::ControllerConfig;

    use crate::test_support::app_with;

    #[tokio::test]
    async fn test_start_in_tray_starts_compact() {
        let mut config = ControllerConfig::default();
        config.window.start_in_tray = true;
        let mut app = app_with(config);
        assert!(app.ui.compact);

        app.toggle_start_in_tray();
        assert!(!app.sync.config().window.start_in_tray);
        // The running session keeps its view
        assert!(app.ui.compact);
    }

    #[tokio::test]
    async fn test_pause_toggles_and_announces() {
        let mut app = app_with(ControllerConfig::default());
        app.toggle_pause();
        assert!(app.ui.paused);
        assert!(app.ui.toast_message.is_some());

        app.toggle_pause();
        assert!(!app.ui.paused);
    }
}
