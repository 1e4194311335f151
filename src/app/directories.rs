use filtersnatch::controller::PickError;
use filtersnatch::model::DirectoryPrompt;
use filtersnatch::DirectoryKind;

use crate::App;

pub(crate) fn kind_title(kind: DirectoryKind) -> &'static str {
    match kind {
        DirectoryKind::Filters => "Filters",
        DirectoryKind::Downloads => "Downloads",
    }
}

impl App {
    /// Open the path prompt for the focused panel's directory
    pub(crate) fn open_directory_prompt(&mut self) {
        let kind = self.ui.focus;
        let start = self.sync.begin_directory_pick(kind);
        tracing::debug!("Opening {} directory prompt at {}", kind.as_str(), start.display());
        self.ui.directory_prompt = Some(DirectoryPrompt::new(kind, start));
    }

    /// Submit the prompt; rejected paths keep it open with the error shown
    pub(crate) fn submit_directory_prompt(&mut self) {
        let Some(prompt) = self.ui.directory_prompt.as_mut() else {
            return;
        };
        let kind = prompt.kind;
        let Some(value) = prompt.value() else {
            prompt.error = Some("Enter a directory path".to_string());
            return;
        };

        match self.sync.complete_directory_pick(kind, Some(value)) {
            Ok(Some(path)) => {
                self.ui.directory_prompt = None;
                self.ui.show_toast(format!(
                    "{} directory: {}",
                    kind_title(kind),
                    path.display()
                ));
            }
            Ok(None) => self.ui.directory_prompt = None,
            Err(e) => {
                let message = e.to_string();
                let toast = match e {
                    PickError::BannedDirectory { .. } => format!("Directory conflict: {}", message),
                    PickError::NotADirectory(_) => message.clone(),
                };
                if let Some(prompt) = self.ui.directory_prompt.as_mut() {
                    prompt.error = Some(message);
                }
                self.ui.show_error_toast(toast);
            }
        }
    }

    /// Close the prompt without choosing anything
    pub(crate) fn cancel_directory_prompt(&mut self) {
        let Some(prompt) = self.ui.directory_prompt.take() else {
            return;
        };
        if let Err(e) = self.sync.complete_directory_pick(prompt.kind, None) {
            tracing::warn!("Cancelling {} pick failed: {}", prompt.kind.as_str(), e);
        }
    }

    pub(crate) fn refresh_focused_listing(&mut self) {
        let kind = self.ui.focus;
        if self.sync.directory(kind).path().is_empty() {
            self.ui.show_error_toast(format!(
                "No {} directory chosen (press d)",
                kind.as_str()
            ));
            return;
        }
        self.sync.refresh_listing(kind);
    }
}

#[cfg(test)]
mod tests {
    use filtersnatch::config::ControllerConfig;
    use filtersnatch::DirectoryKind;

    use crate::test_support::app_with;

    fn config_with_dirs(filters: &str, downloads: &str) -> ControllerConfig {
        let mut config = ControllerConfig::default();
        config.filters.directory = filters.to_string();
        config.downloads.directory = downloads.to_string();
        config
    }

    #[tokio::test]
    async fn test_prompt_starts_in_configured_directory() {
        let filters = tempfile::tempdir().unwrap();
        let mut app = app_with(config_with_dirs(filters.path().to_str().unwrap(), ""));

        app.open_directory_prompt();

        let prompt = app.ui.directory_prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, DirectoryKind::Filters);
        assert_eq!(prompt.value(), Some(filters.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_conflicting_directory_keeps_prompt_open() {
        let shared = tempfile::tempdir().unwrap();
        let shared_path = shared.path().to_str().unwrap().to_string();
        let mut app = app_with(config_with_dirs("", &shared_path));

        app.open_directory_prompt();
        let prompt = app.ui.directory_prompt.as_mut().unwrap();
        prompt.clear();
        for c in shared_path.chars() {
            prompt.insert_char(c);
        }
        app.submit_directory_prompt();

        let prompt = app.ui.directory_prompt.as_ref().expect("prompt stays open");
        assert!(prompt.error.as_deref().unwrap().contains("downloads directory"));
        assert!(matches!(app.ui.toast_message, Some((_, true, _))));
        assert_eq!(app.sync.config().filters.directory, "");
    }

    #[tokio::test]
    async fn test_accepted_directory_is_stored() {
        let filters = tempfile::tempdir().unwrap();
        let filters_path = filters.path().to_str().unwrap().to_string();
        let mut app = app_with(ControllerConfig::default());

        app.open_directory_prompt();
        let prompt = app.ui.directory_prompt.as_mut().unwrap();
        prompt.clear();
        for c in filters_path.chars() {
            prompt.insert_char(c);
        }
        app.submit_directory_prompt();

        assert!(app.ui.directory_prompt.is_none());
        assert_eq!(app.sync.config().filters.directory, filters_path);
    }

    #[tokio::test]
    async fn test_cancel_leaves_config_alone() {
        let mut app = app_with(config_with_dirs("/poe", ""));
        app.ui.directory_prompt = Some(filtersnatch::model::DirectoryPrompt::new(
            DirectoryKind::Filters,
            std::path::PathBuf::from("/elsewhere"),
        ));

        app.cancel_directory_prompt();

        assert!(app.ui.directory_prompt.is_none());
        assert_eq!(app.sync.config().filters.directory, "/poe");
    }
}
