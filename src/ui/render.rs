use ratatui::Frame;

use filtersnatch::DirectoryKind;

use super::{dialogs, layout, legend, selector, status_bar, title_bar, toast};
use crate::App;

/// Main render function - orchestrates all UI rendering
pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();
    let focus = app.ui.focus;
    let focused_kind = app.sync.selector(focus).input_kind();
    let typing = app.is_typing();

    let legend_height = legend::calculate_legend_height(size.width, typing, focused_kind);
    let layout_info = layout::calculate_layout(size, app.ui.compact, legend_height);

    title_bar::render_title_bar(f, layout_info.title_area, app.ui.paused, app.ui.compact);

    for (kind, area) in [
        (DirectoryKind::Filters, layout_info.filters_area),
        (DirectoryKind::Downloads, layout_info.downloads_area),
    ] {
        if let Some(area) = area {
            selector::render_selector_panel(
                f,
                area,
                kind,
                app.sync.selector(kind),
                app.sync.directory(kind),
                focus == kind,
            );
        }
    }

    if let Some(legend_area) = layout_info.legend_area {
        legend::render_legend(f, legend_area, typing, focused_kind);
    }

    status_bar::render_status_bar(
        f,
        layout_info.status_area,
        app.sync.config(),
        &filtersnatch::version_string(),
    );

    // Popups
    if let Some(prompt) = &app.ui.directory_prompt {
        dialogs::render_directory_prompt(f, prompt);
    }

    if app.ui.settings_open {
        dialogs::render_settings(
            f,
            app.sync.config().window.start_in_tray,
            &app.sync.store_location(),
        );
    }

    if app.ui.help_open {
        dialogs::render_help(f);
    }

    if let Some((message, is_error, _)) = &app.ui.toast_message {
        toast::render_toast(f, size, message, *is_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtersnatch::config::ControllerConfig;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::test_support::app_with;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_renders_both_panels_without_directories() {
        let app = app_with(ControllerConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Filter file to be replaced:"));
        assert!(text.contains("When a new filter is downloaded:"));
        assert!(text.contains("No Path of Exile filters directory chosen"));
        assert!(text.contains("No downloads directory chosen"));
    }

    #[tokio::test]
    async fn test_compact_view_shows_only_bars() {
        let mut app = app_with(ControllerConfig::default());
        app.ui.compact = true;
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("filtersnatch"));
        assert!(!text.contains("Filter file to be replaced:"));
    }
}
