use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use filtersnatch::config::ControllerConfig;
use filtersnatch::logic::strategy::{OverwriteStrategy, WatchStrategy};

/// Short description of what the watcher will do with a download
pub fn describe_policy(config: &ControllerConfig) -> String {
    let target = match config.filters.selected_file.as_str() {
        "" => "(none)",
        name => name,
    };
    let source = match WatchStrategy::parse(&config.downloads.watch_strategy) {
        Some(WatchStrategy::NamedFile) if !config.downloads.named_file.is_empty() => {
            config.downloads.named_file.as_str()
        }
        Some(WatchStrategy::NamedFile) => "(none)",
        _ => "newest",
    };
    let overwrite = match OverwriteStrategy::parse(&config.filters.overwrite_strategy) {
        Some(OverwriteStrategy::NamedFile) => "Write",
        _ => "Overwrite",
    };

    format!("Take: {} | {}: {}", source, overwrite, target)
}

/// Render the bottom status bar
pub fn render_status_bar(f: &mut Frame, area: Rect, config: &ControllerConfig, version: &str) {
    let status_line = format!("{} | {}", describe_policy(config), version);

    // Color the labels (before colons)
    let mut spans = vec![];
    for (idx, part) in status_line.split(" | ").enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" | "));
        }
        match part.find(": ") {
            Some(colon_pos) => {
                spans.push(Span::styled(
                    part[..=colon_pos].to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                spans.push(Span::raw(part[colon_pos + 1..].to_string()));
            }
            None => spans.push(Span::raw(part.to_string())),
        }
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(Style::default().fg(Color::Gray));

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_newest_over_selected() {
        let mut config = ControllerConfig::default();
        config.filters.overwrite_strategy = "selected_file".to_string();
        config.filters.selected_file = "main.filter".to_string();
        config.downloads.watch_strategy = "newest_filter_file".to_string();

        assert_eq!(describe_policy(&config), "Take: newest | Overwrite: main.filter");
    }

    #[test]
    fn test_describe_named_without_target() {
        let mut config = ControllerConfig::default();
        config.filters.overwrite_strategy = "named_file".to_string();
        config.downloads.watch_strategy = "named_file".to_string();
        config.downloads.named_file = "strict.filter".to_string();

        assert_eq!(describe_policy(&config), "Take: strict.filter | Write: (none)");
    }
}
