use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the top bar: app name, subtitle and watcher state
pub fn render_title_bar(f: &mut Frame, area: Rect, paused: bool, compact: bool) {
    let watch_span = if paused {
        Span::styled("⏸ Paused", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("● Watching", Style::default().fg(Color::Green))
    };

    let mut spans = vec![
        Span::styled(
            "filtersnatch",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            "filter file watcher & replacer",
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" | "),
        watch_span,
    ];
    if compact {
        spans.push(Span::styled("  (z to expand)", Style::default().fg(Color::DarkGray)));
    }

    let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}
