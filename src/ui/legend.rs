use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use filtersnatch::model::InputKind;

fn key(k: &'static str, action: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(k, Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ]
}

/// Build hotkey spans (extracted for testability)
fn build_hotkey_spans(typing: bool, input_kind: InputKind) -> Vec<Span<'static>> {
    let mut hotkey_spans = vec![];

    if typing {
        hotkey_spans.extend(key("Enter", ":Confirm  "));
        hotkey_spans.extend(key("Esc", ":Done  "));
        hotkey_spans.extend(key("Tab", ":Other panel"));
        return hotkey_spans;
    }

    hotkey_spans.extend(key("Tab", ":Other panel  "));
    hotkey_spans.extend(key("←/→", ":Mode  "));

    match input_kind {
        InputKind::FromEntries => {
            hotkey_spans.extend(key("↑/↓", ":Nav  "));
            hotkey_spans.extend(key("Enter", ":Select  "));
        }
        InputKind::TypedText => {
            hotkey_spans.extend(key("Enter", ":Edit name  "));
        }
        InputKind::SingleNewestEntry => {}
    }

    hotkey_spans.extend(key("d", ":Directory  "));
    hotkey_spans.extend(key("r", ":Rescan  "));
    hotkey_spans.extend(key("p", ":Pause/Resume  "));
    hotkey_spans.extend(key("z", ":Compact  "));
    hotkey_spans.extend(key("s", ":Settings  "));
    hotkey_spans.extend(key("?", ":Help  "));
    hotkey_spans.extend(key("q", ":Quit"));

    hotkey_spans
}

/// Build the legend paragraph (reusable for both rendering and height calculation)
pub fn build_legend_paragraph(typing: bool, input_kind: InputKind) -> Paragraph<'static> {
    Paragraph::new(vec![Line::from(build_hotkey_spans(typing, input_kind))])
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"))
        .style(Style::default().fg(Color::Gray))
        .wrap(ratatui::widgets::Wrap { trim: false })
}

pub fn render_legend(f: &mut Frame, area: Rect, typing: bool, input_kind: InputKind) {
    f.render_widget(build_legend_paragraph(typing, input_kind), area);
}

/// Calculate required height for legend based on terminal width and content
pub fn calculate_legend_height(terminal_width: u16, typing: bool, input_kind: InputKind) -> u16 {
    // Count lines without the block; line_count() does not account for borders
    let paragraph_for_counting =
        Paragraph::new(vec![Line::from(build_hotkey_spans(typing, input_kind))])
            .wrap(ratatui::widgets::Wrap { trim: false });

    let available_width = terminal_width.saturating_sub(2);
    let line_count = paragraph_for_counting.line_count(available_width);

    (line_count as u16).saturating_add(2).max(3)
}
