//! Directory panel: prompt, mode switch and the active mode's input

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use filtersnatch::logic::validation::ValidationState;
use filtersnatch::model::{DirectoryModel, InputKind, SelectorState};
use filtersnatch::DirectoryKind;

/// Question shown at the top of each panel
fn panel_prompt(kind: DirectoryKind) -> &'static str {
    match kind {
        DirectoryKind::Filters => "Filter file to be replaced:",
        DirectoryKind::Downloads => "When a new filter is downloaded:",
    }
}

fn no_directory_message(kind: DirectoryKind) -> &'static str {
    match kind {
        DirectoryKind::Filters => "No Path of Exile filters directory chosen",
        DirectoryKind::Downloads => "No downloads directory chosen",
    }
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with "…"
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Render one panel
pub fn render_selector_panel(
    f: &mut Frame,
    area: Rect,
    kind: DirectoryKind,
    selector: &SelectorState,
    directory: &DirectoryModel,
    is_focused: bool,
) {
    let border_color = if is_focused { Color::Cyan } else { Color::Gray };
    let mut title = if directory.path().is_empty() {
        format!(" {} ", kind.as_str())
    } else {
        let inner = (area.width as usize).saturating_sub(kind.as_str().len() + 6);
        format!(" {}: {} ", kind.as_str(), truncate_to_width(directory.path(), inner))
    };
    if directory.is_loading() {
        title.push_str("(loading…) ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Prompt
            Constraint::Length(1), // Modes
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Active mode body
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            panel_prompt(kind),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    f.render_widget(Paragraph::new(mode_line(selector, is_focused)), chunks[1]);

    if directory.path().is_empty() {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    no_directory_message(kind),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    "Press d to choose one",
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            chunks[3],
        );
        return;
    }

    match selector.input_kind() {
        InputKind::FromEntries => render_entry_list(f, chunks[3], selector, is_focused),
        InputKind::SingleNewestEntry => render_newest(f, chunks[3], selector),
        InputKind::TypedText => render_text_input(f, chunks[3], selector),
    }
}

fn mode_line(selector: &SelectorState, is_focused: bool) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, mode) in selector.modes().iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("   "));
        }
        if idx == selector.active_index() {
            let color = if is_focused { Color::Cyan } else { Color::White };
            spans.push(Span::styled(
                format!("(•) {}", mode.label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!("( ) {}", mode.label),
                Style::default().fg(Color::Gray),
            ));
        }
    }
    Line::from(spans)
}

fn render_entry_list(f: &mut Frame, area: Rect, selector: &SelectorState, is_focused: bool) {
    let mut lines_area = area;

    // A remembered pick that is not listed (yet) stays visible above the list
    let selected = selector.selected_entry_name();
    if !selected.is_empty() && !selector.entries().contains(selected) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Selected: ", Style::default().fg(Color::Yellow)),
                Span::raw(selected.to_string()),
                Span::styled(" (not in directory)", Style::default().fg(Color::DarkGray)),
            ])),
            rows[0],
        );
        lines_area = rows[1];
    }

    if let Some(message) = selector.no_entries_message() {
        f.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
            lines_area,
        );
        return;
    }

    let width = lines_area.width as usize;
    let items: Vec<ListItem> = selector
        .entries()
        .iter()
        .map(|entry| {
            let is_selected = entry.name == selected;
            let marker = if is_selected { "✓ " } else { "  " };
            let age = selector.relative_time(entry);
            let name_width = width.saturating_sub(age.width() + 5);
            let name = truncate_to_width(&entry.name, name_width);
            let padding = name_width.saturating_sub(name.width());

            let name_style = if is_selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(name, name_style),
                Span::raw(" ".repeat(padding + 1)),
                Span::styled(age, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let highlight = if is_focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let list = List::new(items).highlight_style(highlight);

    let mut state = ListState::default();
    state.select(Some(selector.cursor()));
    f.render_stateful_widget(list, lines_area, &mut state);
}

fn render_newest(f: &mut Frame, area: Rect, selector: &SelectorState) {
    let paragraph = match selector.newest_entry() {
        Some(entry) => Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Newest: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    truncate_to_width(&entry.name, (area.width as usize).saturating_sub(8)),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("downloaded {}", selector.relative_time(entry)),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        None => Paragraph::new(Span::styled(
            selector.no_entries_message().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(paragraph, area);
}

fn render_text_input(f: &mut Frame, area: Rect, selector: &SelectorState) {
    let input = selector.input();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let prompt = selector.active_mode().text_prompt.clone().unwrap_or_default();
    f.render_widget(Paragraph::new(prompt), rows[0]);

    let state = input.state();
    let border_color = match state {
        ValidationState::Invalid => Color::Red,
        ValidationState::Valid => Color::Green,
        ValidationState::Pending => Color::Yellow,
        ValidationState::Unset => Color::Gray,
    };
    let mut text = vec![Span::raw(input.buffer().to_string())];
    if input.is_focused() {
        text.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    text.push(Span::styled(".filter", Style::default().fg(Color::DarkGray)));
    f.render_widget(
        Paragraph::new(Line::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        ),
        rows[1],
    );

    let hint = match state {
        ValidationState::Invalid => Span::styled(
            "Not a valid file name",
            Style::default().fg(Color::Red),
        ),
        ValidationState::Pending => Span::styled(
            "Enter to confirm, Esc to leave",
            Style::default().fg(Color::Yellow),
        ),
        ValidationState::Valid => Span::styled(
            format!("Using {}", selector.typed_text()),
            Style::default().fg(Color::Green),
        ),
        ValidationState::Unset if input.is_focused() => Span::styled(
            "Type a file name",
            Style::default().fg(Color::DarkGray),
        ),
        ValidationState::Unset => Span::styled(
            "Enter to type a file name",
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(hint), rows[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_names() {
        assert_eq!(truncate_to_width("strict.filter", 20), "strict.filter");
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate_to_width("neversink-strict.filter", 10), "neversink…");
    }

    #[test]
    fn test_truncate_counts_wide_chars() {
        // Each CJK character takes two columns
        let cut = truncate_to_width("日本語のフィルター", 7);
        assert_eq!(cut, "日本語…");
        assert!(cut.width() <= 7);
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
