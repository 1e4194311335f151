use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use filtersnatch::model::DirectoryPrompt;

/// Centered rectangle of at most `width` x `height` inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Render the directory path prompt
pub fn render_directory_prompt(f: &mut Frame, prompt: &DirectoryPrompt) {
    let mut lines = vec![
        Line::from("Path:"),
        Line::from(""),
        Line::from(vec![
            Span::styled(prompt.buffer.clone(), Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];
    match &prompt.error {
        Some(error) => lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter: choose  Esc: cancel  Ctrl+U: clear  ($VAR is expanded)",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let title = format!("Choose {} directory", prompt.kind.as_str());
    let border = if prompt.error.is_some() {
        Color::Red
    } else {
        Color::Yellow
    };

    let prompt_area = centered(f.area(), 70, 9);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, prompt_area);
    f.render_widget(paragraph, prompt_area);
}

/// Render the settings popup
pub fn render_settings(f: &mut Frame, start_in_tray: bool, config_location: &str) {
    let checkbox = if start_in_tray { "[x]" } else { "[ ]" };
    let lines = vec![
        Line::from(vec![
            Span::styled("t ", Style::default().fg(Color::Yellow)),
            Span::styled(checkbox, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Start in compact view"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Config: ", Style::default().fg(Color::Yellow)),
            Span::raw(config_location.to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Esc: close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let area = centered(f.area(), 60, 9);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Settings")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

const HELP_TEXT: &str = "\
Pick the filter file to replace on the left, and which downloads to take on
the right. When a matching .filter file finishes downloading it is copied over
the chosen filter file.

Tab        switch panel
←/→ m      switch mode
↑/↓        move in the file list
Enter      select file / edit name
d          choose the panel's directory
r          rescan the panel's directory
p          pause or resume watching
z          compact view
s          settings
q          quit

Press any key to close";

/// Render the help popup
pub fn render_help(f: &mut Frame) {
    let area = centered(f.area(), 82, 22);
    let paragraph = Paragraph::new(HELP_TEXT)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
