use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Below this width the two panels are stacked instead of side by side
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 90;

/// Layout information for rendering
pub struct LayoutInfo {
    /// Top title bar area
    pub title_area: Rect,
    /// Filters panel (hidden in compact view)
    pub filters_area: Option<Rect>,
    /// Downloads panel (hidden in compact view)
    pub downloads_area: Option<Rect>,
    /// Hotkey legend (hidden in compact view)
    pub legend_area: Option<Rect>,
    /// Bottom status bar area
    pub status_area: Rect,
}

/// Calculate the screen layout for all UI components
pub fn calculate_layout(terminal_size: Rect, compact: bool, legend_height: u16) -> LayoutInfo {
    if compact {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(terminal_size);

        return LayoutInfo {
            title_area: chunks[0],
            filters_area: None,
            downloads_area: None,
            legend_area: None,
            status_area: chunks[1],
        };
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title bar
            Constraint::Min(6),                // Panels
            Constraint::Length(legend_height), // Legend (exact fit for wrapped content)
            Constraint::Length(3),             // Status bar
        ])
        .split(terminal_size);

    let panel_direction = if terminal_size.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let panels = Layout::default()
        .direction(panel_direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    LayoutInfo {
        title_area: main_chunks[0],
        filters_area: Some(panels[0]),
        downloads_area: Some(panels[1]),
        legend_area: Some(main_chunks[2]),
        status_area: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_layout_hides_panels() {
        let layout = calculate_layout(Rect::new(0, 0, 100, 30), true, 3);
        assert!(layout.filters_area.is_none());
        assert!(layout.downloads_area.is_none());
        assert!(layout.legend_area.is_none());
        assert_eq!(layout.title_area.height, 3);
    }

    #[test]
    fn test_wide_terminal_puts_panels_side_by_side() {
        let layout = calculate_layout(Rect::new(0, 0, 120, 40), false, 3);
        let filters = layout.filters_area.unwrap();
        let downloads = layout.downloads_area.unwrap();
        assert_eq!(filters.y, downloads.y);
        assert!(downloads.x > filters.x);
    }

    #[test]
    fn test_narrow_terminal_stacks_panels() {
        let layout = calculate_layout(Rect::new(0, 0, 60, 40), false, 4);
        let filters = layout.filters_area.unwrap();
        let downloads = layout.downloads_area.unwrap();
        assert_eq!(filters.x, downloads.x);
        assert!(downloads.y > filters.y);
        assert_eq!(layout.legend_area.unwrap().height, 4);
    }
}
