//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::page_layout::HEADER_ROWS;

/// Primary screen layout: the page viewport with the fixed header laid over
/// its top rows, and a bottom status bar.
pub struct AppLayout {
    pub page_area: Rect,
    /// Top slice of `page_area`; the page keeps scrolling underneath it.
    pub header_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(HEADER_ROWS + 1), // page viewport
                Constraint::Length(1),            // status bar
            ])
            .split(area);

        let page_area = chunks[0];
        let header_area = Rect {
            height: HEADER_ROWS.min(page_area.height),
            ..page_area
        };

        Self {
            page_area,
            header_area,
            status_area: chunks[1],
        }
    }
}

pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_overlays_page() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.page_area, Rect::new(0, 0, 100, 39));
        assert_eq!(layout.header_area, Rect::new(0, 0, 100, HEADER_ROWS));
        assert_eq!(layout.status_area, Rect::new(0, 39, 100, 1));
    }

    #[test]
    fn test_point_in_rect() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(point_in_rect(r, 2, 3));
        assert!(point_in_rect(r, 5, 4));
        assert!(!point_in_rect(r, 6, 4));
        assert!(!point_in_rect(r, 2, 5));
    }
}
