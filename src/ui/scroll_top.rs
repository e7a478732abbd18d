//! Floating "back to top" button in the bottom-right corner of the page.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Clear, Widget},
};

use crate::core::controller::SCROLL_TOP_SHOW_CLASS;
use crate::core::dom::{Document, MemoryDocument, NodeId};

use super::theme::Theme;

const WIDTH: u16 = 5;
const HEIGHT: u16 = 1;
const INSET: u16 = 1;

/// Where the button sits inside `page`, or `None` while it is hidden.
pub fn button_rect(page: Rect, doc: &MemoryDocument, button: NodeId) -> Option<Rect> {
    if !doc.has_class(button, SCROLL_TOP_SHOW_CLASS) {
        return None;
    }
    if page.width < WIDTH + INSET || page.height < HEIGHT + INSET {
        return None;
    }
    Some(Rect::new(
        page.right() - WIDTH - INSET,
        page.bottom() - HEIGHT - INSET,
        WIDTH,
        HEIGHT,
    ))
}

pub struct ScrollTopButton<'a> {
    pub doc: &'a MemoryDocument,
    pub button: NodeId,
}

impl Widget for ScrollTopButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(rect) = button_rect(area, self.doc, self.button) else {
            return;
        };
        Clear.render(rect, buf);
        buf.set_style(rect, Theme::scroll_top_style());
        let glyph = self.doc.text(self.button).unwrap_or_default();
        buf.set_stringn(rect.x + 2, rect.y, glyph, 1, Theme::scroll_top_style());
    }
}
