//! Page viewport widget: draws the laid-out rows at the current scroll
//! offset, styled from the document's reveal state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::core::controller::{FADE_CLASS, VISIBLE_CLASS};
use crate::core::dom::{Document, ElementRole, MemoryDocument, NodeId};

use super::page_layout::{PageLayout, PageRow, RowKind};
use super::theme::Theme;

const MARGIN: u16 = 2;
const CARD_BAR: &str = "▌ ";
const TITLE_CURSOR: &str = "▏";

pub struct PageView<'a> {
    pub layout: &'a PageLayout,
    pub doc: &'a MemoryDocument,
}

impl PageView<'_> {
    /// A section still waiting for its reveal.
    fn section_hidden(&self, node: NodeId) -> bool {
        self.doc
            .closest(node, ElementRole::Section)
            .and_then(|s| self.doc.style(s, "opacity"))
            .is_some_and(|o| o == "0")
    }

    /// A `fade-in` element (card or hero content) that hasn't become visible.
    fn faded(&self, node: NodeId) -> bool {
        [ElementRole::Card, ElementRole::HeroContent]
            .into_iter()
            .filter_map(|role| self.doc.closest(node, role))
            .any(|n| self.doc.has_class(n, FADE_CLASS) && !self.doc.has_class(n, VISIBLE_CLASS))
    }

    fn row_style(&self, row: &PageRow) -> Style {
        if self.section_hidden(row.owner) || self.faded(row.owner) {
            return Theme::hidden_style();
        }
        match row.kind {
            RowKind::Title => Theme::hero_title_style(),
            RowKind::Lead => Theme::lead_style(),
            RowKind::Heading => Theme::heading_style(),
            RowKind::Card => Theme::card_style(),
            RowKind::Text | RowKind::Blank => Theme::text_style(),
        }
    }

    fn render_row(&self, row: &PageRow, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let style = self.row_style(row);
        let width = usize::from(width);
        match row.kind {
            RowKind::Blank => {}
            RowKind::Title => {
                let text = self.doc.text(row.owner).unwrap_or_default();
                let (end, _) = buf.set_stringn(x, y, &text, width, style);
                let cursor_on = self
                    .doc
                    .style(row.owner, "border-right")
                    .is_some_and(|b| b != "none");
                let used = usize::from(end - x);
                if cursor_on && used < width {
                    buf.set_string(end, y, TITLE_CURSOR, Theme::cursor_style());
                }
            }
            RowKind::Heading => {
                buf.set_stringn(x, y, format!("── {} ", row.text), width, style);
            }
            RowKind::Card => {
                buf.set_stringn(x, y, format!("{CARD_BAR}{}", row.text), width, style);
            }
            RowKind::Lead | RowKind::Text => {
                buf.set_stringn(x, y, &row.text, width, style);
            }
        }
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let first = PageLayout::first_visible_row(self.doc.scroll_y());
        let x = area.x + MARGIN.min(area.width);
        let width = area.width.saturating_sub(MARGIN * 2);

        for (offset, row) in self
            .layout
            .rows
            .iter()
            .skip(first)
            .take(usize::from(area.height))
            .enumerate()
        {
            self.render_row(row, x, area.y + offset as u16, width, buf);
        }
    }
}
