//! Page layout: flows the landing page into terminal rows.
//!
//! Every row is [`ROW_PX`] tall.  Laying out writes each element's
//! geometry, the viewport height and the document height back into the
//! [`MemoryDocument`], so the controller measures exactly what is drawn.

use crate::core::dom::{Document, MemoryDocument, NodeId};
use crate::core::page::{Block, Page};

/// Height of one terminal row in document pixels.
pub const ROW_PX: f64 = 16.0;

/// Rows taken by the fixed header at the top of the viewport.
pub const HEADER_ROWS: u16 = 3;

/// Columns kept free on each side of the page text.
const MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Blank,
    /// The hero title; its text is read live from the document.
    Title,
    Lead,
    Heading,
    Text,
    Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRow {
    pub kind: RowKind,
    pub text: String,
    /// Innermost element the row belongs to.
    pub owner: NodeId,
}

/// The page flowed at a particular terminal size.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub rows: Vec<PageRow>,
}

impl PageLayout {
    /// Flow `page` into rows of `width` columns and record the resulting
    /// geometry in `doc`.  `viewport_rows` is the height of the page pane;
    /// the hero is stretched to fill it.
    pub fn build(page: &Page, doc: &mut MemoryDocument, width: u16, viewport_rows: u16) -> Self {
        let text_width = usize::from(width.saturating_sub(MARGIN * 2).max(10));
        let mut out = RowWriter::default();

        if let Some(header) = doc.by_id("header") {
            doc.set_geometry(header, 0.0, rows_px(usize::from(HEADER_ROWS)));
        }

        // ── hero ───────────────────────────────────────────────
        let hero = doc.by_id(Page::HERO_ID).unwrap_or_else(|| doc.body());
        let content = doc.by_id("hero-content").unwrap_or(hero);
        let title = doc.by_id("hero-title").unwrap_or(content);

        out.blank(hero, usize::from(HEADER_ROWS) + 2);
        let content_start = out.len();
        out.push(RowKind::Title, String::new(), title);
        doc.set_geometry(title, rows_px(content_start), ROW_PX);
        for para in &page.hero.body {
            out.blank(content, 1);
            out.wrapped(RowKind::Lead, para, text_width, content);
        }
        doc.set_geometry(
            content,
            rows_px(content_start),
            rows_px(out.len() - content_start),
        );
        out.blank(hero, 2);
        out.pad_to(hero, usize::from(viewport_rows));
        doc.set_geometry(hero, 0.0, rows_px(out.len()));

        // ── sections ───────────────────────────────────────────
        for section in &page.sections {
            let Some(node) = doc.by_id(&section.id) else {
                continue;
            };
            let start = out.len();
            out.blank(node, 1);
            out.push(RowKind::Heading, section.label.clone(), node);
            out.blank(node, 1);

            let mut card_index = 0;
            for block in &section.blocks {
                match block {
                    Block::Paragraph(text) => {
                        out.wrapped(RowKind::Text, text, text_width, node);
                    }
                    Block::Card(text) => {
                        let card_id = format!("{}-card-{card_index}", section.id);
                        card_index += 1;
                        let card = doc.by_id(&card_id).unwrap_or(node);
                        let card_start = out.len();
                        out.wrapped(RowKind::Card, text, text_width.saturating_sub(2).max(8), card);
                        doc.set_geometry(card, rows_px(card_start), rows_px(out.len() - card_start));
                    }
                }
                out.blank(node, 1);
            }
            out.blank(node, 1);
            doc.set_geometry(node, rows_px(start), rows_px(out.len() - start));
        }

        doc.set_viewport_height(rows_px(usize::from(viewport_rows)));
        doc.set_document_height(rows_px(out.len()));

        tracing::debug!(width, viewport_rows, rows = out.len(), "page laid out");
        Self { rows: out.rows }
    }

    /// Index of the first row visible at `scroll_y`.
    pub fn first_visible_row(scroll_y: f64) -> usize {
        (scroll_y / ROW_PX).round().max(0.0) as usize
    }
}

fn rows_px(rows: usize) -> f64 {
    rows as f64 * ROW_PX
}

#[derive(Default)]
struct RowWriter {
    rows: Vec<PageRow>,
}

impl RowWriter {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn push(&mut self, kind: RowKind, text: String, owner: NodeId) {
        self.rows.push(PageRow { kind, text, owner });
    }

    fn blank(&mut self, owner: NodeId, count: usize) {
        for _ in 0..count {
            self.push(RowKind::Blank, String::new(), owner);
        }
    }

    fn pad_to(&mut self, owner: NodeId, total: usize) {
        let missing = total.saturating_sub(self.len());
        self.blank(owner, missing);
    }

    fn wrapped(&mut self, kind: RowKind, text: &str, width: usize, owner: NodeId) {
        for line in wrap(text, width) {
            self.push(kind, line, owner);
        }
    }
}

/// Greedy word wrap; words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
