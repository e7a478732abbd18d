//! Fixed header: brand, navigation links and the mobile menu.
//!
//! [`NavGeometry`] is computed once per frame and shared by the renderer and
//! the mouse handler, so hit boxes always match what is on screen.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, BorderType, Borders, Clear, Widget},
};

use crate::core::controller::{SHOW_MENU_CLASS, TOGGLE_ACTIVE_CLASS};
use crate::core::dom::{Document, ElementRole, MemoryDocument, NodeId};
use crate::core::tracker::ACTIVE_CLASS;

use super::layout::point_in_rect;
use super::theme::Theme;

const MARGIN: u16 = 2;

/// Screen rectangles of every clickable header element.
#[derive(Debug, Clone, Default)]
pub struct NavGeometry {
    pub header: Rect,
    pub toggle: Option<(Rect, NodeId)>,
    pub links: Vec<(Rect, NodeId)>,
    /// Frame of the open mobile dropdown.
    pub dropdown: Option<Rect>,
}

impl NavGeometry {
    /// Place the header inside `page` (its top rows).  `mobile` selects the
    /// hamburger layout.
    pub fn compute(header: Rect, page: Rect, doc: &MemoryDocument, mobile: bool) -> Self {
        let mut geometry = Self {
            header,
            ..Self::default()
        };
        if header.height < 2 {
            return geometry;
        }

        let row = header.y + 1;
        let right = header.right().saturating_sub(MARGIN);
        let links = doc.by_role(ElementRole::NavLink);
        let label_width = |link: NodeId| doc.text(link).map_or(0, |t| t.chars().count()) as u16;

        if !mobile {
            let total: u16 = links
                .iter()
                .map(|&l| label_width(l) + 2)
                .sum::<u16>()
                .saturating_add(links.len().saturating_sub(1) as u16);
            let mut x = right.saturating_sub(total).max(header.x);
            for &link in &links {
                let w = (label_width(link) + 2).min(right.saturating_sub(x));
                if w == 0 {
                    break;
                }
                geometry.links.push((Rect::new(x, row, w, 1), link));
                x = x.saturating_add(w + 1);
            }
            return geometry;
        }

        if let Some(toggle) = doc.by_id("nav-toggle") {
            let x = right.saturating_sub(3).max(header.x);
            geometry.toggle = Some((Rect::new(x, row, 3, 1), toggle));
        }

        let open = doc
            .by_id("nav-menu")
            .is_some_and(|menu| doc.has_class(menu, SHOW_MENU_CLASS));
        if !open {
            return geometry;
        }

        let width = links
            .iter()
            .map(|&l| label_width(l))
            .max()
            .unwrap_or(0)
            .saturating_add(6)
            .min(header.width);
        let top = header.bottom();
        let height = (links.len() as u16 + 2).min(page.bottom().saturating_sub(top));
        if height < 3 {
            return geometry;
        }
        let dropdown = Rect::new(right.saturating_sub(width).max(header.x), top, width, height);
        for (i, &link) in links.iter().enumerate().take(usize::from(height - 2)) {
            let rect = Rect::new(dropdown.x + 1, top + 1 + i as u16, width.saturating_sub(2), 1);
            geometry.links.push((rect, link));
        }
        geometry.dropdown = Some(dropdown);
        geometry
    }

    /// The header element under a screen position, if any.
    pub fn hit(&self, col: u16, row: u16) -> Option<NodeId> {
        self.toggle
            .iter()
            .chain(self.links.iter())
            .find(|(rect, _)| point_in_rect(*rect, col, row))
            .map(|&(_, node)| node)
    }

    /// Whether a position falls on the header or its dropdown.
    pub fn covers(&self, col: u16, row: u16) -> bool {
        point_in_rect(self.header, col, row)
            || self.dropdown.is_some_and(|d| point_in_rect(d, col, row))
    }
}

/// Renders the header from [`NavGeometry`] and document state.
pub struct NavBar<'a> {
    pub doc: &'a MemoryDocument,
    pub geometry: &'a NavGeometry,
    /// Link with keyboard focus.
    pub focused: Option<NodeId>,
}

impl Widget for NavBar<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let doc = self.doc;
        let header = self.geometry.header;
        if header.height == 0 {
            return;
        }
        let header_node = doc.by_id("header");
        let scrolled = header_node
            .and_then(|h| doc.style(h, "backdrop-filter"))
            .is_some_and(|f| f != "none");

        Clear.render(header, buf);
        buf.set_style(header, Theme::header_style(scrolled));

        if header.height >= 2 {
            let brand = header_node.and_then(|h| doc.text(h)).unwrap_or_default();
            buf.set_stringn(
                header.x + MARGIN,
                header.y + 1,
                &brand,
                usize::from(header.width.saturating_sub(MARGIN)),
                Theme::brand_style(),
            );
        }
        if scrolled && header.height >= 3 {
            let rule = "─".repeat(usize::from(header.width));
            buf.set_string(header.x, header.bottom() - 1, rule, Theme::border_style());
        }

        if let Some((rect, toggle)) = self.geometry.toggle {
            let glyph = if doc.has_class(toggle, TOGGLE_ACTIVE_CLASS) {
                "✕".to_string()
            } else {
                doc.text(toggle).unwrap_or_default()
            };
            buf.set_stringn(rect.x + 1, rect.y, glyph, 1, Theme::brand_style());
        }

        if let Some(dropdown) = self.geometry.dropdown {
            Clear.render(dropdown, buf);
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border_style())
                .render(dropdown, buf);
        }

        for &(rect, link) in &self.geometry.links {
            let label = doc.text(link).unwrap_or_default();
            let mut style = if doc.has_class(link, ACTIVE_CLASS) {
                Theme::active_link_style()
            } else {
                Theme::link_style()
            };
            if self.focused == Some(link) {
                style = style.patch(Theme::focused_link_style());
            }
            buf.set_stringn(
                rect.x,
                rect.y,
                format!(" {label} "),
                usize::from(rect.width),
                style,
            );
        }
    }
}
