//! Active-section tracking for navigation highlighting.
//!
//! A probe line sits a fixed distance below the top of the viewport.  The
//! section whose vertical extent contains the probe gets its nav link marked
//! `active-link`; every other nav link loses the marker.  When the probe is
//! outside every section the current marker is left exactly as it was.

use super::dom::{Document, ElementRole, NodeId};

pub const ACTIVE_CLASS: &str = "active-link";

/// Vertical extent of one trackable section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionExtent {
    pub top: f64,
    pub height: f64,
}

impl SectionExtent {
    /// Half-open containment: `[top, top + height)`.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Index of the section containing `position`.  Overlaps resolve to the
/// last section in document order.
pub fn section_at(extents: &[SectionExtent], position: f64) -> Option<usize> {
    extents.iter().rposition(|e| e.contains(position))
}

/// Trackable sections (hero + content sections) in document order.
pub fn tracked_sections<D: Document>(doc: &D) -> Vec<NodeId> {
    let mut nodes = doc.by_role(ElementRole::Hero);
    nodes.extend(doc.by_role(ElementRole::Section));
    nodes.sort_unstable();
    nodes
}

/// Nav link whose `href` points at `#section_id`.
pub fn link_for_section<D: Document>(doc: &D, section_id: &str) -> Option<NodeId> {
    let href = format!("#{section_id}");
    doc.by_role(ElementRole::NavLink)
        .into_iter()
        .find(|&link| doc.attribute(link, "href").as_deref() == Some(href.as_str()))
}

/// Re-evaluate which nav link is active for the current scroll position.
///
/// Returns the id of the section that matched, if any.
pub fn update_active_link<D: Document>(doc: &mut D, active_offset: f64) -> Option<String> {
    let position = doc.scroll_y() + active_offset;
    let sections = tracked_sections(doc);
    let extents: Vec<SectionExtent> = sections
        .iter()
        .map(|&n| SectionExtent {
            top: doc.offset_top(n).unwrap_or(0.0),
            height: doc.offset_height(n).unwrap_or(0.0),
        })
        .collect();

    let idx = section_at(&extents, position)?;
    let section_id = doc.element_id(sections[idx]);

    let target = section_id
        .as_deref()
        .and_then(|id| link_for_section(&*doc, id));

    for link in doc.by_role(ElementRole::NavLink) {
        doc.remove_class(link, ACTIVE_CLASS);
    }
    // A section without an id still clears the old marker.
    if let Some(link) = target {
        doc.add_class(link, ACTIVE_CLASS);
    }
    section_id
}

/// The section id of the currently active nav link.
pub fn active_section<D: Document>(doc: &D) -> Option<String> {
    doc.by_role(ElementRole::NavLink)
        .into_iter()
        .find(|&link| doc.has_class(link, ACTIVE_CLASS))
        .and_then(|link| doc.attribute(link, "href"))
        .map(|href| href.trim_start_matches('#').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::MemoryDocument;
    use crate::core::page::Page;

    /// hero [0,400), about [400,900), services [900,1500)
    fn laid_out() -> MemoryDocument {
        let page = Page::parse("# Hi\n## about\n## services\n").expect("valid");
        let mut doc = MemoryDocument::from_page(&page);
        let geometry = [("home", 0.0, 400.0), ("about", 400.0, 500.0), ("services", 900.0, 600.0)];
        for (id, top, height) in geometry {
            let node = doc.by_id(id).expect("section exists");
            doc.set_geometry(node, top, height);
        }
        doc.set_document_height(1500.0);
        doc.set_viewport_height(300.0);
        doc
    }

    fn active_links(doc: &MemoryDocument) -> Vec<String> {
        doc.by_role(ElementRole::NavLink)
            .into_iter()
            .filter(|&l| doc.has_class(l, ACTIVE_CLASS))
            .filter_map(|l| doc.attribute(l, "href"))
            .collect()
    }

    #[test]
    fn test_section_at_half_open() {
        let extents = [
            SectionExtent { top: 0.0, height: 100.0 },
            SectionExtent { top: 100.0, height: 100.0 },
        ];
        assert_eq!(section_at(&extents, 0.0), Some(0));
        assert_eq!(section_at(&extents, 99.9), Some(0));
        assert_eq!(section_at(&extents, 100.0), Some(1));
        assert_eq!(section_at(&extents, 200.0), None);
    }

    #[test]
    fn test_overlap_prefers_later_section() {
        let extents = [
            SectionExtent { top: 0.0, height: 300.0 },
            SectionExtent { top: 200.0, height: 100.0 },
        ];
        assert_eq!(section_at(&extents, 250.0), Some(1));
    }

    #[test]
    fn test_exactly_one_link_active() {
        let mut doc = laid_out();
        doc.scroll_to(450.0); // probe at 550 → about
        assert_eq!(update_active_link(&mut doc, 100.0).as_deref(), Some("about"));
        assert_eq!(active_links(&doc), vec!["#about".to_string()]);

        doc.scroll_to(850.0); // probe at 950 → services
        update_active_link(&mut doc, 100.0);
        assert_eq!(active_links(&doc), vec!["#services".to_string()]);
        assert_eq!(active_section(&doc).as_deref(), Some("services"));
    }

    #[test]
    fn test_probe_outside_all_sections_keeps_previous_marker() {
        let mut doc = laid_out();
        doc.scroll_to(0.0);
        update_active_link(&mut doc, 100.0);
        assert_eq!(active_links(&doc), vec!["#home".to_string()]);

        // Probe lands past the end of the last section.
        assert_eq!(update_active_link(&mut doc, 5000.0), None);
        assert_eq!(active_links(&doc), vec!["#home".to_string()]);
    }

    #[test]
    fn test_link_lookup_by_href() {
        let doc = laid_out();
        let link = link_for_section(&doc, "services").expect("link exists");
        assert_eq!(doc.text(link).as_deref(), Some("services"));
        assert!(link_for_section(&doc, "pricing").is_none());
    }
}
