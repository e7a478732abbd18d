//! Document abstraction the page controller drives.
//!
//! [`Document`] is the narrow surface the interaction logic needs from a
//! rendered page: scroll position, element lookup, geometry, class lists,
//! inline styles and text.  [`MemoryDocument`] is an arena-backed
//! implementation; the terminal host renders straight from it.

use std::collections::{BTreeMap, BTreeSet};

use super::page::Page;

// ───────────────────────────────────────── elements ──────────

/// Index into [`MemoryDocument::nodes`].
pub type NodeId = usize;

/// What an element is for.  Stands in for the class selectors the page
/// script would query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Body,
    Header,
    NavToggle,
    NavMenu,
    NavLink,
    Hero,
    HeroContent,
    HeroTitle,
    Section,
    Card,
    ScrollTopButton,
}

/// A single element in the arena.
#[derive(Debug, Clone)]
pub struct Element {
    pub role: ElementRole,
    pub id: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    /// Vertical offset from the document top, in px.
    pub top: f64,
    /// Rendered height, in px.
    pub height: f64,
}

impl Element {
    fn new(role: ElementRole, id: Option<String>, parent: Option<NodeId>) -> Self {
        Self {
            role,
            id,
            parent,
            children: Vec::new(),
            classes: BTreeSet::new(),
            styles: BTreeMap::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            top: 0.0,
            height: 0.0,
        }
    }
}

// ───────────────────────────────────────── trait ─────────────

/// Everything the page controller reads from or writes to the page.
///
/// Node handles that don't exist are tolerated: reads return `None`/`false`
/// and writes are no-ops.
pub trait Document {
    // ── viewport ───────────────────────────────────────────────
    fn scroll_y(&self) -> f64;
    /// Jump to `top`.  The document clamps out-of-range values.
    fn scroll_to(&mut self, top: f64);
    /// Whether the document animates scrolling on its own.
    fn supports_smooth_scroll(&self) -> bool;
    /// Ask the document to animate to `top` by itself.  Only meaningful when
    /// [`Document::supports_smooth_scroll`] is true.
    fn smooth_scroll_to(&mut self, top: f64);
    fn viewport_height(&self) -> f64;

    // ── lookup ─────────────────────────────────────────────────
    fn body(&self) -> NodeId;
    fn by_id(&self, id: &str) -> Option<NodeId>;
    /// The `id` of `node`, if it has one.
    fn element_id(&self, node: NodeId) -> Option<String>;
    fn role(&self, node: NodeId) -> Option<ElementRole>;
    /// All elements with `role`, in document order.
    fn by_role(&self, role: ElementRole) -> Vec<NodeId>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    // ── geometry ───────────────────────────────────────────────
    fn offset_top(&self, node: NodeId) -> Option<f64>;
    fn offset_height(&self, node: NodeId) -> Option<f64>;

    // ── classes ────────────────────────────────────────────────
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    /// Flip `class`; returns whether it is present afterwards.
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool;
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    // ── inline style & text ────────────────────────────────────
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    fn text(&self, node: NodeId) -> Option<String>;
    fn set_text(&mut self, node: NodeId, text: &str);

    // ── creation ───────────────────────────────────────────────
    /// Create an element and append it as the last child of the body.
    fn append_to_body(&mut self, role: ElementRole) -> NodeId;
}

// ───────────────────────────────────────── memory impl ───────

/// Arena-backed [`Document`].
///
/// Geometry is written by whoever lays the page out; the document itself
/// only clamps scrolling against it.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub nodes: Vec<Element>,
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
    smooth_scroll: bool,
    /// Set whenever `scroll_y` changes; cleared by `take_scroll_event`.
    scroll_dirty: bool,
}

impl MemoryDocument {
    /// An empty document with just a body.
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new(ElementRole::Body, None, None)],
            scroll_y: 0.0,
            viewport_height: 0.0,
            document_height: 0.0,
            smooth_scroll: false,
            scroll_dirty: false,
        }
    }

    /// Build the element tree for a landing page.
    ///
    /// Ids follow the page's own: `header`, `nav-toggle`, `nav-menu`,
    /// `home` (hero), `hero-content`, `hero-title`, one element per section
    /// id, and `<section>-card-<n>` for cards.  Nav links carry `href`.
    pub fn from_page(page: &Page) -> Self {
        let mut doc = Self::new();
        let body = doc.body();

        let header = doc.add_child(body, ElementRole::Header, Some("header"));
        doc.add_class(header, "header");
        doc.set_text(header, &page.brand);

        let toggle = doc.add_child(header, ElementRole::NavToggle, Some("nav-toggle"));
        doc.set_text(toggle, "☰");
        let menu = doc.add_child(header, ElementRole::NavMenu, Some("nav-menu"));
        for entry in page.nav_entries() {
            let link = doc.add_child(menu, ElementRole::NavLink, None);
            doc.add_class(link, "nav__link");
            doc.set_attribute(link, "href", &entry.href);
            doc.set_text(link, &entry.label);
        }

        let hero = doc.add_child(body, ElementRole::Hero, Some(Page::HERO_ID));
        doc.add_class(hero, "hero");
        let content = doc.add_child(hero, ElementRole::HeroContent, Some("hero-content"));
        doc.add_class(content, "hero__content");
        let title = doc.add_child(content, ElementRole::HeroTitle, Some("hero-title"));
        doc.add_class(title, "hero__title");
        doc.set_text(title, &page.hero.title);
        let hero_body = page.hero.body.join("\n");
        doc.set_text(content, &hero_body);

        for section in &page.sections {
            let node = doc.add_child(body, ElementRole::Section, Some(&section.id));
            doc.add_class(node, "section");
            doc.set_text(node, &section.label);
            for (i, card) in section.cards().enumerate() {
                let card_id = format!("{}-card-{i}", section.id);
                let c = doc.add_child(node, ElementRole::Card, Some(&card_id));
                doc.add_class(c, "card");
                doc.set_text(c, card);
            }
        }

        doc
    }

    /// Add a child under `parent` and return its [`NodeId`].
    pub fn add_child(&mut self, parent: NodeId, role: ElementRole, id: Option<&str>) -> NodeId {
        let node = self.nodes.len();
        self.nodes
            .push(Element::new(role, id.map(str::to_string), Some(parent)));
        self.nodes[parent].children.push(node);
        node
    }

    /// Record where `node` was laid out.
    pub fn set_geometry(&mut self, node: NodeId, top: f64, height: f64) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.top = top;
            el.height = height.max(0.0);
        }
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.scroll_to(self.scroll_y);
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.document_height = height.max(0.0);
        self.scroll_to(self.scroll_y);
    }

    pub fn set_smooth_scroll_support(&mut self, supported: bool) {
        self.smooth_scroll = supported;
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Report and clear a pending scroll event.
    pub fn take_scroll_event(&mut self) -> bool {
        std::mem::take(&mut self.scroll_dirty)
    }

    /// Walk up the ancestors of `node` (inclusive) looking for `role`.
    pub fn closest(&self, node: NodeId, role: ElementRole) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(id) = cur {
            let el = self.nodes.get(id)?;
            if el.role == role {
                return Some(id);
            }
            cur = el.parent;
        }
        None
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f64) {
        let clamped = if top.is_finite() {
            top.clamp(0.0, self.max_scroll())
        } else {
            self.scroll_y
        };
        if clamped != self.scroll_y {
            self.scroll_y = clamped;
            self.scroll_dirty = true;
        }
    }

    fn supports_smooth_scroll(&self) -> bool {
        self.smooth_scroll
    }

    fn smooth_scroll_to(&mut self, top: f64) {
        // No compositor here: the destination is reached immediately.
        self.scroll_to(top);
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn body(&self) -> NodeId {
        0
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|el| el.id.as_deref() == Some(id))
    }

    fn element_id(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node)?.id.clone()
    }

    fn role(&self, node: NodeId) -> Option<ElementRole> {
        self.nodes.get(node).map(|el| el.role)
    }

    fn by_role(&self, role: ElementRole) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, el)| el.role == role)
            .map(|(i, _)| i)
            .collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn offset_top(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(node).map(|el| el.top)
    }

    fn offset_height(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(node).map(|el| el.height)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.classes.remove(class);
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let Some(el) = self.nodes.get_mut(node) else {
            return false;
        };
        if el.classes.remove(class) {
            false
        } else {
            el.classes.insert(class.to_string());
            true
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|el| el.classes.contains(class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get(node)?.styles.get(property).cloned()
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node).map(|el| el.text.clone())
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.text = text.to_string();
        }
    }

    fn append_to_body(&mut self, role: ElementRole) -> NodeId {
        let body = self.body();
        self.add_child(body, role, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_doc() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.set_document_height(2000.0);
        doc.set_viewport_height(500.0);
        doc
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut doc = sized_doc();
        doc.scroll_to(-40.0);
        assert_eq!(doc.scroll_y(), 0.0);
        doc.scroll_to(9000.0);
        assert_eq!(doc.scroll_y(), 1500.0);
        doc.scroll_to(f64::NAN);
        assert_eq!(doc.scroll_y(), 1500.0);
    }

    #[test]
    fn test_scroll_event_only_on_change() {
        let mut doc = sized_doc();
        doc.scroll_to(0.0);
        assert!(!doc.take_scroll_event());
        doc.scroll_to(120.0);
        assert!(doc.take_scroll_event());
        assert!(!doc.take_scroll_event());
    }

    #[test]
    fn test_shrinking_document_reclamps_scroll() {
        let mut doc = sized_doc();
        doc.scroll_to(1400.0);
        doc.set_document_height(800.0);
        assert_eq!(doc.scroll_y(), 300.0);
    }

    #[test]
    fn test_class_ops() {
        let mut doc = MemoryDocument::new();
        let n = doc.append_to_body(ElementRole::Card);
        assert!(doc.toggle_class(n, "visible"));
        assert!(doc.has_class(n, "visible"));
        assert!(!doc.toggle_class(n, "visible"));
        doc.add_class(n, "fade-in");
        doc.remove_class(n, "fade-in");
        assert!(!doc.has_class(n, "fade-in"));
    }

    #[test]
    fn test_missing_node_is_tolerated() {
        let mut doc = MemoryDocument::new();
        doc.add_class(99, "x");
        doc.set_style(99, "opacity", "1");
        assert!(!doc.has_class(99, "x"));
        assert!(!doc.toggle_class(99, "x"));
        assert_eq!(doc.offset_top(99), None);
        assert_eq!(doc.style(99, "opacity"), None);
    }

    #[test]
    fn test_from_page_builds_expected_tree() {
        let page = Page::demo().expect("demo page");
        let doc = MemoryDocument::from_page(&page);

        assert!(doc.by_id("header").is_some());
        assert!(doc.by_id("nav-toggle").is_some());
        assert!(doc.by_id("hero-title").is_some());

        let links = doc.by_role(ElementRole::NavLink);
        assert_eq!(links.len(), page.sections.len() + 1);
        assert_eq!(doc.attribute(links[0], "href").as_deref(), Some("#home"));

        let sections = doc.by_role(ElementRole::Section);
        assert_eq!(sections.len(), page.sections.len());
        let first_card = doc.by_role(ElementRole::Card)[0];
        let owner = doc.closest(first_card, ElementRole::Section).expect("card inside section");
        assert!(sections.contains(&owner));
    }
}
