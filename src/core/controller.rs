//! Page controller: every interactive behaviour of the landing page.
//!
//! The controller owns the [`Document`] it drives, a [`Clock`], the scroll
//! throttle, the scroll animator and the reveal observers.  Hosts forward
//! discrete events (clicks, scroll, resize, keys) and call [`PageController::tick`]
//! once per display frame; nothing here blocks or spawns.

use std::time::Duration;

use super::animator::{FrameTicket, ScrollAnimator, DEFAULT_SCROLL_DURATION};
use super::clock::Clock;
use super::dom::{Document, ElementRole, NodeId};
use super::reveal::IntersectionObserver;
use super::throttle::Throttle;
use super::tracker;
use super::typewriter::{Typewriter, TypewriterStep, TypewriterTiming};

// ───────────────────────────────────────── classes & styles ──

pub const SHOW_MENU_CLASS: &str = "show-menu";
pub const TOGGLE_ACTIVE_CLASS: &str = "active";
pub const SCROLL_TOP_CLASS: &str = "scroll-top";
pub const SCROLL_TOP_SHOW_CLASS: &str = "show";
pub const FADE_CLASS: &str = "fade-in";
pub const VISIBLE_CLASS: &str = "visible";

const HEADER_SCROLLED_BG: &str = "rgba(255, 255, 253, 0.95)";
const HEADER_SCROLLED_FILTER: &str = "blur(10px)";
const HEADER_RESTING_BG: &str = "var(--color-surface)";
const HEADER_RESTING_FILTER: &str = "none";
const TITLE_CURSOR: &str = "2px solid var(--color-primary)";

// ───────────────────────────────────────── settings ──────────

/// Tunables for the page behaviours.  Defaults match the stock landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSettings {
    pub scroll_duration: Duration,
    pub scroll_throttle: Duration,
    /// Probe distance below the viewport top for active-link tracking.
    pub active_offset: f64,
    pub scroll_top_threshold: f64,
    pub header_threshold: f64,
    pub fade_threshold: f64,
    pub fade_bottom_margin: f64,
    pub reveal_threshold: f64,
    pub typewriter: TypewriterTiming,
    /// Prefer the document's own smooth scrolling when it has one.
    pub native_smooth_scroll: bool,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            scroll_duration: DEFAULT_SCROLL_DURATION,
            scroll_throttle: Duration::from_millis(16),
            active_offset: 100.0,
            scroll_top_threshold: 300.0,
            header_threshold: 50.0,
            fade_threshold: 0.1,
            fade_bottom_margin: 50.0,
            reveal_threshold: 0.15,
            typewriter: TypewriterTiming::default(),
            native_smooth_scroll: true,
        }
    }
}

/// Keys the page itself reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    Escape,
    Home { ctrl: bool },
}

// ───────────────────────────────────────── controller ────────

pub struct PageController<D: Document, C: Clock> {
    doc: D,
    clock: C,
    settings: MotionSettings,
    scroll_throttle: Throttle,
    animator: ScrollAnimator,
    /// Frames requested for the next tick.
    pending_frames: Vec<FrameTicket>,
    fade_observer: IntersectionObserver,
    reveal_observer: IntersectionObserver,
    typewriter: Option<Typewriter>,
    header: Option<NodeId>,
    nav_toggle: Option<NodeId>,
    nav_menu: Option<NodeId>,
    hero_title: Option<NodeId>,
    scroll_top: NodeId,
}

impl<D: Document, C: Clock> PageController<D, C> {
    /// Wire up a freshly loaded document.
    pub fn new(mut doc: D, clock: C, settings: MotionSettings) -> Self {
        let scroll_top = create_scroll_top_button(&mut doc);
        let header = doc.by_role(ElementRole::Header).first().copied();
        let nav_toggle = doc.by_role(ElementRole::NavToggle).first().copied();
        let nav_menu = doc.by_role(ElementRole::NavMenu).first().copied();
        let hero_title = doc.by_role(ElementRole::HeroTitle).first().copied();

        let mut ctl = Self {
            scroll_throttle: Throttle::new(settings.scroll_throttle),
            animator: ScrollAnimator::new(),
            pending_frames: Vec::new(),
            fade_observer: IntersectionObserver::new(
                settings.fade_threshold,
                settings.fade_bottom_margin,
            ),
            reveal_observer: IntersectionObserver::new(settings.reveal_threshold, 0.0),
            typewriter: None,
            header,
            nav_toggle,
            nav_menu,
            hero_title,
            scroll_top,
            doc,
            clock,
            settings,
        };
        ctl.init();
        ctl
    }

    fn init(&mut self) {
        tracker::update_active_link(&mut self.doc, self.settings.active_offset);
        self.setup_fade_in();
        self.setup_section_reveal();
        self.update_header();
        self.schedule_typewriter();
        self.poll_observers();
        tracing::debug!(
            fade_targets = self.fade_observer.targets().len(),
            reveal_targets = self.reveal_observer.targets().len(),
            "page controller initialised"
        );
    }

    fn setup_fade_in(&mut self) {
        let mut targets = self.doc.by_role(ElementRole::Card);
        targets.extend(self.doc.by_role(ElementRole::HeroContent));
        for node in targets {
            self.doc.add_class(node, FADE_CLASS);
            self.fade_observer.observe(node);
        }
    }

    fn setup_section_reveal(&mut self) {
        for node in self.doc.by_role(ElementRole::Section) {
            self.doc.set_style(node, "opacity", "0");
            self.doc.set_style(node, "transform", "translateY(30px)");
            self.doc
                .set_style(node, "transition", "opacity 0.6s ease, transform 0.6s ease");
            self.reveal_observer.observe(node);
        }
    }

    fn schedule_typewriter(&mut self) {
        let Some(title) = self.hero_title else {
            tracing::debug!("no hero title; typewriter skipped");
            return;
        };
        let text = self.doc.text(title).unwrap_or_default();
        self.typewriter = Some(Typewriter::new(
            &text,
            self.clock.now(),
            self.settings.typewriter,
        ));
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn scroll_top_button(&self) -> NodeId {
        self.scroll_top
    }

    /// Whether the next tick has anything to do.
    pub fn is_busy(&self) -> bool {
        !self.pending_frames.is_empty()
            || self.typewriter.as_ref().is_some_and(|tw| !tw.is_done())
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    // ── menu ────────────────────────────────────────────────────

    pub fn toggle_menu(&mut self) {
        let (Some(menu), Some(toggle)) = (self.nav_menu, self.nav_toggle) else {
            return;
        };
        let open = self.doc.toggle_class(menu, SHOW_MENU_CLASS);
        self.doc.toggle_class(toggle, TOGGLE_ACTIVE_CLASS);
        tracing::debug!(open, "nav menu toggled");
    }

    pub fn close_menu(&mut self) {
        if let Some(menu) = self.nav_menu {
            self.doc.remove_class(menu, SHOW_MENU_CLASS);
        }
        if let Some(toggle) = self.nav_toggle {
            self.doc.remove_class(toggle, TOGGLE_ACTIVE_CLASS);
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.nav_menu
            .is_some_and(|menu| self.doc.has_class(menu, SHOW_MENU_CLASS))
    }

    // ── clicks ──────────────────────────────────────────────────

    /// Dispatch a click on `node` to whichever behaviour owns it.
    pub fn click(&mut self, node: NodeId) {
        match self.doc.role(node) {
            Some(ElementRole::NavToggle) => self.toggle_menu(),
            Some(ElementRole::NavLink) => self.click_nav_link(node),
            Some(ElementRole::ScrollTopButton) => self.scroll_to_top(),
            _ => {}
        }
    }

    /// Close the menu and scroll to the link's fragment target.
    pub fn click_nav_link(&mut self, link: NodeId) {
        self.close_menu();
        let Some(href) = self.doc.attribute(link, "href") else {
            tracing::debug!(link, "nav link without href");
            return;
        };
        self.scroll_to_fragment(&href);
    }

    /// Scroll so the element named by `href` (`"#id"`) sits just below the
    /// header.  Returns `false` when there is no such element.
    pub fn scroll_to_fragment(&mut self, href: &str) -> bool {
        let id = href.strip_prefix('#').unwrap_or(href);
        let Some(target) = self.doc.by_id(id) else {
            tracing::debug!(href, "fragment target missing; scroll skipped");
            return false;
        };
        let header_height = self
            .header
            .and_then(|h| self.doc.offset_height(h))
            .unwrap_or(0.0);
        let top = self.doc.offset_top(target).unwrap_or(0.0);
        self.smooth_scroll_to(top - header_height);
        true
    }

    pub fn scroll_to_top(&mut self) {
        self.smooth_scroll_to(0.0);
    }

    /// Smooth-scroll to `top`, natively when the document can, otherwise
    /// through the frame-driven animator.  A new request supersedes any
    /// animation already running.
    pub fn smooth_scroll_to(&mut self, top: f64) {
        if self.settings.native_smooth_scroll && self.doc.supports_smooth_scroll() {
            self.animator.cancel();
            self.pending_frames.clear();
            self.doc.smooth_scroll_to(top);
            return;
        }
        let ticket = self.animator.animate_scroll_to(
            self.doc.scroll_y(),
            top,
            self.settings.scroll_duration,
        );
        self.pending_frames.push(ticket);
    }

    // ── keyboard & window ───────────────────────────────────────

    /// Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: PageKey) -> bool {
        match key {
            PageKey::Escape => {
                self.close_menu();
                true
            }
            PageKey::Home { ctrl: true } => {
                self.scroll_to_top();
                true
            }
            PageKey::Home { ctrl: false } => false,
        }
    }

    pub fn on_resize(&mut self) {
        self.close_menu();
    }

    /// Scroll event entry point.  Returns whether the handler ran.
    pub fn on_scroll(&mut self) -> bool {
        // Observers see every scroll; only the handler below is throttled.
        self.poll_observers();
        let now = self.clock.now();
        if !self.scroll_throttle.try_acquire(now) {
            return false;
        }
        self.apply_scroll_effects();
        true
    }

    /// Button visibility, active link and header state for the current offset.
    fn apply_scroll_effects(&mut self) {
        self.update_scroll_top_visibility();
        tracker::update_active_link(&mut self.doc, self.settings.active_offset);
        self.update_header();
    }

    fn update_scroll_top_visibility(&mut self) {
        if self.doc.scroll_y() > self.settings.scroll_top_threshold {
            self.doc.add_class(self.scroll_top, SCROLL_TOP_SHOW_CLASS);
        } else {
            self.doc.remove_class(self.scroll_top, SCROLL_TOP_SHOW_CLASS);
        }
    }

    fn update_header(&mut self) {
        let Some(header) = self.header else {
            return;
        };
        let (bg, filter) = if self.doc.scroll_y() > self.settings.header_threshold {
            (HEADER_SCROLLED_BG, HEADER_SCROLLED_FILTER)
        } else {
            (HEADER_RESTING_BG, HEADER_RESTING_FILTER)
        };
        self.doc.set_style(header, "background-color", bg);
        self.doc.set_style(header, "backdrop-filter", filter);
    }

    /// Re-measure reveal targets; layout changes should call this too.
    pub fn poll_observers(&mut self) {
        for node in self.fade_observer.poll(&self.doc) {
            self.doc.add_class(node, VISIBLE_CLASS);
        }
        for node in self.reveal_observer.poll(&self.doc) {
            self.doc.set_style(node, "opacity", "1");
            self.doc.set_style(node, "transform", "translateY(0)");
        }
    }

    // ── frame driver ────────────────────────────────────────────

    /// Run one display frame: step scroll animations and timed effects.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        let mut settled = false;
        for ticket in std::mem::take(&mut self.pending_frames) {
            let Some(step) = self.animator.frame(ticket, now) else {
                continue;
            };
            self.doc.scroll_to(step.position);
            match step.next {
                Some(next) => self.pending_frames.push(next),
                None => settled = true,
            }
        }
        // The last frame can fall inside the throttle window.
        if settled {
            self.poll_observers();
            self.apply_scroll_effects();
        }

        self.step_typewriter(now);
    }

    fn step_typewriter(&mut self, now: Duration) {
        let (Some(tw), Some(title)) = (self.typewriter.as_mut(), self.hero_title) else {
            return;
        };
        for step in tw.tick(now) {
            match step {
                TypewriterStep::Begin => {
                    self.doc.set_text(title, "");
                    self.doc.set_style(title, "border-right", TITLE_CURSOR);
                }
                TypewriterStep::Append(c) => {
                    let mut text = self.doc.text(title).unwrap_or_default();
                    text.push(c);
                    self.doc.set_text(title, &text);
                }
                TypewriterStep::HideCursor => {
                    self.doc.set_style(title, "border-right", "none");
                }
            }
        }
    }
}

fn create_scroll_top_button<D: Document>(doc: &mut D) -> NodeId {
    let button = doc.append_to_body(ElementRole::ScrollTopButton);
    doc.add_class(button, SCROLL_TOP_CLASS);
    doc.set_text(button, "↑");
    doc.set_attribute(button, "aria-label", "Scroll to top");
    button
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::dom::MemoryDocument;
    use crate::core::page::Page;

    const PAGE: &str = "! Acme\n# Hello\nIntro\n## about\n* a card\n## pricing\ntext\n";

    /// header 48px; hero [0,600); about [600,1400); pricing [1400,2400).
    fn layout(doc: &mut MemoryDocument) {
        let header = doc.by_id("header").expect("header");
        doc.set_geometry(header, 0.0, 48.0);
        for (id, top, height) in [
            ("home", 0.0, 600.0),
            ("hero-content", 100.0, 200.0),
            ("hero-title", 100.0, 32.0),
            ("about", 600.0, 800.0),
            ("about-card-0", 700.0, 100.0),
            ("pricing", 1400.0, 1000.0),
        ] {
            let node = doc.by_id(id).expect("element exists");
            doc.set_geometry(node, top, height);
        }
        doc.set_document_height(2400.0);
        doc.set_viewport_height(500.0);
    }

    fn controller() -> (PageController<MemoryDocument, ManualClock>, ManualClock) {
        let page = Page::parse(PAGE).expect("valid page");
        let mut doc = MemoryDocument::from_page(&page);
        layout(&mut doc);
        let clock = ManualClock::new();
        (PageController::new(doc, clock.clone(), MotionSettings::default()), clock)
    }

    fn node(ctl: &PageController<MemoryDocument, ManualClock>, id: &str) -> NodeId {
        ctl.document().by_id(id).expect("element exists")
    }

    fn link(ctl: &PageController<MemoryDocument, ManualClock>, href: &str) -> NodeId {
        let doc = ctl.document();
        doc.by_role(ElementRole::NavLink)
            .into_iter()
            .find(|&l| doc.attribute(l, "href").as_deref() == Some(href))
            .expect("link exists")
    }

    /// Tick every 16ms until no animation is pending.
    fn run_frames(ctl: &mut PageController<MemoryDocument, ManualClock>, clock: &ManualClock) {
        for _ in 0..200 {
            ctl.tick();
            if !ctl.is_animating() {
                break;
            }
            clock.advance_ms(16);
        }
    }

    #[test]
    fn test_init_state() {
        let (ctl, _) = controller();
        let doc = ctl.document();

        let button = ctl.scroll_top_button();
        assert_eq!(doc.role(button), Some(ElementRole::ScrollTopButton));
        assert!(doc.has_class(button, SCROLL_TOP_CLASS));
        assert_eq!(doc.attribute(button, "aria-label").as_deref(), Some("Scroll to top"));
        assert!(doc.nodes[doc.body()].children.contains(&button));

        assert_eq!(tracker::active_section(doc).as_deref(), Some("home"));
        assert!(doc.has_class(node(&ctl, "about-card-0"), FADE_CLASS));
        assert!(doc.has_class(node(&ctl, "hero-content"), VISIBLE_CLASS));
        assert!(!doc.has_class(node(&ctl, "about-card-0"), VISIBLE_CLASS));

        let header = node(&ctl, "header");
        assert_eq!(doc.style(header, "backdrop-filter").as_deref(), Some("none"));

        let pricing = node(&ctl, "pricing");
        assert_eq!(doc.style(pricing, "opacity").as_deref(), Some("0"));
        assert_eq!(doc.style(pricing, "transform").as_deref(), Some("translateY(30px)"));
    }

    #[test]
    fn test_menu_toggle_and_close() {
        let (mut ctl, _) = controller();
        let toggle = node(&ctl, "nav-toggle");
        ctl.click(toggle);
        assert!(ctl.is_menu_open());
        assert!(ctl.document().has_class(toggle, TOGGLE_ACTIVE_CLASS));

        ctl.click(toggle);
        assert!(!ctl.is_menu_open());

        ctl.toggle_menu();
        ctl.on_resize();
        assert!(!ctl.is_menu_open());
        assert!(!ctl.document().has_class(toggle, TOGGLE_ACTIVE_CLASS));

        ctl.toggle_menu();
        assert!(ctl.handle_key(PageKey::Escape));
        assert!(!ctl.is_menu_open());
    }

    #[test]
    fn test_nav_link_scrolls_below_header() {
        let (mut ctl, clock) = controller();
        ctl.toggle_menu();
        ctl.click(link(&ctl, "#about"));
        assert!(!ctl.is_menu_open());
        assert!(ctl.is_animating());

        run_frames(&mut ctl, &clock);
        assert_eq!(ctl.document().scroll_y(), 600.0 - 48.0);
    }

    #[test]
    fn test_animation_midpoint() {
        let (mut ctl, clock) = controller();
        ctl.smooth_scroll_to(1000.0);
        ctl.tick(); // first frame pins the start timestamp
        clock.advance_ms(500);
        ctl.tick();
        assert!((ctl.document().scroll_y() - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_fragment_is_a_noop() {
        let (mut ctl, _) = controller();
        assert!(!ctl.scroll_to_fragment("#nowhere"));
        assert!(!ctl.is_animating());
        ctl.tick();
        assert_eq!(ctl.document().scroll_y(), 0.0);
    }

    #[test]
    fn test_second_scroll_supersedes_first() {
        let (mut ctl, clock) = controller();
        ctl.smooth_scroll_to(1800.0);
        ctl.tick();
        clock.advance_ms(300);
        ctl.tick();
        let midway = ctl.document().scroll_y();
        assert!(midway > 0.0);

        ctl.scroll_to_top();
        run_frames(&mut ctl, &clock);
        assert_eq!(ctl.document().scroll_y(), 0.0);
    }

    #[test]
    fn test_native_smooth_scroll_bypasses_animator() {
        let page = Page::parse(PAGE).expect("valid page");
        let mut doc = MemoryDocument::from_page(&page);
        layout(&mut doc);
        doc.set_smooth_scroll_support(true);
        let mut ctl = PageController::new(doc, ManualClock::new(), MotionSettings::default());

        assert!(ctl.scroll_to_fragment("#pricing"));
        assert!(!ctl.is_animating());
        assert_eq!(ctl.document().scroll_y(), 1400.0 - 48.0);
    }

    #[test]
    fn test_scroll_updates_button_header_links_and_reveals() {
        let (mut ctl, clock) = controller();
        clock.advance_ms(20);
        ctl.document_mut().scroll_to(1200.0);
        assert!(ctl.on_scroll());

        let doc = ctl.document();
        assert!(doc.has_class(ctl.scroll_top_button(), SCROLL_TOP_SHOW_CLASS));
        let header = node(&ctl, "header");
        assert_eq!(doc.style(header, "backdrop-filter").as_deref(), Some("blur(10px)"));
        assert_eq!(tracker::active_section(doc).as_deref(), Some("about"));
        let pricing = node(&ctl, "pricing");
        assert_eq!(doc.style(pricing, "opacity").as_deref(), Some("1"));
        assert_eq!(doc.style(pricing, "transform").as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_scroll_events_are_throttled() {
        let (mut ctl, clock) = controller();
        clock.advance_ms(20);
        ctl.document_mut().scroll_to(400.0);
        assert!(ctl.on_scroll());

        // Inside the 16ms window: dropped, so the button stays shown.
        ctl.document_mut().scroll_to(0.0);
        clock.advance_ms(5);
        assert!(!ctl.on_scroll());
        assert!(ctl.document().has_class(ctl.scroll_top_button(), SCROLL_TOP_SHOW_CLASS));

        clock.advance_ms(12);
        assert!(ctl.on_scroll());
        assert!(!ctl.document().has_class(ctl.scroll_top_button(), SCROLL_TOP_SHOW_CLASS));
    }

    #[test]
    fn test_observers_run_when_scroll_handler_is_throttled() {
        let (mut ctl, clock) = controller();
        let pricing = node(&ctl, "pricing");
        clock.advance_ms(20);
        ctl.document_mut().scroll_to(10.0);
        assert!(ctl.on_scroll());

        clock.advance_ms(5);
        ctl.document_mut().scroll_to(1500.0);
        assert!(!ctl.on_scroll());
        assert_eq!(ctl.document().style(pricing, "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_animation_end_refreshes_scroll_state() {
        let (mut ctl, clock) = controller();
        ctl.click(link(&ctl, "#pricing"));
        ctl.tick();
        clock.advance_ms(995);
        assert!(ctl.on_scroll());

        // The final frame lands inside the throttle window of that scroll.
        clock.advance_ms(10);
        ctl.tick();
        assert!(!ctl.is_animating());
        assert!(!ctl.on_scroll());

        let doc = ctl.document();
        assert_eq!(doc.scroll_y(), 1400.0 - 48.0);
        assert_eq!(tracker::active_section(doc).as_deref(), Some("pricing"));
        assert!(doc.has_class(ctl.scroll_top_button(), SCROLL_TOP_SHOW_CLASS));
    }

    #[test]
    fn test_ctrl_home_scrolls_to_top() {
        let (mut ctl, clock) = controller();
        ctl.document_mut().scroll_to(900.0);
        assert!(!ctl.handle_key(PageKey::Home { ctrl: false }));
        assert!(!ctl.is_animating());
        assert!(ctl.handle_key(PageKey::Home { ctrl: true }));
        run_frames(&mut ctl, &clock);
        assert_eq!(ctl.document().scroll_y(), 0.0);
    }

    #[test]
    fn test_scroll_top_button_click() {
        let (mut ctl, clock) = controller();
        ctl.document_mut().scroll_to(700.0);
        let button = ctl.scroll_top_button();
        ctl.click(button);
        run_frames(&mut ctl, &clock);
        assert_eq!(ctl.document().scroll_y(), 0.0);
    }

    #[test]
    fn test_typewriter_drives_title() {
        let (mut ctl, clock) = controller();
        let title = node(&ctl, "hero-title");
        assert!(ctl.is_busy());

        clock.advance_ms(500);
        ctl.tick();
        assert_eq!(ctl.document().text(title).as_deref(), Some(""));
        assert_eq!(
            ctl.document().style(title, "border-right").as_deref(),
            Some(TITLE_CURSOR)
        );

        clock.advance_ms(300);
        ctl.tick();
        assert_eq!(ctl.document().text(title).as_deref(), Some("Hel"));

        clock.advance_ms(5000);
        ctl.tick();
        assert_eq!(ctl.document().text(title).as_deref(), Some("Hello"));
        assert_eq!(ctl.document().style(title, "border-right").as_deref(), Some("none"));
        assert!(!ctl.is_busy());
    }
}
