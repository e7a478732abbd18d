//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::controller::PageController;
use crate::core::dom::{Document, ElementRole, MemoryDocument, NodeId};
use crate::core::page::Page;
use crate::core::tracker;
use crate::ui::layout::AppLayout;
use crate::ui::nav_bar::NavGeometry;
use crate::ui::page_layout::PageLayout;

/// Top-level application state.  The clock is injected so input handling
/// can be driven by hand in tests.
pub struct AppState<C: Clock = SystemClock> {
    /// Parsed page; the source the layout flows from.
    pub page: Page,
    /// Owns the document and every page behaviour.
    pub controller: PageController<MemoryDocument, C>,
    /// Rows of the page at the current terminal size.
    pub layout: PageLayout,
    /// User-configurable keybindings and motion settings.
    pub config: AppConfig,
    /// Full terminal area as of the last resize.
    pub area: Rect,
    /// Index into the nav links of the keyboard-focused link.
    pub focused_link: Option<usize>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl<C: Clock> AppState<C> {
    pub fn new(page: Page, config: AppConfig, area: Rect, clock: C) -> Self {
        let mut doc = MemoryDocument::from_page(&page);
        // Jumps are the terminal's native scroll; whether they are used is
        // up to `native_scroll` in the config.
        doc.set_smooth_scroll_support(true);

        let screen = AppLayout::from_area(area);
        let layout = PageLayout::build(
            &page,
            &mut doc,
            screen.page_area.width,
            screen.page_area.height,
        );
        let controller = PageController::new(doc, clock, config.motion.clone());

        Self {
            page,
            controller,
            layout,
            config,
            area,
            focused_link: None,
            should_quit: false,
            status_message: None,
        }
    }

    /// Reflow the page for a new terminal size.
    pub fn relayout(&mut self, area: Rect) {
        self.area = area;
        let screen = AppLayout::from_area(area);
        self.layout = PageLayout::build(
            &self.page,
            self.controller.document_mut(),
            screen.page_area.width,
            screen.page_area.height,
        );
        self.controller.poll_observers();
    }

    pub fn document(&self) -> &MemoryDocument {
        self.controller.document()
    }

    /// Whether the header uses the hamburger menu at this width.
    pub fn is_mobile(&self) -> bool {
        self.area.width < self.config.mobile_breakpoint
    }

    pub fn nav_links(&self) -> Vec<NodeId> {
        self.document().by_role(ElementRole::NavLink)
    }

    pub fn focused_link_node(&self) -> Option<NodeId> {
        self.focused_link
            .and_then(|i| self.nav_links().get(i).copied())
    }

    /// Header hit boxes for the current frame.
    pub fn nav_geometry(&self) -> NavGeometry {
        let screen = AppLayout::from_area(self.area);
        NavGeometry::compute(
            screen.header_area,
            screen.page_area,
            self.document(),
            self.is_mobile(),
        )
    }

    /// Bottom bar: current section, scroll offset and key hints.
    pub fn status_line(&self) -> String {
        let section = tracker::active_section(self.document()).unwrap_or_else(|| "-".into());
        let hint = self
            .status_message
            .clone()
            .unwrap_or_else(|| self.config.status_bar_hint());
        let motion = if self.controller.is_animating() { "~" } else { " " };
        format!(
            " #{section} {motion}{:.0}px | {hint}",
            self.document().scroll_y()
        )
    }
}
