//! Input handling: maps terminal events onto page behaviours.
//!
//! Every handler ends by forwarding a pending document scroll to the
//! controller, the way a browser fires `scroll` after the viewport moves.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::state::AppState;
use crate::config::Action;
use crate::core::clock::Clock;
use crate::core::controller::PageKey;
use crate::core::dom::{Document, ElementRole};
use crate::ui::layout::{point_in_rect, AppLayout};
use crate::ui::page_layout::{HEADER_ROWS, ROW_PX};
use crate::ui::scroll_top;

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: f64 = 3.0;

pub fn handle_key<C: Clock>(state: &mut AppState<C>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;

    match action {
        Action::ScrollUp => scroll_by(state, -ROW_PX),
        Action::ScrollDown => scroll_by(state, ROW_PX),
        Action::PageUp => scroll_by(state, -page_step(state)),
        Action::PageDown => scroll_by(state, page_step(state)),
        Action::NextLink => cycle_link(state, true),
        Action::PrevLink => cycle_link(state, false),
        Action::FollowLink => follow_focused_link(state),
        Action::ToggleMenu => {
            if state.is_mobile() {
                state.controller.toggle_menu();
            } else {
                state.status_message = Some(format!(
                    "Menu collapses below {} columns",
                    state.config.mobile_breakpoint
                ));
            }
        }
        Action::CloseMenu => {
            state.controller.handle_key(PageKey::Escape);
        }
        Action::ScrollToTop => {
            state.controller.handle_key(PageKey::Home { ctrl: true });
        }
        Action::Quit => state.should_quit = true,
    }

    dispatch_scroll_event(state);
}

pub fn handle_mouse<C: Clock>(state: &mut AppState<C>, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => click_at(state, mouse.column, mouse.row),
        MouseEventKind::ScrollUp => scroll_by(state, -WHEEL_ROWS * ROW_PX),
        MouseEventKind::ScrollDown => scroll_by(state, WHEEL_ROWS * ROW_PX),
        _ => {}
    }
    dispatch_scroll_event(state);
}

pub fn handle_resize<C: Clock>(state: &mut AppState<C>, width: u16, height: u16) {
    state.relayout(Rect::new(0, 0, width, height));
    state.controller.on_resize();
    dispatch_scroll_event(state);
}

/// One display frame.
pub fn handle_tick<C: Clock>(state: &mut AppState<C>) {
    state.controller.tick();
    dispatch_scroll_event(state);
}

/// Forward a viewport move to the controller's scroll handler.
fn dispatch_scroll_event<C: Clock>(state: &mut AppState<C>) {
    if state.controller.document_mut().take_scroll_event() {
        state.controller.on_scroll();
    }
}

fn click_at<C: Clock>(state: &mut AppState<C>, col: u16, row: u16) {
    let nav = state.nav_geometry();
    if let Some(node) = nav.hit(col, row) {
        if state.document().role(node) == Some(ElementRole::NavLink) {
            state.focused_link = state.nav_links().iter().position(|&l| l == node);
        }
        state.controller.click(node);
        return;
    }
    if nav.covers(col, row) {
        return;
    }

    let page_area = AppLayout::from_area(state.area).page_area;
    let button = state.controller.scroll_top_button();
    let hit = scroll_top::button_rect(page_area, state.document(), button)
        .is_some_and(|rect| point_in_rect(rect, col, row));
    if hit {
        state.controller.click(button);
    }
}

fn scroll_by<C: Clock>(state: &mut AppState<C>, delta: f64) {
    let doc = state.controller.document_mut();
    let y = doc.scroll_y();
    doc.scroll_to(y + delta);
}

/// A page-sized step that keeps the row under the header in view.
fn page_step<C: Clock>(state: &AppState<C>) -> f64 {
    let header = f64::from(HEADER_ROWS) * ROW_PX;
    (state.document().viewport_height() - header).max(ROW_PX)
}

fn cycle_link<C: Clock>(state: &mut AppState<C>, forward: bool) {
    let count = state.nav_links().len();
    if count == 0 {
        return;
    }
    state.focused_link = Some(match (state.focused_link, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(i), true) => (i + 1) % count,
        (Some(i), false) => (i + count - 1) % count,
    });
}

fn follow_focused_link<C: Clock>(state: &mut AppState<C>) {
    match state.focused_link_node() {
        Some(link) => state.controller.click(link),
        None => state.status_message = Some("No link focused (Tab to pick one)".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::clock::ManualClock;
    use crate::core::controller::SCROLL_TOP_SHOW_CLASS;
    use crate::core::page::Page;
    use crate::core::tracker;

    type TestState = AppState<ManualClock>;

    fn state_with(width: u16, native_scroll: bool) -> (TestState, ManualClock) {
        let mut config = AppConfig::default();
        config.motion.native_smooth_scroll = native_scroll;
        let page = Page::demo().expect("demo page");
        let clock = ManualClock::new();
        let state = AppState::new(page, config, Rect::new(0, 0, width, 30), clock.clone());
        (state, clock)
    }

    fn press(state: &mut TestState, code: KeyCode, modifiers: KeyModifiers) {
        handle_key(state, KeyEvent::new(code, modifiers));
    }

    fn click(state: &mut TestState, col: u16, row: u16) {
        handle_mouse(
            state,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: col,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn section_top(state: &TestState, id: &str) -> f64 {
        let doc = state.document();
        doc.by_id(id).and_then(|n| doc.offset_top(n)).expect("section exists")
    }

    #[test]
    fn test_line_and_page_scrolling() {
        let (mut state, _) = state_with(100, false);
        press(&mut state, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(state.document().scroll_y(), ROW_PX);
        press(&mut state, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(state.document().scroll_y(), ROW_PX + page_step(&state));
        press(&mut state, KeyCode::PageUp, KeyModifiers::NONE);
        press(&mut state, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(state.document().scroll_y(), 0.0);
    }

    #[test]
    fn test_clicking_a_link_scrolls_under_the_header() {
        let (mut state, _) = state_with(100, true);
        let nav = state.nav_geometry();
        let (rect, link) = nav.links[1];
        assert_eq!(state.document().attribute(link, "href").as_deref(), Some("#about"));

        click(&mut state, rect.x, rect.y);
        let header = f64::from(HEADER_ROWS) * ROW_PX;
        assert_eq!(state.document().scroll_y(), section_top(&state, "about") - header);
        assert_eq!(state.focused_link, Some(1));
        assert_eq!(tracker::active_section(state.document()).as_deref(), Some("about"));
    }

    #[test]
    fn test_keyboard_link_focus_and_follow() {
        let (mut state, _) = state_with(100, false);
        press(&mut state, KeyCode::Enter, KeyModifiers::NONE);
        assert!(state.status_message.is_some());

        press(&mut state, KeyCode::BackTab, KeyModifiers::SHIFT);
        let last = state.nav_links().len() - 1;
        assert_eq!(state.focused_link, Some(last));
        press(&mut state, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(state.focused_link, Some(0));
        press(&mut state, KeyCode::Tab, KeyModifiers::NONE);

        press(&mut state, KeyCode::Enter, KeyModifiers::NONE);
        assert!(state.controller.is_animating());
    }

    #[test]
    fn test_mobile_menu_toggle_escape_and_resize() {
        let (mut state, _) = state_with(60, false);
        assert!(state.is_mobile());

        let (rect, _) = state.nav_geometry().toggle.expect("toggle shown");
        click(&mut state, rect.x, rect.y);
        assert!(state.controller.is_menu_open());
        assert_eq!(state.nav_geometry().links.len(), state.nav_links().len());

        press(&mut state, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!state.controller.is_menu_open());

        press(&mut state, KeyCode::Char('m'), KeyModifiers::NONE);
        assert!(state.controller.is_menu_open());
        handle_resize(&mut state, 120, 40);
        assert!(!state.controller.is_menu_open());
        assert!(!state.is_mobile());
    }

    #[test]
    fn test_toggle_key_is_ignored_on_wide_terminals() {
        let (mut state, _) = state_with(100, false);
        press(&mut state, KeyCode::Char('m'), KeyModifiers::NONE);
        assert!(!state.controller.is_menu_open());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_scroll_top_button_appears_and_works() {
        let (mut state, clock) = state_with(100, true);
        let button = state.controller.scroll_top_button();
        assert!(!state.document().has_class(button, SCROLL_TOP_SHOW_CLASS));

        for _ in 0..10 {
            clock.advance_ms(20);
            handle_mouse(
                &mut state,
                MouseEvent {
                    kind: MouseEventKind::ScrollDown,
                    column: 10,
                    row: 10,
                    modifiers: KeyModifiers::NONE,
                },
            );
        }
        assert!(state.document().has_class(button, SCROLL_TOP_SHOW_CLASS));

        let page_area = AppLayout::from_area(state.area).page_area;
        let rect = scroll_top::button_rect(page_area, state.document(), button)
            .expect("button visible");
        click(&mut state, rect.x, rect.y);
        assert_eq!(state.document().scroll_y(), 0.0);
    }

    #[test]
    fn test_ctrl_home_starts_animation_and_quit() {
        let (mut state, _) = state_with(100, false);
        press(&mut state, KeyCode::PageDown, KeyModifiers::NONE);
        press(&mut state, KeyCode::Home, KeyModifiers::CONTROL);
        assert!(state.controller.is_animating());

        press(&mut state, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(state.should_quit);
    }
}
