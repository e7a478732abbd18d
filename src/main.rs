//! An interactive landing page for the terminal.
//!
//! Run the binary with a page file (or none, for the built-in demo) to browse
//! it with smooth scrolling, active-section tracking and scroll reveals.
//! Run with `--outline` to print the computed section offsets instead.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::Paragraph,
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::clock::SystemClock;
use crate::core::dom::{Document, MemoryDocument};
use crate::core::page::Page;
use crate::core::tracker;
use crate::ui::{
    layout::AppLayout,
    nav_bar::NavBar,
    page_layout::{PageLayout, HEADER_ROWS, ROW_PX},
    page_view::PageView,
    scroll_top::ScrollTopButton,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Interactive landing page in the terminal")]
struct Cli {
    /// Page file to open (defaults to the built-in demo page).
    page: Option<PathBuf>,

    /// Write the default config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,

    /// Print every section with its laid-out offsets and exit.
    #[arg(long)]
    outline: bool,

    /// Terminal width used by `--outline`.
    #[arg(long, default_value_t = 100)]
    width: u16,

    /// Terminal height used by `--outline`.
    #[arg(long, default_value_t = 40)]
    height: u16,

    /// Milliseconds between display frames.
    #[arg(long = "frame-ms", default_value_t = 16)]
    frame_ms: u64,
}

// ───────────────────────────────────────── outline ───────────

/// Lay the page out at `width` x `height` and describe where everything
/// landed, including where each nav link scrolls to.
fn print_outline(page: &Page, width: u16, height: u16) {
    let screen = AppLayout::from_area(Rect::new(0, 0, width, height));
    let mut doc = MemoryDocument::from_page(page);
    PageLayout::build(
        page,
        &mut doc,
        screen.page_area.width,
        screen.page_area.height,
    );

    let header = f64::from(HEADER_ROWS) * ROW_PX;
    println!(
        "{} ({}x{}, {}px document, {}px viewport)",
        page.brand,
        screen.page_area.width,
        screen.page_area.height,
        doc.max_scroll() + doc.viewport_height(),
        doc.viewport_height(),
    );

    for node in tracker::tracked_sections(&doc) {
        let id = doc.element_id(node).unwrap_or_default();
        let top = doc.offset_top(node).unwrap_or(0.0);
        let height = doc.offset_height(node).unwrap_or(0.0);
        let scroll_target = (top - header).clamp(0.0, doc.max_scroll());
        println!("  #{id:<16} top {top:>7}px  height {height:>7}px  link -> {scroll_target}px");
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // stdout is reserved for --outline
        .init();

    let cli = Cli::parse();

    if cli.write_config {
        let path = config::AppConfig::default().save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let page = match &cli.page {
        Some(path) => Page::load(path)?,
        None => Page::demo().context("built-in demo page failed to parse")?,
    };

    if cli.outline {
        print_outline(&page, cli.width, cli.height);
        return Ok(());
    }

    let user_config = config::AppConfig::load();
    tracing::info!(
        brand = %page.brand,
        sections = page.sections.len(),
        frame_ms = cli.frame_ms,
        "starting page preview"
    );

    // ── terminal setup ────────────────────────────────────────
    let (cols, rows) = terminal::size()?;
    let mut state = AppState::new(page, user_config, Rect::new(0, 0, cols, rows), SystemClock::new());

    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(cli.frame_ms.max(1)));

    // ── event loop ────────────────────────────────────────────
    let mut redraw = true;
    loop {
        if redraw {
            draw(&mut terminal, &state)?;
        }

        let Some(event) = events.recv().await else {
            break;
        };
        // Idle frames change nothing on screen.
        redraw = !matches!(event, AppEvent::Tick) || state.controller.is_busy();
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize(w, h) => handler::handle_resize(&mut state, w, h),
            AppEvent::Tick => handler::handle_tick(&mut state),
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Paint one frame; the header goes last so it overlays the page.
fn draw(terminal: &mut Terminal<CrosstermBackend<Stderr>>, state: &AppState) -> Result<()> {
    terminal.draw(|frame| {
        let layout = AppLayout::from_area(frame.area());
        let doc = state.document();

        frame.render_widget(
            PageView {
                layout: &state.layout,
                doc,
            },
            layout.page_area,
        );
        frame.render_widget(
            ScrollTopButton {
                doc,
                button: state.controller.scroll_top_button(),
            },
            layout.page_area,
        );

        let nav = state.nav_geometry();
        frame.render_widget(
            NavBar {
                doc,
                geometry: &nav,
                focused: state.focused_link_node(),
            },
            layout.page_area,
        );

        let status = Paragraph::new(state.status_line()).style(Theme::status_bar_style());
        frame.render_widget(status, layout.status_area);
    })?;
    Ok(())
}
