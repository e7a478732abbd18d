//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the page document and turns it into cells on the
//! terminal.  The only thing it writes back is layout geometry.

pub mod layout;
pub mod nav_bar;
pub mod page_layout;
pub mod page_view;
pub mod scroll_top;
pub mod theme;
