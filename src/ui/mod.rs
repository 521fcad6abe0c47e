//! UI components module.
//!
//! Contains ratatui widgets for displaying the application interface.

pub mod card;
pub mod grid;
pub mod status;
pub mod tabs;

pub use card::{ContactLink, contact_links};
pub use grid::{GridLayout, columns_for, render_grid};
pub use status::{
    render_empty, render_error, render_loading, render_status_bar, retry_button_area,
};
pub use tabs::{render_tabs, tab_at};
