//! Executive grid rendering.
//!
//! Lays executive cards out in rows and columns and scrolls to keep the
//! selected card visible.

use crate::app::App;
use crate::ui::card::{CARD_HEIGHT, CARD_WIDTH, ExecutiveCard};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};

/// Number of card columns that fit in `width` cells (at least one).
pub fn columns_for(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// Placement of cards inside the grid area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Area inside the grid border
    pub inner: Rect,
    /// Cards per row
    pub columns: usize,
    /// Rows that fit on screen
    pub visible_rows: usize,
    /// First row shown
    pub first_row: usize,
}

impl GridLayout {
    /// Compute the layout.
    ///
    /// # Arguments
    /// * `area` - Grid area, border included
    /// * `len` - Number of cards
    /// * `selected` - Selected card index
    ///
    /// # Details
    /// The selected row is kept centered where possible, without scrolling
    /// past the last row.
    pub fn new(area: Rect, len: usize, selected: usize) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let columns = columns_for(inner.width);
        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        let total_rows = len.div_ceil(columns);

        let selected_row = selected / columns;
        let first_row = selected_row
            .saturating_sub(visible_rows / 2)
            .min(total_rows.saturating_sub(visible_rows));

        Self {
            inner,
            columns,
            visible_rows,
            first_row,
        }
    }

    /// Screen area of the card at `index`, if it is visible.
    pub fn card_area(&self, index: usize) -> Option<Rect> {
        let row = index / self.columns;
        if row < self.first_row || row >= self.first_row + self.visible_rows {
            return None;
        }
        let column = (index % self.columns) as u16;
        let row = (row - self.first_row) as u16;

        let card = Rect::new(
            self.inner.x + column * CARD_WIDTH,
            self.inner.y + row * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(self.inner);

        if card.is_empty() { None } else { Some(card) }
    }

    /// Index of the card under a screen position.
    pub fn index_at(&self, len: usize, column: u16, row: u16) -> Option<usize> {
        if column < self.inner.x || row < self.inner.y {
            return None;
        }
        let grid_column = ((column - self.inner.x) / CARD_WIDTH) as usize;
        let grid_row = ((row - self.inner.y) / CARD_HEIGHT) as usize;
        if grid_column >= self.columns || grid_row >= self.visible_rows {
            return None;
        }

        let index = (self.first_row + grid_row) * self.columns + grid_column;
        let hit = self
            .card_area(index)
            .is_some_and(|card| card.contains((column, row).into()));
        (index < len && hit).then_some(index)
    }
}

/// Render the executive grid.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Cards appear in received order, left to right then top to bottom.
/// The selected card is highlighted.
pub fn render_grid(app: &App, area: Rect, buf: &mut Buffer) {
    let executives = &app.state.executives;
    let title = format!(
        "Executives {} ({})",
        app.state.year_range,
        executives.len()
    );
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .render(area, buf);

    let layout = GridLayout::new(area, executives.len(), app.selected_index);
    for (index, executive) in executives.iter().enumerate() {
        if let Some(card_area) = layout.card_area(index) {
            ExecutiveCard::new(executive, app.avatar(executive))
                .selected(index == app.selected_index)
                .render(card_area, buf);
        }
    }
}
