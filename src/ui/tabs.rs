//! Tabs widget rendering.
//!
//! Displays the session tabs. The current-session tab is shown as unavailable.

use crate::app::{App, Tab};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const TABS: [Tab; 2] = [Tab::Current, Tab::Past];

/// Split the tab bar's inner area into one slot per tab.
fn tab_slots(area: Rect) -> Vec<(Tab, Rect)> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);
    TABS.iter().copied().zip(slots.iter().copied()).collect()
}

/// Tab under a screen position, if any.
pub fn tab_at(area: Rect, column: u16, row: u16) -> Option<Tab> {
    tab_slots(area)
        .into_iter()
        .find(|(_, slot)| slot.contains((column, row).into()))
        .map(|(tab, _)| tab)
}

/// Render the tabs widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Highlights the active tab. Tabs that cannot be selected are dimmed and
/// marked unavailable.
pub fn render_tabs(app: &App, area: Rect, buf: &mut Buffer) {
    let active_tab = app.state.active_tab;

    Block::default()
        .title(format!("Session {}", app.state.year_range))
        .borders(Borders::ALL)
        .render(area, buf);

    for (tab, slot) in tab_slots(area) {
        let (text, style) = if tab == active_tab {
            (
                format!("▶ {} ◀", tab.label()),
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )
        } else if !tab.is_selectable() {
            (
                format!("{} (unavailable)", tab.label()),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (format!("  {}  ", tab.label()), Style::default().fg(Color::Gray))
        };

        Paragraph::new(Line::from(Span::styled(text, style)))
            .alignment(Alignment::Center)
            .render(slot, buf);
    }
}
