//! Status views: loading, error with retry, empty list, and the status bar.

use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

const RETRY_LABEL: &str = "[ Retry ]";

const DEFAULT_HINT: &str =
    "q quit · p past · arrows/hjkl move · m mail · i LinkedIn · r retry on error";

/// Render the loading view.
pub fn render_loading(area: Rect, buf: &mut Buffer) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let line = Line::from(Span::styled(
        "Loading executives...",
        Style::default().fg(Color::Yellow),
    ));
    Block::default().borders(Borders::ALL).render(area, buf);
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(vertical_center(inner, 1), buf);
}

/// Area of the error view's retry button.
///
/// # Arguments
/// * `area` - Area the error view is rendered in
///
/// # Returns
/// * `Rect` - One-line button area, centered below the middle of the view
pub fn retry_button_area(area: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if inner.is_empty() {
        return Rect::new(inner.x, inner.y, 0, 0);
    }
    let width = (RETRY_LABEL.chars().count() as u16).min(inner.width);
    let x = inner.x + (inner.width - width) / 2;
    let y = (inner.y + inner.height / 2 + 1).min(inner.bottom() - 1);
    Rect::new(x, y, width, 1)
}

/// Render the error view.
///
/// # Arguments
/// * `message` - User-facing error message
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Shows the message above a retry button. Activating the button is handled
/// by the event loop (the `r` key or a click inside `retry_button_area`).
pub fn render_error(message: &str, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title("Error")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.is_empty() {
        return;
    }

    let button = retry_button_area(area);

    // Message sits directly above the button, growing upward when it wraps.
    let message_height = button.y.saturating_sub(inner.y).saturating_sub(1);
    let needed = (message.chars().count() as u16).div_ceil(inner.width.max(1));
    let pad = message_height.saturating_sub(needed);
    let message_area = Rect::new(inner.x, inner.y + pad, inner.width, message_height - pad);
    Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(Color::Red),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(message_area, buf);

    Paragraph::new(Line::from(Span::styled(
        RETRY_LABEL,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    )))
    .render(button, buf);

    if button.bottom() < inner.bottom() {
        let hint_area = Rect::new(inner.x, button.bottom(), inner.width, 1);
        Paragraph::new(Line::from(Span::styled(
            "press 'r' to retry",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center)
        .render(hint_area, buf);
    }
}

/// Render the empty-list view.
pub fn render_empty(year_range: &str, area: Rect, buf: &mut Buffer) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    Block::default()
        .title(format!("Executives {}", year_range))
        .borders(Borders::ALL)
        .render(area, buf);
    Paragraph::new(Line::from(Span::styled(
        format!("No executives found for {}", year_range),
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center)
    .render(vertical_center(inner, 1), buf);
}

/// Render the status bar.
///
/// # Details
/// Shows the year range, executive count, last update time, and either the
/// latest status message or the key hints.
pub fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
    let mut summary = format!(
        "{} · {} executives",
        app.state.year_range,
        app.state.executives.len()
    );
    if let Some(updated) = app.last_updated {
        summary.push_str(&format!(" · updated {}", updated.format("%H:%M:%S")));
    }

    let line = Line::from(vec![
        Span::styled(summary, Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.status_message.as_deref().unwrap_or(DEFAULT_HINT)),
    ]);

    Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .render(area, buf);
}

fn vertical_center(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect::new(
        area.x,
        area.y + (area.height - height) / 2,
        area.width,
        height,
    )
}
