//! Executive card widget.
//!
//! Renders one executive as a bordered card: avatar, name, position, ID,
//! session, and contact links.

use crate::app::Avatar;
use crate::executives::Executive;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Card width in cells, borders included.
pub const CARD_WIDTH: u16 = 36;

/// Card height in cells, borders included.
pub const CARD_HEIGHT: u16 = 8;

/// A way to contact an executive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactLink<'a> {
    /// `mailto:` link, always present
    Mail(String),
    /// LinkedIn profile, present only when the record has one
    LinkedIn(&'a str),
}

impl ContactLink<'_> {
    /// Glyph drawn on the card.
    pub fn icon(&self) -> &'static str {
        match self {
            ContactLink::Mail(_) => "✉",
            ContactLink::LinkedIn(_) => "in",
        }
    }

    /// Name used in status messages.
    pub fn label(&self) -> &'static str {
        match self {
            ContactLink::Mail(_) => "Mail",
            ContactLink::LinkedIn(_) => "LinkedIn",
        }
    }

    /// Link target handed to the opener.
    pub fn url(&self) -> &str {
        match self {
            ContactLink::Mail(url) => url,
            ContactLink::LinkedIn(url) => url,
        }
    }
}

/// Contact links shown on an executive's card, mail first.
pub fn contact_links(executive: &Executive) -> Vec<ContactLink<'_>> {
    let mut links = vec![ContactLink::Mail(executive.mailto())];
    if let Some(url) = executive.linkedin() {
        links.push(ContactLink::LinkedIn(url));
    }
    links
}

/// Card widget for one executive.
#[derive(Debug, Clone)]
pub struct ExecutiveCard<'a> {
    executive: &'a Executive,
    avatar: Avatar<'a>,
    selected: bool,
}

impl<'a> ExecutiveCard<'a> {
    pub fn new(executive: &'a Executive, avatar: Avatar<'a>) -> Self {
        Self {
            executive,
            avatar,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for ExecutiveCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let executive = self.executive;

        let avatar_line = match self.avatar {
            Avatar::Loading => Line::from(Span::styled(
                "◌ loading photo…",
                Style::default().fg(Color::DarkGray),
            )),
            Avatar::Image(url) => Line::from(vec![
                Span::styled("◉ ", Style::default().fg(Color::Cyan)),
                Span::styled(url, Style::default().fg(Color::DarkGray)),
            ]),
        };

        let mut contact_spans = Vec::new();
        for (i, link) in contact_links(executive).iter().enumerate() {
            if i > 0 {
                contact_spans.push(Span::raw("  "));
            }
            contact_spans.push(Span::styled(
                format!("[{}] {}", link.icon(), link.label()),
                Style::default().fg(Color::Green),
            ));
        }

        let lines = vec![
            avatar_line,
            Line::from(Span::styled(
                &executive.name,
                Style::default()
                    .fg(if self.selected {
                        Color::Yellow
                    } else {
                        Color::White
                    })
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                &executive.position,
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                format!("ID: {}", executive.student_id),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("Session: {}", executive.session),
                Style::default().fg(Color::Magenta),
            )),
            Line::from(contact_spans),
        ];

        let border_style = if self.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        Widget::render(paragraph, area, buf);
    }
}
