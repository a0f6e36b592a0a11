//! Profile card widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};
use ratatui_image::{Resize, StatefulImage};
use ratatui_image::protocol::StatefulProtocol;
use unicode_width::UnicodeWidthStr;

use crate::domain::entities::Person;

const INFO_HEIGHT: u16 = 4;

/// A person's card: photo on top, identity strip at the bottom, and the
/// LIKE / NOPE stamp once a swipe is underway.
pub struct ProfileCard<'a> {
    person: &'a Person,
    photo: Option<&'a mut StatefulProtocol>,
    photo_placeholder: &'a str,
    /// Signed threshold ratio: negative leans dislike, positive like.
    stamp_ratio: f32,
    photo_index: usize,
    accent: Color,
    dimmed: bool,
}

impl<'a> ProfileCard<'a> {
    #[must_use]
    pub fn new(person: &'a Person) -> Self {
        Self {
            person,
            photo: None,
            photo_placeholder: "",
            stamp_ratio: 0.0,
            photo_index: 0,
            accent: Color::Red,
            dimmed: false,
        }
    }

    #[must_use]
    pub fn photo(mut self, protocol: &'a mut StatefulProtocol) -> Self {
        self.photo = Some(protocol);
        self
    }

    #[must_use]
    pub fn photo_placeholder(mut self, text: &'a str) -> Self {
        self.photo_placeholder = text;
        self
    }

    #[must_use]
    pub const fn stamp_ratio(mut self, ratio: f32) -> Self {
        self.stamp_ratio = ratio;
        self
    }

    #[must_use]
    pub const fn photo_index(mut self, index: usize) -> Self {
        self.photo_index = index;
        self
    }

    #[must_use]
    pub const fn accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    /// Renders the card as the peeking background of the stack.
    #[must_use]
    pub const fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    fn render_photo_area(&mut self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        if let Some(protocol) = self.photo.take() {
            let widget = StatefulImage::default().resize(Resize::Fit(None));
            ratatui::widgets::StatefulWidget::render(widget, area, buf, protocol);
        } else {
            let vertical = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ]);
            let [_, middle, _] = vertical.areas(area);
            Paragraph::new(self.photo_placeholder)
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .render(middle, buf);
        }

        self.render_photo_dots(area, buf);
        self.render_stamp(area, buf);
    }

    fn render_photo_dots(&self, area: Rect, buf: &mut Buffer) {
        let count = self.person.pictures().len();
        if count < 2 || area.height == 0 {
            return;
        }

        let dots: Vec<Span> = (0..count)
            .map(|i| {
                if i == self.photo_index {
                    Span::styled("●", Style::default().fg(Color::White))
                } else {
                    Span::styled("○", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();

        let line = Line::from(dots).centered();
        let dots_area = Rect::new(area.x, area.y, area.width, 1);
        Paragraph::new(line).render(dots_area, buf);
    }

    fn render_stamp(&self, area: Rect, buf: &mut Buffer) {
        if self.dimmed || self.stamp_ratio.abs() < 0.05 || area.height < 2 {
            return;
        }

        let committed = self.stamp_ratio.abs() >= 1.0;
        let (text, color, x) = if self.stamp_ratio > 0.0 {
            ("LIKE", Color::Green, area.x + 2)
        } else {
            let label = "NOPE";
            let x = area
                .x
                .saturating_add(area.width.saturating_sub(label.width() as u16 + 2));
            (label, Color::Red, x)
        };

        let mut style = Style::default().fg(color);
        if committed {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }

        let stamp_area = Rect::new(x, area.y + 1, text.width() as u16, 1);
        Paragraph::new(Span::styled(text, style)).render(stamp_area, buf);
    }

    fn render_info_area(&self, area: Rect, buf: &mut Buffer) {
        let name_style = if self.dimmed {
            Style::default().fg(Color::Gray)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };

        let mut lines = vec![
            Line::from(Span::styled(
                "● Active now",
                Style::default().fg(Color::Green),
            )),
            Line::from(Span::styled(self.person.headline(), name_style)),
            Line::from(vec![
                Span::styled("⌖ ", Style::default().fg(self.accent)),
                Span::styled(
                    self.person.location().to_string(),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(" · Nearby", Style::default().fg(Color::DarkGray)),
            ]),
        ];

        if self.dimmed {
            lines.remove(0);
        }

        Paragraph::new(lines).render(area, buf);
    }
}

impl Widget for ProfileCard<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let border_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(self.accent)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height <= INFO_HEIGHT {
            self.render_info_area(inner, buf);
            return;
        }

        let layout = Layout::vertical([Constraint::Fill(1), Constraint::Length(INFO_HEIGHT)]);
        let [photo_area, info_area] = layout.areas(inner);

        self.render_photo_area(photo_area, buf);
        self.render_info_area(info_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_buffer(card: ProfileCard<'_>, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        buf
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_card_shows_headline_and_location() {
        let person = Person::new(1_u64, "Maya", 27, "Berlin");
        let buf = render_to_buffer(ProfileCard::new(&person), 40, 20);

        let text = buffer_text(&buf);
        assert!(text.contains("Maya, 27"));
        assert!(text.contains("Berlin"));
    }

    #[test]
    fn test_stamp_appears_past_ratio() {
        let person = Person::new(1_u64, "Maya", 27, "Berlin");

        let buf = render_to_buffer(ProfileCard::new(&person).stamp_ratio(0.8), 40, 20);
        assert!(buffer_text(&buf).contains("LIKE"));

        let buf = render_to_buffer(ProfileCard::new(&person).stamp_ratio(-0.8), 40, 20);
        assert!(buffer_text(&buf).contains("NOPE"));
    }

    #[test]
    fn test_no_stamp_at_rest() {
        let person = Person::new(1_u64, "Maya", 27, "Berlin");
        let buf = render_to_buffer(ProfileCard::new(&person), 40, 20);

        let text = buffer_text(&buf);
        assert!(!text.contains("LIKE"));
        assert!(!text.contains("NOPE"));
    }

    #[test]
    fn test_placeholder_shown_without_photo() {
        let person = Person::new(1_u64, "Maya", 27, "Berlin");
        let buf = render_to_buffer(
            ProfileCard::new(&person).photo_placeholder("loading photo…"),
            40,
            20,
        );

        assert!(buffer_text(&buf).contains("loading photo…"));
    }
}
