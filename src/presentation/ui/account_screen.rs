//! Account screen.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};
use ratatui_image::{Resize, StatefulImage};

use crate::domain::entities::{ImageId, Profile};
use crate::presentation::widgets::{CardPhoto, PhotoPicker};

/// Static account profile screen.
pub struct AccountScreen {
    profile: Profile,
    photo: Option<CardPhoto>,
    accent: Color,
}

impl AccountScreen {
    #[must_use]
    pub fn new(profile: Profile, accent: Color) -> Self {
        let photo = profile
            .photo_url()
            .map(|url| CardPhoto::new(ImageId::from_url(url), url.to_string()));

        Self {
            profile,
            photo,
            accent,
        }
    }

    /// Returns the profile shown.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Photo to load, if any. Marks it downloading.
    pub fn photo_requests(&mut self) -> Vec<(ImageId, String)> {
        match self.photo {
            Some(ref mut photo) if photo.needs_load() => {
                photo.set_downloading();
                vec![(photo.id.clone(), photo.url.clone())]
            }
            _ => Vec::new(),
        }
    }

    /// Applies a finished photo load.
    pub fn on_photo_loaded(
        &mut self,
        id: &ImageId,
        result: Result<std::sync::Arc<image::DynamicImage>, String>,
    ) {
        if let Some(ref mut photo) = self.photo
            && photo.id == *id
        {
            match result {
                Ok(image) => photo.set_loaded(image),
                Err(error) => photo.set_failed(error),
            }
        }
    }

    /// Renders the screen; the picker builds photo protocols lazily.
    pub fn render(&mut self, picker: &PhotoPicker, area: Rect, buf: &mut Buffer) {
        let width = 50.min(area.width.saturating_sub(4)).max(20);
        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ]);
        let [_, center, _] = horizontal.areas(area);

        let layout = Layout::vertical([Constraint::Length(12), Constraint::Fill(1)]);
        let [photo_area, details_area] = layout.areas(center);

        self.render_photo(picker, photo_area, buf);
        self.render_details(details_area, buf);
    }

    fn render_photo(&mut self, picker: &PhotoPicker, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.accent));
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(ref mut photo) = self.photo {
            photo.update_protocol_if_needed(picker.picker());
            if let Some(ref mut protocol) = photo.protocol {
                let widget = StatefulImage::default().resize(Resize::Fit(None));
                ratatui::widgets::StatefulWidget::render(widget, inner, buf, protocol);
                return;
            }
        }

        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ]);
        let [_, middle, _] = vertical.areas(inner);
        Paragraph::new("◉")
            .style(Style::default().fg(Color::DarkGray))
            .centered()
            .render(middle, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                self.profile.headline(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                self.profile.location().to_string(),
                Style::default().fg(Color::Gray),
            ))
            .centered(),
            Line::from(""),
            Line::from(Span::styled(
                "About Me",
                Style::default()
                    .fg(self.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.profile.bio().to_string(),
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_request_only_with_url() {
        let mut screen = AccountScreen::new(Profile::default(), Color::Red);
        assert!(screen.photo_requests().is_empty());

        let profile = Profile::default().with_photo_url("https://example.com/me.jpg");
        let mut screen = AccountScreen::new(profile, Color::Red);

        assert_eq!(screen.photo_requests().len(), 1);
        // Marked downloading, not re-requested.
        assert!(screen.photo_requests().is_empty());
    }

    #[test]
    fn test_render_shows_profile_details() {
        let mut screen = AccountScreen::new(Profile::default(), Color::Red);
        let picker = PhotoPicker::halfblocks();
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);

        screen.render(&picker, area, &mut buf);

        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf[(x, y)].symbol());
            }
        }
        assert!(text.contains("John Doe, 28"));
        assert!(text.contains("About Me"));
    }
}
