//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Informational.
    Info,
    /// Success.
    Success,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// One-line status bar: message on the left, key hints on the right.
#[derive(Debug, Clone)]
pub struct StatusBar {
    message: String,
    hint: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates info status bar.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: String::new(),
            level: StatusLevel::Info,
        }
    }

    /// Creates success status bar.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::info(message).level(StatusLevel::Success)
    }

    /// Creates warning status bar.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::info(message).level(StatusLevel::Warning)
    }

    /// Creates error status bar.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::info(message).level(StatusLevel::Error)
    }

    /// Sets status level.
    #[must_use]
    pub fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets right-aligned key hints.
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let message_style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);

        let width = area.width as usize;
        let used = self.message.width() + self.hint.width();
        let padding = width.saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(&self.message, message_style),
            Span::raw(" ".repeat(padding)),
            Span::styled(&self.hint, Style::default().fg(Color::DarkGray)),
        ]);

        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_colors() {
        assert_eq!(StatusLevel::Info.color(), Color::Cyan);
        assert_eq!(StatusLevel::Error.color(), Color::Red);
    }

    #[test]
    fn test_render_places_hint_right() {
        let bar = StatusBar::info("ready").hint("q quit");
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        (&bar).render(area, &mut buf);

        let mut text = String::new();
        for x in 0..area.width {
            text.push_str(buf[(x, 0)].symbol());
        }
        assert!(text.starts_with("ready"));
        assert!(text.trim_end().ends_with("q quit"));
    }
}
