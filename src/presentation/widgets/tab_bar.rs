//! Bottom tab bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Home screen tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Swipe deck.
    #[default]
    Deck,
    /// People already liked.
    Liked,
    /// Own account profile.
    Account,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::Deck, Self::Liked, Self::Account];

    /// Returns the display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Deck => "Deck",
            Self::Liked => "Liked",
            Self::Account => "Account",
        }
    }

    /// Returns the tab icon.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Deck => "♠",
            Self::Liked => "♥",
            Self::Account => "◉",
        }
    }

    /// Returns the number key bound to the tab.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Deck => '1',
            Self::Liked => '2',
            Self::Account => '3',
        }
    }

    /// Returns the next tab, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Deck => Self::Liked,
            Self::Liked => Self::Account,
            Self::Account => Self::Deck,
        }
    }

    /// Returns the tab for a number key, if any.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::Deck),
            '2' => Some(Self::Liked),
            '3' => Some(Self::Account),
            _ => None,
        }
    }
}

/// Bottom navigation bar.
#[derive(Debug, Clone)]
pub struct TabBar {
    active: Tab,
    accent: Color,
}

impl TabBar {
    #[must_use]
    pub const fn new(active: Tab, accent: Color) -> Self {
        Self { active, accent }
    }
}

impl Widget for &TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();

        for (i, tab) in Tab::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
            }

            let label = format!(" {} {} [{}] ", tab.icon(), tab.title(), tab.key());
            let style = if tab == self.active {
                Style::default()
                    .fg(Color::Black)
                    .bg(self.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
        }

        Paragraph::new(Line::from(spans).centered()).render(area, buf);
    }
}
