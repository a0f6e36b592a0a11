//! Home screen: tabbed container for deck, liked, and account.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::{ImageId, SwipeDecision};
use crate::infrastructure::AppConfig;
use crate::presentation::events::EventHandler;
use crate::presentation::ui::account_screen::AccountScreen;
use crate::presentation::ui::deck_screen::{DeckKeyResult, DeckScreen, DeckScreenState};
use crate::presentation::ui::liked_screen::{LikedKeyResult, LikedScreen, LikedScreenState};
use crate::presentation::widgets::{PhotoPicker, StatusBar, Tab, TabBar};
use crate::{NAME, VERSION};

const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(6);

/// Result of home-screen key handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeKeyResult {
    /// Exit the application.
    Quit,
    /// Fetch a fresh recommendation batch.
    RefreshDeck,
    /// Fetch the liked list.
    RefreshLiked,
    /// Export and open a photo with the system viewer.
    OpenPhoto {
        /// Cache id of the photo.
        id: ImageId,
        /// Source URL.
        url: String,
    },
    /// Event consumed.
    Consumed,
}

/// State for the home screen.
pub struct HomeScreenState {
    active_tab: Tab,
    deck: DeckScreenState,
    liked: LikedScreenState,
    account: AccountScreen,
    picker: PhotoPicker,
    status: Option<(StatusBar, Instant)>,
    accent: Color,
}

impl HomeScreenState {
    #[must_use]
    pub fn new(config: &AppConfig, picker: PhotoPicker) -> Self {
        let accent = config.theme.accent();
        let show_photos = config.ui.show_photos;

        Self {
            active_tab: Tab::Deck,
            deck: DeckScreenState::new(
                accent,
                show_photos,
                config.ui.nudge_step,
                config.ui.enable_animations,
            ),
            liked: LikedScreenState::new(accent, show_photos),
            account: AccountScreen::new(config.profile.clone(), accent),
            picker,
            status: None,
            accent,
        }
    }

    #[must_use]
    pub const fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Mutable access to the deck state.
    pub const fn deck_mut(&mut self) -> &mut DeckScreenState {
        &mut self.deck
    }

    /// Mutable access to the liked state.
    pub const fn liked_mut(&mut self) -> &mut LikedScreenState {
        &mut self.liked
    }

    /// Shows a transient status message.
    pub fn set_status(&mut self, status: StatusBar) {
        self.status = Some((status, Instant::now()));
    }

    /// Advances animations and expires stale status messages.
    pub fn tick(&mut self, dt: Duration) {
        self.deck.tick(dt);

        let expired = self
            .status
            .as_ref()
            .is_some_and(|(_, shown_at)| shown_at.elapsed() > STATUS_MESSAGE_TTL);
        if expired {
            self.status = None;
        }
    }

    /// Takes the next committed swipe decision.
    pub fn take_completed_swipe(&mut self) -> Option<SwipeDecision> {
        self.deck.take_completed_swipe()
    }

    /// Returns true once when the exhausted deck should auto-refill.
    pub fn take_refill_request(&mut self) -> bool {
        self.deck.take_refill_request()
    }

    /// Photos the visible screen wants loaded.
    pub fn photo_requests(&mut self) -> Vec<(ImageId, String)> {
        match self.active_tab {
            Tab::Deck => self.deck.photo_requests(),
            Tab::Liked => self.liked.photo_requests(),
            Tab::Account => self.account.photo_requests(),
        }
    }

    /// Fans a finished photo load out to every screen that tracks it.
    pub fn on_photo_loaded(
        &mut self,
        id: &ImageId,
        result: &Result<std::sync::Arc<image::DynamicImage>, String>,
    ) {
        self.deck.on_photo_loaded(id, result.clone());
        self.liked.on_photo_loaded(id, result.clone());
        self.account.on_photo_loaded(id, result.clone());
    }

    /// Handles a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> HomeKeyResult {
        if EventHandler::is_quit_event(&key) {
            return HomeKeyResult::Quit;
        }

        match key.code {
            KeyCode::Tab => {
                return self.switch_to(self.active_tab.next());
            }
            KeyCode::Char(c) => {
                if let Some(tab) = Tab::from_key(c) {
                    return self.switch_to(tab);
                }
            }
            _ => {}
        }

        match self.active_tab {
            Tab::Deck => match self.deck.handle_key(key) {
                DeckKeyResult::Refresh => HomeKeyResult::RefreshDeck,
                DeckKeyResult::OpenPhoto { id, url } => HomeKeyResult::OpenPhoto { id, url },
                DeckKeyResult::Consumed => HomeKeyResult::Consumed,
            },
            Tab::Liked => match self.liked.handle_key(key) {
                LikedKeyResult::Refresh => HomeKeyResult::RefreshLiked,
                LikedKeyResult::Consumed => HomeKeyResult::Consumed,
            },
            Tab::Account => HomeKeyResult::Consumed,
        }
    }

    fn switch_to(&mut self, tab: Tab) -> HomeKeyResult {
        self.active_tab = tab;
        if tab == Tab::Liked && self.liked.take_initial_load() {
            return HomeKeyResult::RefreshLiked;
        }
        HomeKeyResult::Consumed
    }

    /// Handles a mouse event on the active tab.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.active_tab == Tab::Deck {
            self.deck.handle_mouse(event);
        }
    }

    fn header_line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled(
                format!(" ♦ {NAME} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(self.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" v{VERSION}"), Style::default().fg(Color::DarkGray)),
        ];

        if self.active_tab == Tab::Deck {
            let remaining = self.deck.remaining();
            if remaining > 0 {
                spans.push(Span::styled(
                    format!("   {remaining} in deck"),
                    Style::default().fg(Color::Gray),
                ));
            }
        }

        Line::from(spans)
    }

    fn status_bar(&self) -> StatusBar {
        if let Some((ref status, _)) = self.status {
            return status.clone();
        }

        let hint = match self.active_tab {
            Tab::Deck => "←/→ swipe · x nope · f like · j/k photos · o open · r refresh · q quit",
            Tab::Liked => "j/k select · r refresh · q quit",
            Tab::Account => "Tab switch · q quit",
        };
        StatusBar::info("").hint(hint)
    }
}

/// Stateful widget rendering the home screen.
pub struct HomeScreen;

impl HomeScreen {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulWidget for HomeScreen {
    type State = HomeScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let [header_area, content_area, tabs_area, status_area] = layout.areas(area);

        Paragraph::new(state.header_line()).render(header_area, buf);

        match state.active_tab {
            Tab::Deck => {
                DeckScreen::new(&state.picker).render(content_area, buf, &mut state.deck);
            }
            Tab::Liked => {
                LikedScreen::new(&state.picker).render(content_area, buf, &mut state.liked);
            }
            Tab::Account => {
                let HomeScreenState {
                    ref mut account,
                    ref picker,
                    ..
                } = *state;
                account.render(picker, content_area, buf);
            }
        }

        (&TabBar::new(state.active_tab, state.accent)).render(tabs_area, buf);
        (&state.status_bar()).render(status_area, buf);
    }
}
