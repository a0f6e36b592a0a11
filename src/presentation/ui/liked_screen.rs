//! Liked people screen.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

use crate::domain::entities::{ImageId, ImageStatus, Person};
use crate::presentation::widgets::{CardPhoto, PhotoPicker, ProfileCard};

/// Loading state of the liked list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikedLoadState {
    /// Tab not visited yet; nothing fetched.
    NotLoaded,
    /// Fetch in flight.
    Loading,
    /// List loaded.
    Ready,
    /// Fetch failed; inline message shown.
    Error(String),
}

/// Result of liked-screen key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikedKeyResult {
    /// Event consumed.
    Consumed,
    /// Re-fetch the liked list.
    Refresh,
}

/// State for the liked people screen.
pub struct LikedScreenState {
    people: Vec<Person>,
    load: LikedLoadState,
    list_state: ListState,
    photos: HashMap<ImageId, CardPhoto>,
    show_photos: bool,
    accent: Color,
}

impl LikedScreenState {
    #[must_use]
    pub fn new(accent: Color, show_photos: bool) -> Self {
        Self {
            people: Vec::new(),
            load: LikedLoadState::NotLoaded,
            list_state: ListState::default(),
            photos: HashMap::new(),
            show_photos,
            accent,
        }
    }

    /// Replaces the liked list.
    pub fn set_people(&mut self, people: Vec<Person>) {
        self.list_state
            .select(if people.is_empty() { None } else { Some(0) });
        self.people = people;
        self.load = LikedLoadState::Ready;
    }

    /// Marks the list as loading.
    pub fn set_loading(&mut self) {
        self.load = LikedLoadState::Loading;
    }

    /// Surfaces a fetch failure inline.
    pub fn set_error(&mut self, message: String) {
        self.load = LikedLoadState::Error(message);
    }

    #[must_use]
    pub fn load_state(&self) -> &LikedLoadState {
        &self.load
    }

    /// Number of liked people.
    #[must_use]
    pub fn count(&self) -> usize {
        self.people.len()
    }

    /// Returns true exactly once, when the tab is first shown.
    pub fn take_initial_load(&mut self) -> bool {
        if self.load == LikedLoadState::NotLoaded {
            self.load = LikedLoadState::Loading;
            return true;
        }
        false
    }

    /// The highlighted person.
    #[must_use]
    pub fn selected_person(&self) -> Option<&Person> {
        self.people.get(self.list_state.selected()?)
    }

    /// Handles a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> LikedKeyResult {
        match key.code {
            KeyCode::Char('r') => {
                self.set_loading();
                return LikedKeyResult::Refresh;
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_offset(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_offset(-1),
            KeyCode::Home | KeyCode::Char('g') => {
                if !self.people.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if !self.people.is_empty() {
                    self.list_state.select(Some(self.people.len() - 1));
                }
            }
            _ => {}
        }
        LikedKeyResult::Consumed
    }

    fn select_offset(&mut self, step: isize) {
        if self.people.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let last = (self.people.len() - 1) as isize;
        let next = (current + step).clamp(0, last);
        #[allow(clippy::cast_sign_loss)]
        self.list_state.select(Some(next as usize));
    }

    /// Photo the screen wants loaded: the selected person's primary picture.
    pub fn photo_requests(&mut self) -> Vec<(ImageId, String)> {
        if !self.show_photos {
            return Vec::new();
        }

        let Some(photo) = self
            .selected_person()
            .and_then(|person| CardPhoto::for_person(person, 0))
        else {
            return Vec::new();
        };

        let entry = self
            .photos
            .entry(photo.id.clone())
            .or_insert_with(|| CardPhoto::new(photo.id.clone(), photo.url.clone()));
        if entry.needs_load() {
            entry.set_downloading();
            return vec![(entry.id.clone(), entry.url.clone())];
        }
        Vec::new()
    }

    /// Applies a finished photo load.
    pub fn on_photo_loaded(
        &mut self,
        id: &ImageId,
        result: Result<std::sync::Arc<image::DynamicImage>, String>,
    ) {
        if let Some(photo) = self.photos.get_mut(id) {
            match result {
                Ok(image) => photo.set_loaded(image),
                Err(error) => photo.set_failed(error),
            }
        }
    }
}

/// Stateful widget rendering the liked list with a detail pane.
pub struct LikedScreen<'a> {
    picker: &'a PhotoPicker,
}

impl<'a> LikedScreen<'a> {
    #[must_use]
    pub const fn new(picker: &'a PhotoPicker) -> Self {
        Self { picker }
    }

    fn render_message(message: &str, style: Style, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ]);
        let [_, middle, _] = vertical.areas(area);
        Paragraph::new(Span::styled(message, style))
            .centered()
            .render(middle, buf);
    }

    fn render_list(state: &mut LikedScreenState, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" ♥ Liked ({}) ", state.people.len()));
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = state
            .people
            .iter()
            .map(|person| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        person.headline(),
                        Style::default().fg(Color::White),
                    )),
                    Line::from(Span::styled(
                        format!("  ⌖ {}", person.location()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(state.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("♥ ");

        StatefulWidget::render(list, inner, buf, &mut state.list_state);

        if state.people.len() * 2 > inner.height as usize {
            let mut scrollbar_state = ScrollbarState::new(state.people.len())
                .position(state.list_state.selected().unwrap_or(0));
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            StatefulWidget::render(scrollbar, area, buf, &mut scrollbar_state);
        }
    }

    fn render_detail(&self, state: &mut LikedScreenState, area: Rect, buf: &mut Buffer) {
        let Some(person) = state.selected_person().cloned() else {
            Self::render_message(
                "Select someone to see their profile",
                Style::default().fg(Color::DarkGray),
                area,
                buf,
            );
            return;
        };

        let photo_id = person.primary_picture().map(ImageId::from_url);

        if state.show_photos
            && let Some(ref id) = photo_id
            && let Some(photo_state) = state.photos.get_mut(id)
        {
            photo_state.update_protocol_if_needed(self.picker.picker());
        }

        let placeholder = if person.pictures().is_empty() {
            "no photos"
        } else {
            match photo_id
                .as_ref()
                .and_then(|id| state.photos.get(id))
                .map(|p| &p.status)
            {
                Some(ImageStatus::Failed(_)) => "photo unavailable",
                Some(ImageStatus::Ready) => "",
                _ => "loading photo…",
            }
        };

        let mut card = ProfileCard::new(&person)
            .accent(state.accent)
            .photo_placeholder(placeholder);

        if state.show_photos
            && let Some(ref id) = photo_id
            && let Some(photo_state) = state.photos.get_mut(id)
            && let Some(ref mut protocol) = photo_state.protocol
        {
            card = card.photo(protocol);
        }

        card.render(area, buf);
    }
}

impl StatefulWidget for LikedScreen<'_> {
    type State = LikedScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        match &state.load {
            LikedLoadState::NotLoaded | LikedLoadState::Loading => {
                Self::render_message(
                    "Loading liked people…",
                    Style::default().fg(Color::Gray),
                    area,
                    buf,
                );
                return;
            }
            LikedLoadState::Error(message) => {
                let message = format!("Error: {message}  (r: retry)");
                Self::render_message(&message, Style::default().fg(Color::Red), area, buf);
                return;
            }
            LikedLoadState::Ready => {}
        }

        if state.people.is_empty() {
            Self::render_message(
                "No liked people yet!",
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                area,
                buf,
            );
            return;
        }

        let layout =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]);
        let [list_area, detail_area] = layout.areas(area);

        Self::render_list(state, list_area, buf);
        self.render_detail(state, detail_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn people(count: u64) -> Vec<Person> {
        (1..=count)
            .map(|i| Person::new(i, format!("Person {i}"), 25, "Berlin"))
            .collect()
    }

    #[test]
    fn test_initial_load_happens_once() {
        let mut state = LikedScreenState::new(Color::Red, false);

        assert!(state.take_initial_load());
        assert!(!state.take_initial_load());
        assert_eq!(*state.load_state(), LikedLoadState::Loading);
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let mut state = LikedScreenState::new(Color::Red, false);
        state.set_people(people(3));

        assert_eq!(state.selected_person().unwrap().id().as_u64(), 1);

        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.selected_person().unwrap().id().as_u64(), 2);

        state.handle_key(key(KeyCode::Char('G')));
        assert_eq!(state.selected_person().unwrap().id().as_u64(), 3);

        // Clamped at the end.
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.selected_person().unwrap().id().as_u64(), 3);

        state.handle_key(key(KeyCode::Char('g')));
        assert_eq!(state.selected_person().unwrap().id().as_u64(), 1);
    }

    #[test]
    fn test_refresh_resets_to_loading() {
        let mut state = LikedScreenState::new(Color::Red, false);
        state.set_people(people(1));

        let result = state.handle_key(key(KeyCode::Char('r')));

        assert_eq!(result, LikedKeyResult::Refresh);
        assert_eq!(*state.load_state(), LikedLoadState::Loading);
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        let mut state = LikedScreenState::new(Color::Red, false);
        state.set_people(Vec::new());

        assert!(state.selected_person().is_none());
        state.handle_key(key(KeyCode::Char('j')));
        assert!(state.selected_person().is_none());
    }

    #[test]
    fn test_photo_request_for_selected_only_once() {
        let mut state = LikedScreenState::new(Color::Red, true);
        state.set_people(vec![
            Person::new(1_u64, "Maya", 27, "Berlin")
                .with_pictures(vec!["https://example.com/a.jpg".into()]),
        ]);

        assert_eq!(state.photo_requests().len(), 1);
        assert!(state.photo_requests().is_empty());
    }
}
