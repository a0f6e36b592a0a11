//! Swipe deck screen.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::{ImageId, ImageStatus, Person, SwipeDecision, SwipeDirection};
use crate::presentation::ui::gesture::SwipeGesture;
use crate::presentation::widgets::{CardPhoto, PhotoPicker, ProfileCard};

const CARD_MAX_WIDTH: u16 = 44;
const CARD_MIN_HEIGHT: u16 = 9;

/// Loading state of the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckLoadState {
    /// Waiting for a recommendation batch.
    Loading,
    /// Batch loaded.
    Ready,
    /// Fetch failed; inline message shown.
    Error(String),
}

/// Result of deck key handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckKeyResult {
    /// Event consumed, nothing for the orchestrator to do.
    Consumed,
    /// Re-fetch the recommendation batch.
    Refresh,
    /// Export and open the photo with the system viewer.
    OpenPhoto {
        /// Cache id of the photo.
        id: ImageId,
        /// Source URL.
        url: String,
    },
}

/// State for the swipe deck.
pub struct DeckScreenState {
    people: Vec<Person>,
    current: usize,
    photo_index: usize,
    gesture: SwipeGesture,
    load: DeckLoadState,
    photos: HashMap<ImageId, CardPhoto>,
    pending_decisions: VecDeque<SwipeDecision>,
    refill_requested: bool,
    card_area: Rect,
    drag_origin: Option<u16>,
    nudge_step: u16,
    show_photos: bool,
    accent: Color,
}

impl DeckScreenState {
    #[must_use]
    pub fn new(accent: Color, show_photos: bool, nudge_step: u16, animate: bool) -> Self {
        let mut gesture = SwipeGesture::new(CARD_MAX_WIDTH);
        gesture.set_animations_enabled(animate);

        Self {
            people: Vec::new(),
            current: 0,
            photo_index: 0,
            gesture,
            load: DeckLoadState::Loading,
            photos: HashMap::new(),
            pending_decisions: VecDeque::new(),
            refill_requested: false,
            card_area: Rect::ZERO,
            drag_origin: None,
            nudge_step: nudge_step.max(1),
            show_photos,
            accent,
        }
    }

    /// Replaces the deck with a fresh batch.
    pub fn set_deck(&mut self, people: Vec<Person>) {
        self.people = people;
        self.current = 0;
        self.photo_index = 0;
        self.gesture.reset();
        self.drag_origin = None;
        // Stale entries may be stuck in Downloading after a cancelled
        // refresh; re-requests resolve from the caches.
        self.photos.clear();
        self.load = DeckLoadState::Ready;
    }

    /// Marks the deck as loading.
    pub fn set_loading(&mut self) {
        self.load = DeckLoadState::Loading;
        self.refill_requested = false;
    }

    /// Surfaces a fetch failure inline.
    pub fn set_error(&mut self, message: String) {
        self.load = DeckLoadState::Error(message);
    }

    #[must_use]
    pub fn load_state(&self) -> &DeckLoadState {
        &self.load
    }

    /// The person on top of the deck.
    #[must_use]
    pub fn current_person(&self) -> Option<&Person> {
        self.people.get(self.current)
    }

    fn next_person(&self) -> Option<&Person> {
        self.people.get(self.current + 1)
    }

    /// Cards left in the batch, including the top one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.people.len().saturating_sub(self.current)
    }

    /// True once every card of a non-empty batch has been swiped.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.load == DeckLoadState::Ready && self.current >= self.people.len()
    }

    /// Returns true exactly once per exhausted batch, to trigger an
    /// automatic re-fetch without polling the server in a loop.
    pub fn take_refill_request(&mut self) -> bool {
        if self.is_exhausted() && !self.people.is_empty() && !self.refill_requested {
            self.refill_requested = true;
            return true;
        }
        false
    }

    /// Advances animations; a finished commit queues the swipe decision and
    /// reveals the next card.
    pub fn tick(&mut self, dt: Duration) {
        self.gesture.tick(dt);

        if let Some(direction) = self.gesture.take_completed() {
            self.complete_swipe(direction);
        }
    }

    fn complete_swipe(&mut self, direction: SwipeDirection) {
        let Some(person) = self.people.get(self.current) else {
            return;
        };

        self.pending_decisions
            .push_back(SwipeDecision::new(person.id(), direction));
        self.current += 1;
        self.photo_index = 0;
        self.gesture.reset();
        self.refill_requested = false;
    }

    /// Takes the next committed decision to send to the API.
    pub fn take_completed_swipe(&mut self) -> Option<SwipeDecision> {
        self.pending_decisions.pop_front()
    }

    /// Photos the screen wants loaded: the visible one plus the next card's
    /// first, so the reveal is instant. Marks them as downloading.
    pub fn photo_requests(&mut self) -> Vec<(ImageId, String)> {
        if !self.show_photos {
            return Vec::new();
        }

        let mut wanted = Vec::new();
        if let Some(person) = self.people.get(self.current) {
            wanted.push(CardPhoto::for_person(person, self.photo_index));
        }
        if let Some(person) = self.people.get(self.current + 1) {
            wanted.push(CardPhoto::for_person(person, 0));
        }

        let mut requests = Vec::new();
        for photo in wanted.into_iter().flatten() {
            let entry = self
                .photos
                .entry(photo.id.clone())
                .or_insert_with(|| CardPhoto::new(photo.id.clone(), photo.url.clone()));
            if entry.needs_load() {
                entry.set_downloading();
                requests.push((entry.id.clone(), entry.url.clone()));
            }
        }
        requests
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

    /// Handles a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> DeckKeyResult {
        if matches!(self.load, DeckLoadState::Error(_)) || self.is_exhausted() {
            return match key.code {
                KeyCode::Char('r') => {
                    self.set_loading();
                    DeckKeyResult::Refresh
                }
                _ => DeckKeyResult::Consumed,
            };
        }

        let has_card = self.current_person().is_some();

        match key.code {
            KeyCode::Char('r') => {
                self.set_loading();
                return DeckKeyResult::Refresh;
            }
            KeyCode::Left | KeyCode::Char('h') if has_card => {
                self.gesture.nudge(-f32::from(self.nudge_step));
            }
            KeyCode::Right | KeyCode::Char('l') if has_card => {
                self.gesture.nudge(f32::from(self.nudge_step));
            }
            KeyCode::Char('x') if has_card => {
                self.gesture.force_commit(SwipeDirection::Dislike);
            }
            KeyCode::Char('f') if has_card => {
                self.gesture.force_commit(SwipeDirection::Like);
            }
            KeyCode::Down | KeyCode::Char('j') if has_card => {
                self.cycle_photo(1);
            }
            KeyCode::Up | KeyCode::Char('k') if has_card => {
                self.cycle_photo(-1);
            }
            KeyCode::Char('o') => {
                if let Some(person) = self.current_person()
                    && let Some(url) = person.pictures().get(self.photo_index)
                {
                    return DeckKeyResult::OpenPhoto {
                        id: ImageId::from_url(url),
                        url: url.clone(),
                    };
                }
            }
            _ => {}
        }

        DeckKeyResult::Consumed
    }

    fn cycle_photo(&mut self, step: isize) {
        let Some(person) = self.current_person() else {
            return;
        };
        let count = person.pictures().len();
        if count < 2 {
            return;
        }
        let count = count as isize;
        let next = (self.photo_index as isize + step).rem_euclid(count);
        self.photo_index = next as usize;
    }

    /// Handles a mouse event (drag-to-swipe).
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.current_person().is_none() {
            return;
        }

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = self.card_area.contains(ratatui::layout::Position {
                    x: event.column,
                    y: event.row,
                });
                if inside {
                    self.drag_origin = Some(event.column);
                    self.gesture.begin_drag();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(origin) = self.drag_origin {
                    let dx = f32::from(event.column) - f32::from(origin);
                    self.gesture.drag_to(dx);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag_origin.take().is_some() {
                    self.gesture.release();
                }
            }
            _ => {}
        }
    }

    #[must_use]
    pub const fn photo_index(&self) -> usize {
        self.photo_index
    }
}

/// Stateful widget rendering the deck.
pub struct DeckScreen<'a> {
    picker: &'a PhotoPicker,
}

impl<'a> DeckScreen<'a> {
    #[must_use]
    pub const fn new(picker: &'a PhotoPicker) -> Self {
        Self { picker }
    }

    fn render_centered_lines(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(lines.len()).unwrap_or(0);
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ]);
        let [_, middle, _] = vertical.areas(area);
        Paragraph::new(lines).centered().render(middle, buf);
    }

    fn render_loading(area: Rect, buf: &mut Buffer) {
        Self::render_centered_lines(
            vec![Line::from(Span::styled(
                "Finding people near you…",
                Style::default().fg(Color::Gray),
            ))],
            area,
            buf,
        );
    }

    fn render_error(message: &str, area: Rect, buf: &mut Buffer) {
        Self::render_centered_lines(
            vec![
                Line::from(Span::styled(
                    format!("Error: {message}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "r: retry",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            area,
            buf,
        );
    }

    fn render_empty(area: Rect, buf: &mut Buffer) {
        Self::render_centered_lines(
            vec![
                Line::from(Span::styled(
                    "No more people to show!",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "r: refresh  ·  2: view liked people",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            area,
            buf,
        );
    }

    fn card_rect(area: Rect) -> Rect {
        let width = CARD_MAX_WIDTH.min(area.width.saturating_sub(4)).max(20);
        let height = area.height.saturating_sub(2).max(CARD_MIN_HEIGHT);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    /// Shifts the card horizontally, clipping whatever slides past either
    /// edge of the content area.
    fn offset_rect(base: Rect, offset: i32, bounds: Rect) -> Rect {
        let shifted_left = i32::from(base.x) + offset;
        let shifted_right = shifted_left + i32::from(base.width);

        let left = shifted_left.max(i32::from(bounds.x));
        let right = shifted_right.min(i32::from(bounds.right()));
        if right <= left {
            return Rect::ZERO;
        }

        let x = u16::try_from(left).unwrap_or(0);
        let width = u16::try_from(right - left).unwrap_or(0);
        Rect::new(x, base.y, width, base.height)
    }

    fn placeholder_for(photo: Option<&CardPhoto>, person: &Person) -> &'static str {
        if person.pictures().is_empty() {
            return "no photos";
        }
        match photo.map(|p| &p.status) {
            Some(ImageStatus::Failed(_)) => "photo unavailable",
            Some(ImageStatus::Ready) => "",
            _ => "loading photo…",
        }
    }
}

impl StatefulWidget for DeckScreen<'_> {
    type State = DeckScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        match &state.load {
            DeckLoadState::Loading => {
                Self::render_loading(area, buf);
                return;
            }
            DeckLoadState::Error(message) => {
                let message = message.clone();
                Self::render_error(&message, area, buf);
                return;
            }
            DeckLoadState::Ready => {}
        }

        if state.current_person().is_none() {
            Self::render_empty(area, buf);
            return;
        }

        let base = Self::card_rect(area);
        state.card_area = base;
        state.gesture.set_card_width(base.width);

        // Peeking card first, so the top card covers it at rest.
        if let Some(next) = state.next_person() {
            let next = next.clone();
            ProfileCard::new(&next)
                .accent(state.accent)
                .dimmed(true)
                .render(base, buf);
        }

        let offset = state.gesture.offset();
        let card_rect = Self::offset_rect(base, offset, area);
        if card_rect.width == 0 || card_rect.height == 0 {
            return;
        }

        let Some(person) = state.current_person().cloned() else {
            return;
        };
        let stamp_ratio = state.gesture.stamp_ratio();
        let photo_index = state.photo_index;
        let accent = state.accent;
        let show_photos = state.show_photos;

        let photo_url = person.pictures().get(photo_index).cloned();
        let photo_id = photo_url.as_deref().map(ImageId::from_url);

        if show_photos
            && let Some(ref id) = photo_id
            && let Some(photo_state) = state.photos.get_mut(id)
        {
            photo_state.update_protocol_if_needed(self.picker.picker());
        }

        let placeholder = {
            let photo_ref = photo_id.as_ref().and_then(|id| state.photos.get(id));
            Self::placeholder_for(photo_ref, &person)
        };

        let mut card = ProfileCard::new(&person)
            .accent(accent)
            .stamp_ratio(stamp_ratio)
            .photo_index(photo_index)
            .photo_placeholder(placeholder);

        if show_photos
            && let Some(ref id) = photo_id
            && let Some(photo_state) = state.photos.get_mut(id)
            && let Some(ref mut protocol) = photo_state.protocol
        {
            card = card.photo(protocol);
        }

        card.render(card_rect, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with_people(count: u64) -> DeckScreenState {
        let mut state = DeckScreenState::new(Color::Red, false, 2, false);
        let people = (1..=count)
            .map(|i| Person::new(i, format!("Person {i}"), 25, "Berlin"))
            .collect();
        state.set_deck(people);
        state
    }

    #[test]
    fn test_force_like_records_decision_once() {
        let mut state = state_with_people(2);

        state.handle_key(key(KeyCode::Char('f')));
        state.tick(Duration::from_millis(33));

        let decision = state.take_completed_swipe().unwrap();
        assert_eq!(decision.person_id().as_u64(), 1);
        assert_eq!(decision.direction(), SwipeDirection::Like);
        assert!(state.take_completed_swipe().is_none());

        assert_eq!(state.current_person().unwrap().id().as_u64(), 2);
    }

    #[test]
    fn test_force_dislike_records_dislike() {
        let mut state = state_with_people(1);

        state.handle_key(key(KeyCode::Char('x')));
        state.tick(Duration::from_millis(33));

        let decision = state.take_completed_swipe().unwrap();
        assert_eq!(decision.direction(), SwipeDirection::Dislike);
    }

    #[test]
    fn test_deck_exhaustion_requests_one_refill() {
        let mut state = state_with_people(1);

        state.handle_key(key(KeyCode::Char('f')));
        state.tick(Duration::from_millis(33));
        assert!(state.is_exhausted());

        assert!(state.take_refill_request());
        // Only one automatic request per exhausted batch.
        assert!(!state.take_refill_request());
    }

    #[test]
    fn test_empty_batch_does_not_auto_refill() {
        let mut state = DeckScreenState::new(Color::Red, false, 2, false);
        state.set_deck(Vec::new());

        assert!(state.is_exhausted());
        assert!(!state.take_refill_request());
    }

    #[test]
    fn test_refresh_key_resets_to_loading() {
        let mut state = state_with_people(1);

        let result = state.handle_key(key(KeyCode::Char('r')));

        assert_eq!(result, DeckKeyResult::Refresh);
        assert_eq!(*state.load_state(), DeckLoadState::Loading);
    }

    #[test]
    fn test_refresh_from_error_state() {
        let mut state = state_with_people(1);
        state.set_error("boom".into());

        assert_eq!(state.handle_key(key(KeyCode::Char('f'))), DeckKeyResult::Consumed);
        assert_eq!(state.handle_key(key(KeyCode::Char('r'))), DeckKeyResult::Refresh);
    }

    #[test]
    fn test_photo_cycling_wraps() {
        let mut state = DeckScreenState::new(Color::Red, false, 2, false);
        state.set_deck(vec![
            Person::new(1_u64, "Maya", 27, "Berlin").with_pictures(vec![
                "https://example.com/a.jpg".into(),
                "https://example.com/b.jpg".into(),
            ]),
        ]);

        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.photo_index(), 1);
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.photo_index(), 0);
        state.handle_key(key(KeyCode::Char('k')));
        assert_eq!(state.photo_index(), 1);
    }

    #[test]
    fn test_open_photo_returns_current_url() {
        let mut state = DeckScreenState::new(Color::Red, false, 2, false);
        state.set_deck(vec![
            Person::new(1_u64, "Maya", 27, "Berlin")
                .with_pictures(vec!["https://example.com/a.jpg".into()]),
        ]);

        let result = state.handle_key(key(KeyCode::Char('o')));
        assert_eq!(
            result,
            DeckKeyResult::OpenPhoto {
                id: ImageId::from_url("https://example.com/a.jpg"),
                url: "https://example.com/a.jpg".into(),
            }
        );
    }

    #[test]
    fn test_photo_requests_cover_top_and_next_card() {
        let mut state = DeckScreenState::new(Color::Red, true, 2, false);
        state.set_deck(vec![
            Person::new(1_u64, "Maya", 27, "Berlin")
                .with_pictures(vec!["https://example.com/a.jpg".into()]),
            Person::new(2_u64, "Ben", 31, "Oslo")
                .with_pictures(vec!["https://example.com/b.jpg".into()]),
        ]);

        let requests = state.photo_requests();
        assert_eq!(requests.len(), 2);

        // Requested photos are marked downloading and not re-requested.
        assert!(state.photo_requests().is_empty());
    }

    #[test]
    fn test_photos_disabled_requests_nothing() {
        let mut state = DeckScreenState::new(Color::Red, false, 2, false);
        state.set_deck(vec![
            Person::new(1_u64, "Maya", 27, "Berlin")
                .with_pictures(vec!["https://example.com/a.jpg".into()]),
        ]);

        assert!(state.photo_requests().is_empty());
    }

    #[test]
    fn test_mouse_drag_past_threshold_commits() {
        let mut state = state_with_people(2);
        state.card_area = Rect::new(10, 2, 40, 20);
        state.gesture.set_card_width(40);

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 20,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        let drag = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 35, // dx = 15 > threshold 10
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        let up = MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 35,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };

        state.handle_mouse(down);
        state.handle_mouse(drag);
        state.handle_mouse(up);
        state.tick(Duration::from_millis(33));

        let decision = state.take_completed_swipe().unwrap();
        assert_eq!(decision.direction(), SwipeDirection::Like);
    }

    #[test]
    fn test_offset_rect_clips_at_edges() {
        let bounds = Rect::new(0, 0, 80, 24);
        let base = Rect::new(20, 2, 40, 20);

        assert_eq!(DeckScreen::offset_rect(base, 0, bounds), base);

        let clipped_left = DeckScreen::offset_rect(base, -30, bounds);
        assert_eq!(clipped_left.x, 0);
        assert_eq!(clipped_left.width, 30);

        let clipped_right = DeckScreen::offset_rect(base, 30, bounds);
        assert_eq!(clipped_right.x, 50);
        assert_eq!(clipped_right.width, 30);

        assert_eq!(DeckScreen::offset_rect(base, 70, bounds), Rect::ZERO);
        assert_eq!(DeckScreen::offset_rect(base, -70, bounds), Rect::ZERO);
    }

    #[test]
    fn test_mouse_down_outside_card_is_ignored() {
        let mut state = state_with_people(1);
        state.card_area = Rect::new(10, 2, 40, 20);

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        state.handle_mouse(down);

        let up = MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 60,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        state.handle_mouse(up);
        state.tick(Duration::from_millis(33));

        assert!(state.take_completed_swipe().is_none());
    }
}
