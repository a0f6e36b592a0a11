//! Main application orchestrator.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::domain::ports::PeoplePort;
use crate::infrastructure::AppConfig;
use crate::infrastructure::image::{PhotoLoadedEvent, PhotoLoader};
use crate::presentation::events::EventHandler;
use crate::presentation::ui::backend::{Action, Backend, BackendCommand};
use crate::presentation::ui::home_screen::{HomeKeyResult, HomeScreen, HomeScreenState};
use crate::presentation::ui::splash_screen::SplashScreen;
use crate::presentation::widgets::{PhotoPicker, StatusBar};

const ANIMATION_TICK_RATE: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Loading,
    Running,
    Exiting,
}

enum CurrentScreen {
    Splash(SplashScreen),
    Home(Box<HomeScreenState>),
}

pub struct App {
    config: AppConfig,
    state: AppState,
    screen: CurrentScreen,
    people_port: Arc<dyn PeoplePort>,
    command_tx: mpsc::UnboundedSender<BackendCommand>,
    command_rx: Option<mpsc::UnboundedReceiver<BackendCommand>>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    photo_event_tx: mpsc::UnboundedSender<PhotoLoadedEvent>,
    photo_event_rx: mpsc::UnboundedReceiver<PhotoLoadedEvent>,
    photo_loader: Option<Arc<PhotoLoader>>,
    pending_home: Option<Box<HomeScreenState>>,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig, people_port: Arc<dyn PeoplePort>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (photo_event_tx, photo_event_rx) = mpsc::unbounded_channel();

        Self {
            config,
            state: AppState::Loading,
            screen: CurrentScreen::Splash(SplashScreen::new()),
            people_port,
            command_tx,
            command_rx: Some(command_rx),
            action_tx,
            action_rx,
            photo_event_tx,
            photo_event_rx,
            photo_loader: None,
            pending_home: None,
        }
    }

    /// Runs the application until exit.
    ///
    /// # Errors
    /// Returns error if terminal drawing fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        if let Some(command_rx) = self.command_rx.take() {
            let backend = Backend::new(
                self.people_port.clone(),
                self.config.ui.show_photos,
                command_rx,
                self.action_tx.clone(),
                self.photo_event_tx.clone(),
            );
            tokio::spawn(backend.run());
        }

        self.pending_home = Some(Box::new(HomeScreenState::new(
            &self.config,
            PhotoPicker::new(),
        )));

        self.send_command(BackendCommand::LoadDeck {
            per_page: self.config.api.per_page,
        });

        self.run_event_loop(terminal).await?;

        if let Some(ref loader) = self.photo_loader {
            debug!(stats = %loader.memory_cache_stats(), "Photo cache at exit");
        }
        info!("Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut animation_interval = interval(ANIMATION_TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.state != AppState::Exiting {
            tokio::select! {
                biased;

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                    terminal.draw(|frame| self.render(frame))?;
                }

                Some(event) = self.photo_event_rx.recv() => {
                    self.handle_photo_event(event);
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = animation_interval.tick() => {
                    self.handle_tick();
                    terminal.draw(|frame| self.render(frame))?;
                }

                Some(Ok(event)) = terminal_events.next() => {
                    self.handle_terminal_event(event);
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        Ok(())
    }

    fn send_command(&self, command: BackendCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("Backend worker is gone, dropping command");
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            CurrentScreen::Splash(screen) => {
                frame.render_widget(screen, frame.area());
            }
            CurrentScreen::Home(state) => {
                frame.render_stateful_widget(HomeScreen::new(), frame.area(), state);
            }
        }
    }

    fn handle_tick(&mut self) {
        match &mut self.screen {
            CurrentScreen::Splash(splash) => {
                splash.tick(ANIMATION_TICK_RATE);

                if splash.state.animation_complete
                    && let Some(home) = self.pending_home.take()
                {
                    self.state = AppState::Running;
                    self.screen = CurrentScreen::Home(home);
                }
            }
            CurrentScreen::Home(home) => {
                home.tick(ANIMATION_TICK_RATE);
            }
        }
        self.drive_home();
    }

    /// Sends work produced by the home screen this frame: committed swipes,
    /// deck refills, and photo loads.
    fn drive_home(&mut self) {
        let CurrentScreen::Home(ref mut home) = self.screen else {
            return;
        };

        while let Some(decision) = home.take_completed_swipe() {
            self.command_tx
                .send(BackendCommand::RecordSwipe(decision))
                .unwrap_or_else(|_| warn!("Backend worker is gone, swipe dropped"));
        }

        if home.take_refill_request() {
            debug!("Deck exhausted, fetching next batch");
            home.deck_mut().set_loading();
            self.command_tx
                .send(BackendCommand::LoadDeck {
                    per_page: self.config.api.per_page,
                })
                .unwrap_or_else(|_| warn!("Backend worker is gone, refill dropped"));
        }

        if let Some(ref loader) = self.photo_loader {
            let requests = home.photo_requests();
            if !requests.is_empty() {
                loader.prefetch_batch(requests);
            }
        }
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let result = match &mut self.screen {
            CurrentScreen::Splash(_) => {
                if EventHandler::is_quit_event(&key) {
                    self.state = AppState::Exiting;
                }
                return;
            }
            CurrentScreen::Home(home) => home.handle_key(key),
        };

        match result {
            HomeKeyResult::Quit => self.state = AppState::Exiting,
            HomeKeyResult::RefreshDeck => {
                if let Some(ref loader) = self.photo_loader {
                    loader.cancel_all_queued();
                }
                self.send_command(BackendCommand::LoadDeck {
                    per_page: self.config.api.per_page,
                });
            }
            HomeKeyResult::RefreshLiked => {
                self.send_command(BackendCommand::LoadLiked);
            }
            HomeKeyResult::OpenPhoto { id, url } => {
                self.send_command(BackendCommand::ExportPhoto { id, url });
            }
            HomeKeyResult::Consumed => {}
        }
        self.drive_home();
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.config.mouse {
            return;
        }
        if let CurrentScreen::Home(ref mut home) = self.screen {
            home.handle_mouse(mouse);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::PhotoLoaderReady(loader) => {
                debug!("Photo loader ready");
                self.photo_loader = Some(loader);
                self.drive_home();
            }
            Action::DeckLoaded(response) => {
                if response.duplicates_dropped > 0 {
                    warn!(
                        dropped = response.duplicates_dropped,
                        "Server sent duplicate ids in one batch"
                    );
                }
                self.with_home(|home| home.deck_mut().set_deck(response.people));
                self.mark_data_ready();
                self.drive_home();
            }
            Action::DeckLoadError(error) => {
                self.with_home(|home| home.deck_mut().set_error(error));
                self.mark_data_ready();
            }
            Action::SwipeRecorded(decision) => {
                debug!(person_id = %decision.person_id(), "Swipe acknowledged");
            }
            Action::SwipeRecordError { decision, error } => {
                self.with_home(|home| {
                    home.set_status(StatusBar::error(format!(
                        "Failed to record {} for {}: {error}",
                        decision.direction(),
                        decision.person_id(),
                    )));
                });
            }
            Action::LikedLoaded(people) => {
                self.with_home(|home| home.liked_mut().set_people(people));
            }
            Action::LikedLoadError(error) => {
                self.with_home(|home| home.liked_mut().set_error(error));
            }
            Action::PhotoExported(path) => {
                self.with_home(|home| {
                    home.set_status(StatusBar::success(format!(
                        "Opened photo: {}",
                        path.display()
                    )));
                });
            }
            Action::PhotoExportError(error) => {
                self.with_home(|home| {
                    home.set_status(StatusBar::error(format!("Photo export failed: {error}")));
                });
            }
        }
    }

    fn handle_photo_event(&mut self, event: PhotoLoadedEvent) {
        let result = event.result.map(|loaded| loaded.image);
        self.with_home(|home| home.on_photo_loaded(&event.id, &result));
    }

    /// Applies a mutation to the live home screen or the one staged behind
    /// the splash.
    fn with_home(&mut self, f: impl FnOnce(&mut HomeScreenState)) {
        match &mut self.screen {
            CurrentScreen::Home(home) => f(home),
            CurrentScreen::Splash(_) => {
                if let Some(ref mut home) = self.pending_home {
                    f(home);
                }
            }
        }
    }

    /// Lets the splash outro play once the first batch (or its failure)
    /// arrived.
    fn mark_data_ready(&mut self) {
        if let CurrentScreen::Splash(ref mut splash) = self.screen {
            splash.set_data_ready();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockPeoplePort;

    #[test]
    fn test_app_starts_on_splash() {
        let port = Arc::new(MockPeoplePort::new(Vec::new()));
        let app = App::new(AppConfig::default(), port);

        assert_eq!(app.state, AppState::Loading);
        assert!(matches!(app.screen, CurrentScreen::Splash(_)));
    }
}
