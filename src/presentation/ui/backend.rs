use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::dto::{DeckRequest, DeckResponse};
use crate::application::use_cases::{FetchDeckUseCase, FetchLikedUseCase, RecordSwipeUseCase};
use crate::domain::entities::{ImageId, Person, SwipeDecision};
use crate::domain::ports::PeoplePort;
use crate::infrastructure::image::{PhotoLoadedEvent, PhotoLoader};

/// Results flowing from the backend worker to the UI loop.
#[derive(Debug)]
pub enum Action {
    /// Photo loader is initialized and ready to use.
    PhotoLoaderReady(Arc<PhotoLoader>),
    /// A recommendation batch arrived.
    DeckLoaded(DeckResponse),
    /// Fetching the recommendation batch failed.
    DeckLoadError(String),
    /// A swipe decision was acknowledged by the API.
    SwipeRecorded(SwipeDecision),
    /// Recording a swipe decision failed.
    SwipeRecordError {
        /// The decision that was not recorded.
        decision: SwipeDecision,
        /// Failure description for the status bar.
        error: String,
    },
    /// The liked list arrived.
    LikedLoaded(Vec<Person>),
    /// Fetching the liked list failed.
    LikedLoadError(String),
    /// A photo was exported and opened externally.
    PhotoExported(PathBuf),
    /// Exporting or opening a photo failed.
    PhotoExportError(String),
}

/// Work requests flowing from the UI loop to the backend worker.
#[derive(Debug)]
pub enum BackendCommand {
    /// Fetch a recommendation batch.
    LoadDeck {
        /// Batch size.
        per_page: u8,
    },
    /// Record one swipe decision.
    RecordSwipe(SwipeDecision),
    /// Fetch the liked list.
    LoadLiked,
    /// Export a photo to disk and open it with the system viewer.
    ExportPhoto {
        /// Cache id of the photo.
        id: ImageId,
        /// Source URL.
        url: String,
    },
}

/// Background worker translating UI commands into port calls, keeping the
/// render loop free of network waits.
pub struct Backend {
    fetch_deck: FetchDeckUseCase,
    record_swipe: RecordSwipeUseCase,
    fetch_liked: FetchLikedUseCase,
    photo_loader: Option<Arc<PhotoLoader>>,
    photos_enabled: bool,
    command_rx: mpsc::UnboundedReceiver<BackendCommand>,
    action_tx: mpsc::UnboundedSender<Action>,
    photo_event_tx: mpsc::UnboundedSender<PhotoLoadedEvent>,
}

impl Backend {
    #[must_use]
    pub fn new(
        people_port: Arc<dyn PeoplePort>,
        photos_enabled: bool,
        command_rx: mpsc::UnboundedReceiver<BackendCommand>,
        action_tx: mpsc::UnboundedSender<Action>,
        photo_event_tx: mpsc::UnboundedSender<PhotoLoadedEvent>,
    ) -> Self {
        Self {
            fetch_deck: FetchDeckUseCase::new(people_port.clone()),
            record_swipe: RecordSwipeUseCase::new(people_port.clone()),
            fetch_liked: FetchLikedUseCase::new(people_port),
            photo_loader: None,
            photos_enabled,
            command_rx,
            action_tx,
            photo_event_tx,
        }
    }

    pub async fn run(mut self) {
        info!("Backend worker started");

        if self.photos_enabled {
            match PhotoLoader::with_defaults(self.photo_event_tx.clone()).await {
                Ok(loader) => {
                    let loader = Arc::new(loader);
                    self.photo_loader = Some(loader.clone());
                    let _ = self.action_tx.send(Action::PhotoLoaderReady(loader));
                }
                Err(e) => {
                    warn!(error = %e, "Photo loader unavailable, continuing without photos");
                }
            }
        }

        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        info!("Backend worker stopped");
    }

    async fn handle_command(&self, command: BackendCommand) {
        match command {
            BackendCommand::LoadDeck { per_page } => {
                match self.fetch_deck.execute(DeckRequest::new(per_page)).await {
                    Ok(response) => {
                        debug!(count = response.people.len(), "Deck batch loaded");
                        let _ = self.action_tx.send(Action::DeckLoaded(response));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load deck batch");
                        let _ = self.action_tx.send(Action::DeckLoadError(e.to_string()));
                    }
                }
            }
            BackendCommand::RecordSwipe(decision) => {
                match self.record_swipe.execute(decision).await {
                    Ok(()) => {
                        let _ = self.action_tx.send(Action::SwipeRecorded(decision));
                    }
                    Err(e) => {
                        error!(person_id = %decision.person_id(), error = %e, "Swipe not recorded");
                        let _ = self.action_tx.send(Action::SwipeRecordError {
                            decision,
                            error: e.to_string(),
                        });
                    }
                }
            }
            BackendCommand::LoadLiked => match self.fetch_liked.execute().await {
                Ok(people) => {
                    debug!(count = people.len(), "Liked list loaded");
                    let _ = self.action_tx.send(Action::LikedLoaded(people));
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load liked list");
                    let _ = self.action_tx.send(Action::LikedLoadError(e.to_string()));
                }
            },
            BackendCommand::ExportPhoto { id, url } => {
                let Some(ref loader) = self.photo_loader else {
                    let _ = self.action_tx.send(Action::PhotoExportError(
                        "photo loader not available".to_string(),
                    ));
                    return;
                };

                match loader.export_for_viewing(&id, &url).await {
                    Ok(path) => {
                        if let Err(e) = opener::open(&path) {
                            warn!(error = %e, "Failed to open exported photo");
                            let _ = self
                                .action_tx
                                .send(Action::PhotoExportError(e.to_string()));
                        } else {
                            let _ = self.action_tx.send(Action::PhotoExported(path));
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to export photo");
                        let _ = self.action_tx.send(Action::PhotoExportError(e.to_string()));
                    }
                }
            }
        }
    }
}
