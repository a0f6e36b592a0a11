//! Fetch-deck use case implementation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{DeckRequest, DeckResponse};
use crate::domain::errors::ApiError;
use crate::domain::ports::PeoplePort;

/// Fetches a batch of recommended people and validates it for the deck.
///
/// An id must identify exactly one person within a batch; repeated ids are
/// dropped, keeping the first occurrence.
#[derive(Clone)]
pub struct FetchDeckUseCase {
    people_port: Arc<dyn PeoplePort>,
}

impl FetchDeckUseCase {
    /// Creates new fetch-deck use case.
    #[must_use]
    pub const fn new(people_port: Arc<dyn PeoplePort>) -> Self {
        Self { people_port }
    }

    /// Executes the fetch with the given request.
    ///
    /// # Errors
    /// Returns error if the API request fails.
    pub async fn execute(&self, request: DeckRequest) -> Result<DeckResponse, ApiError> {
        debug!(per_page = request.per_page(), "Fetching recommended people");

        let batch = self
            .people_port
            .fetch_recommended(request.per_page())
            .await?;

        let fetched = batch.len();
        let mut seen = HashSet::with_capacity(fetched);
        let mut people = Vec::with_capacity(fetched);

        for person in batch {
            if seen.insert(person.id()) {
                people.push(person);
            } else {
                warn!(person_id = %person.id(), "Duplicate id in recommendation batch, dropping");
            }
        }

        let duplicates_dropped = fetched - people.len();
        info!(
            count = people.len(),
            duplicates_dropped, "Recommendation batch ready"
        );

        Ok(DeckResponse::new(people, duplicates_dropped))
    }
}
