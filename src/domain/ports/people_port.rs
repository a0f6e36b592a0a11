//! People port for the matching API.

use async_trait::async_trait;

use crate::domain::entities::{Person, PersonId};
use crate::domain::errors::ApiError;

/// Port for the remote matching service.
///
/// A thin pass-through contract: no retry, caching, or offline semantics.
#[async_trait]
pub trait PeoplePort: Send + Sync {
    /// Fetches a batch of recommended people.
    async fn fetch_recommended(&self, per_page: u8) -> Result<Vec<Person>, ApiError>;

    /// Records a like for the given person.
    async fn like(&self, person_id: PersonId) -> Result<(), ApiError>;

    /// Records a dislike for the given person.
    async fn dislike(&self, person_id: PersonId) -> Result<(), ApiError>;

    /// Fetches all people the account has liked.
    async fn fetch_liked(&self) -> Result<Vec<Person>, ApiError>;
}
