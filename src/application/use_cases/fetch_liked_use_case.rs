//! Fetch-liked use case implementation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::Person;
use crate::domain::errors::ApiError;
use crate::domain::ports::PeoplePort;

/// Fetches everyone the account has liked.
#[derive(Clone)]
pub struct FetchLikedUseCase {
    people_port: Arc<dyn PeoplePort>,
}

impl FetchLikedUseCase {
    /// Creates new fetch-liked use case.
    #[must_use]
    pub const fn new(people_port: Arc<dyn PeoplePort>) -> Self {
        Self { people_port }
    }

    /// Executes the fetch.
    ///
    /// # Errors
    /// Returns error if the API request fails.
    pub async fn execute(&self) -> Result<Vec<Person>, ApiError> {
        debug!("Fetching liked people");

        let people = self.people_port.fetch_liked().await?;

        info!(count = people.len(), "Liked people loaded");
        Ok(people)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockPeoplePort;

    #[tokio::test]
    async fn test_fetch_liked() {
        let liked = vec![Person::new(3_u64, "Cam", 30, "Oslo")];
        let port = Arc::new(MockPeoplePort::new(Vec::new()).with_liked(liked));
        let use_case = FetchLikedUseCase::new(port);

        let people = use_case.execute().await.unwrap();

        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name(), "Cam");
    }

    #[tokio::test]
    async fn test_fetch_liked_error_propagates() {
        let port = Arc::new(MockPeoplePort::new(Vec::new()));
        port.set_should_succeed(false);
        let use_case = FetchLikedUseCase::new(port);

        assert!(use_case.execute().await.is_err());
    }
}
