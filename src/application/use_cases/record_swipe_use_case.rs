//! Record-swipe use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{SwipeDecision, SwipeDirection};
use crate::domain::errors::ApiError;
use crate::domain::ports::PeoplePort;

/// Sends one swipe decision to the matching API.
///
/// The caller is responsible for invoking this exactly once per committed
/// swipe; the use case itself is a pass-through with no retry.
#[derive(Clone)]
pub struct RecordSwipeUseCase {
    people_port: Arc<dyn PeoplePort>,
}

impl RecordSwipeUseCase {
    /// Creates new record-swipe use case.
    #[must_use]
    pub const fn new(people_port: Arc<dyn PeoplePort>) -> Self {
        Self { people_port }
    }

    /// Records the decision with the API.
    ///
    /// # Errors
    /// Returns error if the API request fails; the decision is not retried.
    pub async fn execute(&self, decision: SwipeDecision) -> Result<(), ApiError> {
        debug!(
            person_id = %decision.person_id(),
            direction = %decision.direction(),
            "Recording swipe"
        );

        let result = match decision.direction() {
            SwipeDirection::Like => self.people_port.like(decision.person_id()).await,
            SwipeDirection::Dislike => self.people_port.dislike(decision.person_id()).await,
        };

        match result {
            Ok(()) => {
                info!(
                    person_id = %decision.person_id(),
                    direction = %decision.direction(),
                    "Swipe recorded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    person_id = %decision.person_id(),
                    error = %e,
                    "Failed to record swipe"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PersonId;
    use crate::domain::ports::mocks::MockPeoplePort;

    #[tokio::test]
    async fn test_like_routes_to_like_endpoint() {
        let port = Arc::new(MockPeoplePort::new(Vec::new()));
        let use_case = RecordSwipeUseCase::new(port.clone());

        let decision = SwipeDecision::new(PersonId(7), SwipeDirection::Like);
        use_case.execute(decision).await.unwrap();

        let recorded = port.recorded_swipes();
        assert_eq!(recorded, vec![decision]);
    }

    #[tokio::test]
    async fn test_dislike_routes_to_dislike_endpoint() {
        let port = Arc::new(MockPeoplePort::new(Vec::new()));
        let use_case = RecordSwipeUseCase::new(port.clone());

        let decision = SwipeDecision::new(PersonId(9), SwipeDirection::Dislike);
        use_case.execute(decision).await.unwrap();

        let recorded = port.recorded_swipes();
        assert_eq!(recorded, vec![decision]);
    }

    #[tokio::test]
    async fn test_failure_records_nothing() {
        let port = Arc::new(MockPeoplePort::new(Vec::new()));
        port.set_should_succeed(false);
        let use_case = RecordSwipeUseCase::new(port.clone());

        let decision = SwipeDecision::new(PersonId(7), SwipeDirection::Like);
        let result = use_case.execute(decision).await;

        assert!(result.is_err());
        assert!(port.recorded_swipes().is_empty());
    }
}
