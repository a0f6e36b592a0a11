//! Swipe decision value objects.

use serde::{Deserialize, Serialize};

use super::person::PersonId;

/// Direction a card was swiped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Swiped right.
    Like,
    /// Swiped left.
    Dislike,
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::Dislike => write!(f, "dislike"),
        }
    }
}

/// A decision about one person, sent to the API and then forgotten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeDecision {
    person_id: PersonId,
    direction: SwipeDirection,
}

impl SwipeDecision {
    #[must_use]
    pub const fn new(person_id: PersonId, direction: SwipeDirection) -> Self {
        Self {
            person_id,
            direction,
        }
    }

    #[must_use]
    pub const fn person_id(&self) -> PersonId {
        self.person_id
    }

    #[must_use]
    pub const fn direction(&self) -> SwipeDirection {
        self.direction
    }
}
