//! Person entity sourced from the matching API.

use serde::{Deserialize, Serialize};

/// Unique identifier for a person within a recommendation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u64);

impl PersonId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PersonId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A person as returned by the recommendation and liked endpoints.
///
/// Transient and UI-local; the server is the sole source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: String,
    age: u8,
    location: String,
    #[serde(default)]
    pictures: Vec<String>,
}

impl Person {
    #[must_use]
    pub fn new(
        id: impl Into<PersonId>,
        name: impl Into<String>,
        age: u8,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            location: location.into(),
            pictures: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pictures(mut self, pictures: Vec<String>) -> Self {
        self.pictures = pictures;
        self
    }

    #[must_use]
    pub const fn id(&self) -> PersonId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn age(&self) -> u8 {
        self.age
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn pictures(&self) -> &[String] {
        &self.pictures
    }

    /// Returns the first photo URL, if the person has any.
    #[must_use]
    pub fn primary_picture(&self) -> Option<&str> {
        self.pictures.first().map(String::as_str)
    }

    /// Returns the card headline, e.g. "Maya, 27".
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{}, {}", self.name, self.age)
    }
}
