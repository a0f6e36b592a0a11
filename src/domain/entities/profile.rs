//! Local account profile shown on the account screen.

use serde::{Deserialize, Serialize};

/// The account holder's own profile.
///
/// The matching API exposes no account endpoint, so this is populated from
/// configuration with static defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_age")]
    age: u8,
    #[serde(default = "default_location")]
    location: String,
    #[serde(default = "default_bio")]
    bio: String,
    #[serde(default)]
    photo_url: Option<String>,
}

impl Profile {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        age: u8,
        location: impl Into<String>,
        bio: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            location: location.into(),
            bio: bio.into(),
            photo_url: None,
        }
    }

    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
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
    pub fn bio(&self) -> &str {
        &self.bio
    }

    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Returns the profile headline, e.g. "John Doe, 28".
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{}, {}", self.name, self.age)
    }
}

fn default_name() -> String {
    "John Doe".to_string()
}

const fn default_age() -> u8 {
    28
}

fn default_location() -> String {
    "New York".to_string()
}

fn default_bio() -> String {
    "Passionate about technology and travel.".to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: default_name(),
            age: default_age(),
            location: default_location(),
            bio: default_bio(),
            photo_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = Profile::default();
        assert_eq!(profile.name(), "John Doe");
        assert_eq!(profile.age(), 28);
        assert_eq!(profile.headline(), "John Doe, 28");
        assert!(profile.photo_url().is_none());
    }

    #[test]
    fn test_profile_from_toml() {
        let profile: Profile = toml::from_str(
            r#"
            name = "Ada"
            age = 31
            location = "London"
            bio = "Engines and espresso."
            photo_url = "https://example.com/ada.jpg"
            "#,
        )
        .expect("profile should parse");

        assert_eq!(profile.name(), "Ada");
        assert_eq!(profile.photo_url(), Some("https://example.com/ada.jpg"));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let profile: Profile = toml::from_str("name = \"Ada\"").expect("profile should parse");
        assert_eq!(profile.name(), "Ada");
        assert_eq!(profile.age(), 28);
        assert_eq!(profile.location(), "New York");
    }
}
