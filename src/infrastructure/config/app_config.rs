//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entities::Profile;
use crate::infrastructure::api::DEFAULT_API_BASE;

const APP_NAME: &str = "emberdeck";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "emberdeck";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Enable mouse support (drag-to-swipe).
    #[serde(default = "default_true")]
    pub mouse: bool,

    /// Matching API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// UI configuration.
    #[serde(default)]
    pub ui: UiConfig,

    /// Theme configuration.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Account profile shown on the account tab.
    #[serde(default)]
    pub profile: Profile,
}

/// Matching API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the matching service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Recommendation batch size.
    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: default_per_page(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show profile photos on cards.
    #[serde(default = "default_true")]
    pub show_photos: bool,

    /// Enable splash and swipe animations.
    #[serde(default = "default_true")]
    pub enable_animations: bool,

    /// Horizontal cells a keyboard nudge moves the card.
    #[serde(default = "default_nudge_step")]
    pub nudge_step: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_photos: true,
            enable_animations: true,
            nudge_step: default_nudge_step(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Accent color (name or hex code).
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

impl ThemeConfig {
    /// Parses the accent into a terminal color, falling back to red.
    #[must_use]
    pub fn accent(&self) -> ratatui::style::Color {
        self.accent_color
            .parse()
            .unwrap_or(ratatui::style::Color::Red)
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

const fn default_per_page() -> u8 {
    10
}

fn default_accent_color() -> String {
    "Red".to_string()
}

fn default_true() -> bool {
    true
}

const fn default_nudge_step() -> u16 {
    2
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(mouse) = args.mouse {
            self.mouse = mouse;
        }
        if let Some(api_url) = args.api_url {
            self.api.base_url = api_url;
        }
        if let Some(per_page) = args.per_page {
            self.api.per_page = per_page;
        }
        if let Some(show_photos) = args.show_photos {
            self.ui.show_photos = show_photos;
        }
        if let Some(enable_animations) = args.enable_animations {
            self.ui.enable_animations = enable_animations;
        }
        if let Some(accent_color) = args.accent_color {
            self.theme.accent_color = accent_color;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("emberdeck.log"))
    }

    /// Returns default photo cache directory.
    #[must_use]
    pub fn default_photo_cache_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.cache_dir().join("photos"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            mouse: true,
            api: ApiConfig::default(),
            ui: UiConfig::default(),
            theme: ThemeConfig::default(),
            profile: Profile::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_with_all_sections() {
        let toml_content = r##"
            log_level = "debug"
            mouse = false

            [api]
            base_url = "https://matches.example.com/api"
            per_page = 25

            [ui]
            enable_animations = false

            [theme]
            accent_color = "#fd2d55"

            [profile]
            name = "Ada"
            age = 31
        "##;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(!config.mouse);
        assert_eq!(config.api.base_url, "https://matches.example.com/api");
        assert_eq!(config.api.per_page, 25);
        assert!(!config.ui.enable_animations);
        assert!(config.ui.show_photos);
        assert_eq!(config.theme.accent_color, "#fd2d55");
        assert_eq!(config.profile.name(), "Ada");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
        assert_eq!(config.api.per_page, 10);
        assert!(config.mouse);
        assert!(config.ui.show_photos); // default_true
        assert!(config.ui.enable_animations); // default_true
        assert_eq!(config.profile.name(), "John Doe");
    }

    #[test]
    fn test_merge_with_args_overrides_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            config: None,
            log_path: None,
            log_level: Some(LogLevel::Trace),
            mouse: Some(false),
            api_url: Some("http://localhost:9000/api".into()),
            per_page: Some(5),
            show_photos: None,
            enable_animations: None,
            accent_color: Some("Magenta".into()),
        };

        config.merge_with_args(args);

        assert_eq!(config.log_level, LogLevel::Trace);
        assert!(!config.mouse);
        assert_eq!(config.api.base_url, "http://localhost:9000/api");
        assert_eq!(config.api.per_page, 5);
        assert_eq!(config.theme.accent_color, "Magenta");
        assert!(config.ui.show_photos);
    }

    #[test]
    fn test_accent_parsing_falls_back_to_red() {
        let theme = ThemeConfig {
            accent_color: "not-a-color".into(),
        };
        assert_eq!(theme.accent(), ratatui::style::Color::Red);
    }
}
