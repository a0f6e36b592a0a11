use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "emberdeck",
    version,
    about = "A swipe-based matchmaking terminal client",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable mouse support (drag-to-swipe).
    #[arg(long)]
    pub mouse: Option<bool>,

    /// Base URL of the matching API.
    #[arg(long, value_name = "URL", env = "EMBERDECK_API_URL")]
    pub api_url: Option<String>,

    /// Recommendation batch size.
    #[arg(long, value_name = "N")]
    pub per_page: Option<u8>,

    /// Show profile photos on cards.
    #[arg(long)]
    pub show_photos: Option<bool>,

    /// Enable splash and swipe animations.
    #[arg(long)]
    pub enable_animations: Option<bool>,

    /// Accent color (name or hex code).
    #[arg(long)]
    pub accent_color: Option<String>,
}
