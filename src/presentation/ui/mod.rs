//! UI screens.

mod account_screen;
mod app;
mod backend;
mod deck_screen;
mod gesture;
mod home_screen;
mod liked_screen;
mod splash_screen;

pub use account_screen::AccountScreen;
pub use app::App;
pub use backend::{Action, Backend, BackendCommand};
pub use deck_screen::{DeckKeyResult, DeckLoadState, DeckScreen, DeckScreenState};
pub use gesture::{SwipeGesture, SwipePhase};
pub use home_screen::{HomeKeyResult, HomeScreen, HomeScreenState};
pub use liked_screen::{LikedKeyResult, LikedLoadState, LikedScreen, LikedScreenState};
pub use splash_screen::SplashScreen;
