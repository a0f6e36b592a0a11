//! Use case implementations.

mod fetch_deck_use_case;
mod fetch_liked_use_case;
mod record_swipe_use_case;

pub use fetch_deck_use_case::FetchDeckUseCase;
pub use fetch_liked_use_case::FetchLikedUseCase;
pub use record_swipe_use_case::RecordSwipeUseCase;
