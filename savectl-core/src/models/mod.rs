//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod board;
pub mod ids;
pub mod save_state;
pub mod validation;

pub use board::{Board, BoardKind, BoardTitle, NewBoard, Visibility, QUICK_SAVES_TITLE};
pub use ids::{BoardId, RestaurantId, UserId};
pub use save_state::SaveState;
pub use validation::ValidationError;
