//! savectl-core: restaurant save/board consistency
//!
//! Keeps the bookmark indicator, Quick Saves and custom board memberships
//! consistent under repeated taps, concurrent screens and store failures.
//! The store's unique constraints are the only concurrency control; every
//! component re-resolves from the store instead of sharing in-memory copies.

pub mod config;
pub mod error;
pub mod indicator;
pub mod membership;
pub mod models;
pub mod resolver;
pub mod session;
pub mod store;
pub mod toggle;

pub use config::SavectlConfig;
pub use error::{ConfigError, SaveError, SelectionError, StoreError};
pub use indicator::{Completion, IndicatorState, SaveIndicator, TapTicket};
pub use membership::{
    CommitReport, MembershipSelector, MembershipSheet, Removal, Selection, SheetAction,
    SheetResult,
};
pub use models::{Board, BoardId, BoardKind, NewBoard, RestaurantId, SaveState, UserId};
pub use resolver::SaveStateResolver;
pub use session::{BookmarkSession, TapResult};
pub use store::{BoardStore, MemoryStore, MembershipDelete, MembershipInsert};
pub use toggle::{MixedMembership, SaveEvents, ToggleEngine, ToggleOutcome};
