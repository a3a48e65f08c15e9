//! Persistent store contract
//!
//! The store is the only shared mutable resource. Its unique constraints
//! are the sole concurrency control:
//! - at most one membership per (board, restaurant)
//! - at most one Quick Saves board per user
//!
//! Implementations must rely on those constraints rather than
//! check-then-insert, and report duplicates as [`MembershipInsert::AlreadyExists`].

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Board, BoardId, NewBoard, RestaurantId, UserId};

pub use memory::{Fault, MemoryStore, StoreOp};

/// Result of a membership insert that reached the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipInsert {
    Inserted,
    AlreadyExists,
}

/// Result of a membership delete that reached the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipDelete {
    Deleted,
    NotFound,
}

/// Abstract persistent store for boards and memberships
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Every board owned by the user, Quick Saves included once it exists.
    async fn boards_for_user(&self, user: UserId) -> Result<Vec<Board>, StoreError>;

    /// Boards owned by the user that contain the restaurant.
    async fn boards_containing(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<Vec<Board>, StoreError>;

    /// The user's Quick Saves board, without creating it.
    async fn find_quick_saves(&self, user: UserId) -> Result<Option<Board>, StoreError>;

    /// The user's Quick Saves board, created on first use.
    async fn get_or_create_quick_saves(&self, user: UserId) -> Result<Board, StoreError>;

    /// Create a custom board.
    async fn create_board(&self, user: UserId, board: NewBoard) -> Result<Board, StoreError>;

    async fn insert_membership(
        &self,
        board: BoardId,
        restaurant: RestaurantId,
        user: UserId,
    ) -> Result<MembershipInsert, StoreError>;

    async fn delete_membership(
        &self,
        board: BoardId,
        restaurant: RestaurantId,
        user: UserId,
    ) -> Result<MembershipDelete, StoreError>;

    /// Short backend name for health reporting
    fn kind(&self) -> &'static str;
}
