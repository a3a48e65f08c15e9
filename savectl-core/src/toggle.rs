//! Save toggle engine - the one-tap bookmark action
//!
//! Decision table, read from a freshly resolved [`SaveState`]:
//!
//! | membership                         | action                       | outcome                |
//! |------------------------------------|------------------------------|------------------------|
//! | none                               | insert into Quick Saves      | `Saved`                |
//! | Quick Saves only                   | delete Quick Saves row       | `Unsaved`              |
//! | Quick Saves + custom boards        | per [`MixedMembership`]      | `Unsaved` or selection |
//! | custom boards only                 | nothing                      | `NeedsBoardSelection`  |
//!
//! Every mutating branch touches exactly one membership row.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::models::{BoardId, RestaurantId, SaveState, UserId};
use crate::resolver::SaveStateResolver;
use crate::store::{BoardStore, MembershipDelete, MembershipInsert};

/// What a tap does when the restaurant is in Quick Saves and in custom boards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedMembership {
    /// Remove only the Quick Saves row; custom memberships stay
    #[default]
    UnsaveQuickSaves,
    /// Hand the decision to the membership sheet
    RequireSelection,
}

/// Result of one tap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// Added to Quick Saves
    Saved { board: BoardId },
    /// Removed from Quick Saves
    Unsaved { board: BoardId },
    /// Nothing written; the caller must open the membership sheet
    NeedsBoardSelection { state: SaveState },
    Failed { error: SaveError },
}

impl ToggleOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// True when the tap changed persisted state.
    pub fn wrote(&self) -> bool {
        matches!(self, Self::Saved { .. } | Self::Unsaved { .. })
    }
}

/// Callbacks that let a view react to a tap without polling.
///
/// Exactly one method is called per [`ToggleEngine::toggle_with_events`].
pub trait SaveEvents: Send + Sync {
    fn on_board_selection_needed(&self, _state: &SaveState) {}

    fn on_success(&self, _outcome: &ToggleOutcome, _restaurant_name: &str) {}

    fn on_error(&self, _error: &SaveError) {}
}

/// Events sink that ignores everything
pub struct NoEvents;

impl SaveEvents for NoEvents {}

#[derive(Clone)]
pub struct ToggleEngine {
    store: Arc<dyn BoardStore>,
    resolver: SaveStateResolver,
    policy: MixedMembership,
}

enum Decision {
    Save,
    Unsave(BoardId),
    Select,
}

impl ToggleEngine {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self {
            resolver: SaveStateResolver::new(store.clone()),
            store,
            policy: MixedMembership::default(),
        }
    }

    pub fn with_policy(mut self, policy: MixedMembership) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MixedMembership {
        self.policy
    }

    pub fn resolver(&self) -> &SaveStateResolver {
        &self.resolver
    }

    fn decide(&self, state: &SaveState) -> Decision {
        if !state.is_saved() {
            return Decision::Save;
        }

        match (state.quick_saves_board, state.in_quick_saves()) {
            (Some(qs), true) if !state.has_custom_membership() => Decision::Unsave(qs),
            (Some(qs), true) => match self.policy {
                MixedMembership::UnsaveQuickSaves => Decision::Unsave(qs),
                MixedMembership::RequireSelection => Decision::Select,
            },
            _ => Decision::Select,
        }
    }

    /// Perform the bookmark tap for `restaurant`.
    ///
    /// `restaurant_name` is only used for logging and success events.
    pub async fn toggle(
        &self,
        user: UserId,
        restaurant: RestaurantId,
        restaurant_name: &str,
    ) -> ToggleOutcome {
        let state = match self.resolver.resolve(user, restaurant).await {
            Ok(state) => state,
            Err(error) => return ToggleOutcome::Failed { error },
        };

        match self.decide(&state) {
            Decision::Save => self.save(user, restaurant, restaurant_name).await,
            Decision::Unsave(board) => self.unsave(user, restaurant, board, restaurant_name).await,
            Decision::Select => {
                tracing::debug!(%user, %restaurant, "tap needs board selection");
                ToggleOutcome::NeedsBoardSelection { state }
            }
        }
    }

    /// [`toggle`](Self::toggle), then report the outcome through `events`.
    pub async fn toggle_with_events(
        &self,
        user: UserId,
        restaurant: RestaurantId,
        restaurant_name: &str,
        events: &dyn SaveEvents,
    ) -> ToggleOutcome {
        let outcome = self.toggle(user, restaurant, restaurant_name).await;
        match &outcome {
            ToggleOutcome::NeedsBoardSelection { state } => events.on_board_selection_needed(state),
            ToggleOutcome::Failed { error } => events.on_error(error),
            ToggleOutcome::Saved { .. } | ToggleOutcome::Unsaved { .. } => {
                events.on_success(&outcome, restaurant_name)
            }
        }
        outcome
    }

    async fn save(
        &self,
        user: UserId,
        restaurant: RestaurantId,
        restaurant_name: &str,
    ) -> ToggleOutcome {
        let board = match self.store.get_or_create_quick_saves(user).await {
            Ok(board) => board,
            Err(err) => return ToggleOutcome::Failed { error: SaveError::write(err) },
        };

        match self.store.insert_membership(board.id, restaurant, user).await {
            Ok(MembershipInsert::Inserted) => {
                tracing::info!(%user, %restaurant, board = %board.id, name = restaurant_name, "saved to quick saves");
            }
            Ok(MembershipInsert::AlreadyExists) => {
                tracing::warn!(%user, %restaurant, board = %board.id, "quick saves row already present");
            }
            Err(err) => return ToggleOutcome::Failed { error: SaveError::write(err) },
        }
        ToggleOutcome::Saved { board: board.id }
    }

    async fn unsave(
        &self,
        user: UserId,
        restaurant: RestaurantId,
        board: BoardId,
        restaurant_name: &str,
    ) -> ToggleOutcome {
        match self.store.delete_membership(board, restaurant, user).await {
            Ok(MembershipDelete::Deleted) => {
                tracing::info!(%user, %restaurant, %board, name = restaurant_name, "removed from quick saves");
            }
            Ok(MembershipDelete::NotFound) => {
                tracing::warn!(%user, %restaurant, %board, "quick saves row already gone");
            }
            Err(err) => return ToggleOutcome::Failed { error: SaveError::write(err) },
        }
        ToggleOutcome::Unsaved { board }
    }
}
