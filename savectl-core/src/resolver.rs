//! Save state resolution
//!
//! Reads the authoritative membership set for a (user, restaurant) pair.
//! No caching and no side effects: the Quick Saves board is looked up,
//! never created, so a user who has never saved anything resolves to
//! [`SaveState::empty`].

use std::sync::Arc;

use crate::error::SaveError;
use crate::models::{RestaurantId, SaveState, UserId};
use crate::store::BoardStore;

#[derive(Clone)]
pub struct SaveStateResolver {
    store: Arc<dyn BoardStore>,
}

impl SaveStateResolver {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Resolve the current save state.
    ///
    /// # Errors
    ///
    /// Any store fault is reported as [`SaveError::FetchFailed`].
    pub async fn resolve(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<SaveState, SaveError> {
        let (containing, quick_saves) = futures::try_join!(
            self.store.boards_containing(user, restaurant),
            self.store.find_quick_saves(user),
        )
        .map_err(SaveError::fetch)?;

        let state = SaveState {
            restaurant,
            boards: containing.iter().map(|b| b.id).collect(),
            quick_saves_board: quick_saves.map(|b| b.id),
        };

        tracing::debug!(
            %user,
            %restaurant,
            boards = state.boards.len(),
            in_quick_saves = state.in_quick_saves(),
            "resolved save state"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoardTitle, NewBoard};
    use crate::store::{Fault, MemoryStore, StoreOp};

    #[tokio::test]
    async fn never_saved_is_empty_not_error() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SaveStateResolver::new(store.clone());
        let user = UserId::new();
        let restaurant = RestaurantId::new();

        let state = resolver.resolve(user, restaurant).await.unwrap();
        assert_eq!(state, SaveState::empty(restaurant));

        // Resolving must not create the quick saves board
        assert!(store.find_quick_saves(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reports_quick_saves_and_custom_boards() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SaveStateResolver::new(store.clone());
        let user = UserId::new();
        let restaurant = RestaurantId::new();

        let qs = store.get_or_create_quick_saves(user).await.unwrap();
        let date_night = store
            .create_board(user, NewBoard::new(BoardTitle::new("Date Night").unwrap()))
            .await
            .unwrap();
        store.insert_membership(date_night.id, restaurant, user).await.unwrap();

        let state = resolver.resolve(user, restaurant).await.unwrap();
        assert_eq!(state.quick_saves_board, Some(qs.id));
        assert!(state.is_saved());
        assert!(!state.in_quick_saves());
        assert!(state.boards.contains(&date_night.id));
    }

    #[tokio::test]
    async fn other_users_memberships_are_invisible() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SaveStateResolver::new(store.clone());
        let alice = UserId::new();
        let bob = UserId::new();
        let restaurant = RestaurantId::new();

        let qs = store.get_or_create_quick_saves(alice).await.unwrap();
        store.insert_membership(qs.id, restaurant, alice).await.unwrap();

        let state = resolver.resolve(bob, restaurant).await.unwrap();
        assert!(!state.is_saved());
    }

    #[tokio::test]
    async fn store_fault_is_fetch_failed() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SaveStateResolver::new(store.clone());
        store.inject(StoreOp::BoardsContaining, Fault::Fail).await;

        let err = resolver
            .resolve(UserId::new(), RestaurantId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::FetchFailed { .. }));
    }
}
