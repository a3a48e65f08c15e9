//! Derived save state for a (user, restaurant) pair.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{BoardId, RestaurantId};

/// Which boards currently hold a restaurant for one user.
///
/// Never stored; always rebuilt from the store by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub restaurant: RestaurantId,
    pub boards: BTreeSet<BoardId>,
    /// The user's Quick Saves board, if it has been created yet
    pub quick_saves_board: Option<BoardId>,
}

impl SaveState {
    /// State of a restaurant the user has never saved.
    pub fn empty(restaurant: RestaurantId) -> Self {
        Self {
            restaurant,
            boards: BTreeSet::new(),
            quick_saves_board: None,
        }
    }

    /// True when the restaurant is on at least one board.
    pub fn is_saved(&self) -> bool {
        !self.boards.is_empty()
    }

    /// True when the restaurant is on the Quick Saves board.
    ///
    /// This, not [`SaveState::is_saved`], drives the bookmark indicator.
    pub fn in_quick_saves(&self) -> bool {
        self.quick_saves_board
            .is_some_and(|qs| self.boards.contains(&qs))
    }

    /// Boards other than Quick Saves that hold the restaurant.
    pub fn custom_boards(&self) -> impl Iterator<Item = &BoardId> {
        self.boards
            .iter()
            .filter(move |id| Some(**id) != self.quick_saves_board)
    }

    pub fn has_custom_membership(&self) -> bool {
        self.custom_boards().next().is_some()
    }
}
