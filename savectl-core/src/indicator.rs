//! Bookmark indicator binding
//!
//! The indicator reflects Quick Saves membership only. A restaurant that
//! sits on a custom board but not in Quick Saves renders unsaved.
//!
//! A tap flips the icon immediately as a provisional value. The flip is
//! never committed: the completion either reverts it (failure) or replaces
//! it with a freshly resolved state. Completions are keyed by the binding
//! generation and tap sequence captured when the tap began, so results for
//! an old restaurant never land on a reused indicator.

use serde::{Deserialize, Serialize};

use crate::models::{RestaurantId, SaveState, UserId};
use crate::toggle::ToggleOutcome;

/// What the bookmark icon shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IndicatorState {
    Unsaved,
    Saved,
    /// A write is in flight; the icon shows the optimistic value
    Loading { optimistic_saved: bool },
}

impl IndicatorState {
    pub fn from_state(state: &SaveState) -> Self {
        Self::settled(state.in_quick_saves())
    }

    fn settled(saved: bool) -> Self {
        if saved {
            Self::Saved
        } else {
            Self::Unsaved
        }
    }

    /// Whether the icon is drawn filled.
    pub fn shows_saved(&self) -> bool {
        match self {
            Self::Saved => true,
            Self::Unsaved => false,
            Self::Loading { optimistic_saved } => *optimistic_saved,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Identity of one tap, captured when it began
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapTicket {
    pub user: UserId,
    pub restaurant: RestaurantId,
    generation: u64,
    sequence: u64,
}

/// Whether a completion changed the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied(IndicatorState),
    /// The ticket belongs to an earlier binding or was overtaken by a newer tap
    Stale,
}

/// A running state-change animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub id: u64,
    pub to_saved: bool,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    sequence: u64,
    optimistic: bool,
}

#[derive(Debug)]
pub struct SaveIndicator {
    user: UserId,
    restaurant: RestaurantId,
    generation: u64,
    sequence: u64,
    /// Last authoritative value; optimistic flips never land here
    confirmed: bool,
    pending: Option<Pending>,
    animation: Option<Animation>,
    next_animation: u64,
}

impl SaveIndicator {
    pub fn new(user: UserId, restaurant: RestaurantId) -> Self {
        Self {
            user,
            restaurant,
            generation: 0,
            sequence: 0,
            confirmed: false,
            pending: None,
            animation: None,
            next_animation: 0,
        }
    }

    /// Reuse this indicator for another (user, restaurant) pair.
    ///
    /// Any tap still in flight for the previous pair becomes stale.
    pub fn rebind(&mut self, user: UserId, restaurant: RestaurantId) {
        self.user = user;
        self.restaurant = restaurant;
        self.generation += 1;
        self.confirmed = false;
        self.pending = None;
        self.animation = None;
    }

    pub fn restaurant(&self) -> RestaurantId {
        self.restaurant
    }

    pub fn state(&self) -> IndicatorState {
        match self.pending {
            Some(p) => IndicatorState::Loading {
                optimistic_saved: p.optimistic,
            },
            None => IndicatorState::settled(self.confirmed),
        }
    }

    fn displayed(&self) -> bool {
        self.state().shows_saved()
    }

    /// Adopt a resolved state. Ignored while a tap is in flight or when the
    /// state belongs to another restaurant.
    pub fn apply_state(&mut self, state: &SaveState) -> bool {
        if state.restaurant != self.restaurant || self.pending.is_some() {
            return false;
        }
        self.confirmed = state.in_quick_saves();
        true
    }

    /// Record a tap: flip the icon, enter loading, restart the animation.
    pub fn begin_tap(&mut self) -> TapTicket {
        let optimistic = !self.displayed();
        self.sequence += 1;
        self.pending = Some(Pending {
            sequence: self.sequence,
            optimistic,
        });
        self.start_animation(optimistic);

        TapTicket {
            user: self.user,
            restaurant: self.restaurant,
            generation: self.generation,
            sequence: self.sequence,
        }
    }

    /// Settle a tap.
    ///
    /// `reconciled` is the state resolved after the write; without it a
    /// successful outcome also falls back to the last authoritative value.
    pub fn complete(
        &mut self,
        ticket: TapTicket,
        outcome: &ToggleOutcome,
        reconciled: Option<&SaveState>,
    ) -> Completion {
        if ticket.generation != self.generation
            || ticket.user != self.user
            || ticket.restaurant != self.restaurant
        {
            return Completion::Stale;
        }
        let reconciled = reconciled.filter(|s| s.restaurant == self.restaurant);

        let pending = match self.pending {
            Some(p) if p.sequence == ticket.sequence => p,
            _ => {
                // overtaken by a newer tap; remember what the store said
                if let Some(state) = reconciled {
                    self.confirmed = state.in_quick_saves();
                }
                return Completion::Stale;
            }
        };
        self.pending = None;

        let settled = match (outcome, reconciled) {
            (ToggleOutcome::Failed { .. }, _) => self.confirmed,
            (_, Some(state)) => state.in_quick_saves(),
            (_, None) => self.confirmed,
        };
        self.confirmed = settled;
        if settled != pending.optimistic {
            self.start_animation(settled);
        }

        Completion::Applied(self.state())
    }

    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    /// Clear the animation once its frames are done. Ids of animations that
    /// a later tap already replaced are ignored.
    pub fn finish_animation(&mut self, id: u64) -> bool {
        match self.animation {
            Some(a) if a.id == id => {
                self.animation = None;
                true
            }
            _ => false,
        }
    }

    fn start_animation(&mut self, to_saved: bool) {
        self.next_animation += 1;
        self.animation = Some(Animation {
            id: self.next_animation,
            to_saved,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaveError;
    use crate::models::BoardId;

    fn state(restaurant: RestaurantId, in_quick_saves: bool) -> SaveState {
        let qs = BoardId::new();
        SaveState {
            restaurant,
            boards: if in_quick_saves {
                [qs].into_iter().collect()
            } else {
                Default::default()
            },
            quick_saves_board: Some(qs),
        }
    }

    fn failed() -> ToggleOutcome {
        ToggleOutcome::Failed {
            error: SaveError::Failed {
                reason: "offline".into(),
            },
        }
    }

    #[test]
    fn custom_board_only_renders_unsaved() {
        let restaurant = RestaurantId::new();
        let qs = BoardId::new();
        let date_night = BoardId::new();
        let s = SaveState {
            restaurant,
            boards: [date_night].into_iter().collect(),
            quick_saves_board: Some(qs),
        };

        assert!(s.is_saved());
        assert_eq!(IndicatorState::from_state(&s), IndicatorState::Unsaved);
    }

    #[test]
    fn tap_flips_optimistically_and_loads() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);

        indicator.begin_tap();
        assert_eq!(
            indicator.state(),
            IndicatorState::Loading {
                optimistic_saved: true
            }
        );
        assert!(indicator.state().shows_saved());
    }

    #[test]
    fn failure_reverts_to_pre_tap_state() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);
        indicator.apply_state(&state(restaurant, true));
        let before = indicator.state();

        let ticket = indicator.begin_tap();
        let completion = indicator.complete(ticket, &failed(), None);

        assert_eq!(completion, Completion::Applied(before));
        assert_eq!(indicator.state(), IndicatorState::Saved);
    }

    #[test]
    fn selection_needed_reconciles_instead_of_trusting_the_flip() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);
        let current = state(restaurant, false);

        let ticket = indicator.begin_tap();
        let outcome = ToggleOutcome::NeedsBoardSelection {
            state: current.clone(),
        };
        indicator.complete(ticket, &outcome, Some(&current));

        assert_eq!(indicator.state(), IndicatorState::Unsaved);
    }

    #[test]
    fn success_adopts_reconciled_state() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);

        let ticket = indicator.begin_tap();
        let outcome = ToggleOutcome::Saved {
            board: BoardId::new(),
        };
        let completion = indicator.complete(ticket, &outcome, Some(&state(restaurant, true)));

        assert_eq!(completion, Completion::Applied(IndicatorState::Saved));
    }

    #[test]
    fn rebinding_makes_old_tickets_stale() {
        let user = UserId::new();
        let first = RestaurantId::new();
        let second = RestaurantId::new();
        let mut indicator = SaveIndicator::new(user, first);

        let ticket = indicator.begin_tap();
        indicator.rebind(user, second);

        let outcome = ToggleOutcome::Saved {
            board: BoardId::new(),
        };
        let completion = indicator.complete(ticket, &outcome, Some(&state(first, true)));
        assert_eq!(completion, Completion::Stale);
        assert_eq!(indicator.state(), IndicatorState::Unsaved);
        assert_eq!(indicator.restaurant(), second);
    }

    #[test]
    fn only_latest_tap_settles_the_icon() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);

        let first = indicator.begin_tap();
        let second = indicator.begin_tap();
        assert_eq!(
            indicator.state(),
            IndicatorState::Loading {
                optimistic_saved: false
            }
        );

        let saved = ToggleOutcome::Saved {
            board: BoardId::new(),
        };
        assert_eq!(
            indicator.complete(first, &saved, Some(&state(restaurant, true))),
            Completion::Stale
        );
        assert!(indicator.state().is_loading());

        let unsaved = ToggleOutcome::Unsaved {
            board: BoardId::new(),
        };
        assert_eq!(
            indicator.complete(second, &unsaved, Some(&state(restaurant, false))),
            Completion::Applied(IndicatorState::Unsaved)
        );
    }

    #[test]
    fn overlapping_failed_taps_settle_on_last_known_state() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);
        indicator.apply_state(&state(restaurant, false));

        let first = indicator.begin_tap();
        let second = indicator.begin_tap();

        assert_eq!(
            indicator.complete(first, &failed(), None),
            Completion::Stale
        );
        assert_eq!(
            indicator.complete(second, &failed(), None),
            Completion::Applied(IndicatorState::Unsaved)
        );
        assert_eq!(indicator.state(), IndicatorState::Unsaved);
    }

    #[test]
    fn unreconciled_success_keeps_last_known_state() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);
        indicator.apply_state(&state(restaurant, true));

        let first = indicator.begin_tap();
        let second = indicator.begin_tap();
        indicator.complete(first, &failed(), None);
        let saved = ToggleOutcome::Saved {
            board: BoardId::new(),
        };

        assert_eq!(
            indicator.complete(second, &saved, None),
            Completion::Applied(IndicatorState::Saved)
        );
    }

    #[test]
    fn next_tap_cancels_running_animation() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);

        indicator.begin_tap();
        let first = indicator.animation().unwrap();
        indicator.begin_tap();
        let second = indicator.animation().unwrap();

        assert_ne!(first.id, second.id);
        assert!(!indicator.finish_animation(first.id));
        assert!(indicator.finish_animation(second.id));
        assert!(indicator.animation().is_none());
    }

    #[test]
    fn apply_state_ignores_other_restaurants_and_pending_taps() {
        let restaurant = RestaurantId::new();
        let mut indicator = SaveIndicator::new(UserId::new(), restaurant);

        assert!(!indicator.apply_state(&state(RestaurantId::new(), true)));
        indicator.begin_tap();
        assert!(!indicator.apply_state(&state(restaurant, false)));
    }
}
