//! Bookmark session - one indicator bound to the toggle engine
//!
//! Drives the gestures of a single restaurant card:
//! - tap: optimistic flip, toggle, re-resolve, settle
//! - long-press: open the membership sheet directly, skipping the toggle
//!
//! The indicator lock is never held across a store call, so a second tap
//! can start while the first is still waiting on the store.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::SaveError;
use crate::indicator::{Completion, IndicatorState, SaveIndicator};
use crate::membership::{MembershipSelector, MembershipSheet, SheetAction, SheetResult};
use crate::models::{RestaurantId, UserId};
use crate::toggle::{NoEvents, SaveEvents, ToggleEngine, ToggleOutcome};

/// What a tap produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapResult {
    pub outcome: ToggleOutcome,
    pub completion: Completion,
}

pub struct BookmarkSession {
    user: UserId,
    restaurant: RestaurantId,
    restaurant_name: String,
    engine: ToggleEngine,
    selector: MembershipSelector,
    indicator: Arc<Mutex<SaveIndicator>>,
    events: Arc<dyn SaveEvents>,
}

impl BookmarkSession {
    pub fn new(
        engine: ToggleEngine,
        selector: MembershipSelector,
        user: UserId,
        restaurant: RestaurantId,
        restaurant_name: impl Into<String>,
    ) -> Self {
        Self {
            user,
            restaurant,
            restaurant_name: restaurant_name.into(),
            engine,
            selector,
            indicator: Arc::new(Mutex::new(SaveIndicator::new(user, restaurant))),
            events: Arc::new(NoEvents),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn SaveEvents>) -> Self {
        self.events = events;
        self
    }

    /// Shared handle for whatever renders the icon.
    pub fn indicator(&self) -> Arc<Mutex<SaveIndicator>> {
        self.indicator.clone()
    }

    pub async fn view(&self) -> IndicatorState {
        self.indicator.lock().await.state()
    }

    /// Re-resolve from the store and show the result.
    pub async fn refresh(&self) -> Result<IndicatorState, SaveError> {
        let state = self
            .engine
            .resolver()
            .resolve(self.user, self.restaurant)
            .await?;

        let mut indicator = self.indicator.lock().await;
        indicator.apply_state(&state);
        Ok(indicator.state())
    }

    pub async fn tap(&self) -> TapResult {
        let ticket = self.indicator.lock().await.begin_tap();

        let outcome = self
            .engine
            .toggle_with_events(
                ticket.user,
                ticket.restaurant,
                &self.restaurant_name,
                self.events.as_ref(),
            )
            .await;

        // Failed taps revert without another round trip
        let reconciled = if outcome.is_failed() {
            None
        } else {
            match self
                .engine
                .resolver()
                .resolve(ticket.user, ticket.restaurant)
                .await
            {
                Ok(state) => Some(state),
                Err(err) => {
                    tracing::warn!(error = %err, restaurant = %ticket.restaurant, "could not reconcile after tap");
                    None
                }
            }
        };

        let completion = self
            .indicator
            .lock()
            .await
            .complete(ticket, &outcome, reconciled.as_ref());

        TapResult {
            outcome,
            completion,
        }
    }

    /// Open the membership sheet regardless of current state.
    pub async fn long_press(&self) -> Result<MembershipSheet, SaveError> {
        self.selector.open(self.user, self.restaurant).await
    }

    /// Leave the sheet, then refresh the icon from the store.
    pub async fn close_sheet(&self, sheet: &MembershipSheet, action: SheetAction) -> SheetResult {
        let result = self.selector.apply(sheet, action).await;
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, restaurant = %self.restaurant, "could not refresh after sheet");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Fault, MemoryStore, StoreOp};

    fn session(store: Arc<MemoryStore>) -> BookmarkSession {
        BookmarkSession::new(
            ToggleEngine::new(store.clone()),
            MembershipSelector::new(store),
            UserId::new(),
            RestaurantId::new(),
            "Zuni Café",
        )
    }

    #[tokio::test]
    async fn tap_settles_on_store_state() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store);

        assert_eq!(session.refresh().await.unwrap(), IndicatorState::Unsaved);

        let result = session.tap().await;
        assert!(matches!(result.outcome, ToggleOutcome::Saved { .. }));
        assert_eq!(result.completion, Completion::Applied(IndicatorState::Saved));

        let result = session.tap().await;
        assert!(matches!(result.outcome, ToggleOutcome::Unsaved { .. }));
        assert_eq!(session.view().await, IndicatorState::Unsaved);
    }

    #[tokio::test]
    async fn failed_tap_rolls_back() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());
        session.tap().await;
        let before = session.view().await;

        store.inject(StoreOp::DeleteMembership, Fault::Fail).await;
        let result = session.tap().await;

        assert!(result.outcome.is_failed());
        assert_eq!(session.view().await, before);
        assert_eq!(before, IndicatorState::Saved);
    }

    #[tokio::test]
    async fn long_press_bypasses_toggle() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        let sheet = session.long_press().await.unwrap();
        assert_eq!(sheet.selectable(), vec![sheet.quick_saves.board.id]);
        assert_eq!(store.memberships_of(sheet.user, sheet.restaurant).await, 0);

        let selection = sheet.select_all([sheet.quick_saves.board.id]).unwrap();
        let result = session
            .close_sheet(&sheet, SheetAction::Confirm(selection))
            .await;
        assert!(matches!(result, SheetResult::Committed { .. }));
        assert_eq!(session.view().await, IndicatorState::Saved);
    }
}
