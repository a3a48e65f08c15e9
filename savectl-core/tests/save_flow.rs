//! End-to-end save flows over the in-memory store

use std::sync::Arc;

use savectl_core::indicator::IndicatorState;
use savectl_core::membership::{SheetAction, SheetResult};
use savectl_core::models::{BoardTitle, NewBoard};
use savectl_core::store::{Fault, StoreOp};
use savectl_core::{
    BookmarkSession, BoardStore, MemoryStore, MembershipSelector, RestaurantId, SaveError,
    SaveStateResolver, ToggleEngine, ToggleOutcome, UserId,
};

struct World {
    store: Arc<MemoryStore>,
    user: UserId,
    restaurant: RestaurantId,
}

impl World {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            user: UserId::new(),
            restaurant: RestaurantId::new(),
        }
    }

    fn session(&self) -> BookmarkSession {
        BookmarkSession::new(
            ToggleEngine::new(self.store.clone()),
            MembershipSelector::new(self.store.clone()),
            self.user,
            self.restaurant,
            "Tartine",
        )
    }
}

#[tokio::test]
async fn quick_saves_then_brunch_then_unsave() {
    let world = World::new();
    let brunch = world
        .store
        .create_board(world.user, NewBoard::new(BoardTitle::new("Brunch").unwrap()))
        .await
        .unwrap()
        .id;
    let qs = world
        .store
        .get_or_create_quick_saves(world.user)
        .await
        .unwrap()
        .id;
    let session = world.session();

    // Tap: saved to quick saves
    let tap = session.tap().await;
    assert_eq!(tap.outcome, ToggleOutcome::Saved { board: qs });
    assert_eq!(world.store.membership_rows(qs, world.restaurant).await, 1);

    // Long-press: quick saves is fixed, brunch selectable
    let sheet = session.long_press().await.unwrap();
    assert!(sheet.quick_saves.already_member);
    assert_eq!(sheet.selectable(), vec![brunch]);

    let selection = sheet.select_all([brunch]).unwrap();
    let result = session
        .close_sheet(&sheet, SheetAction::Confirm(selection))
        .await;
    let SheetResult::Committed { report } = result else {
        panic!("expected commit, got {:?}", result);
    };
    assert_eq!(report.added, vec![brunch]);
    assert_eq!(world.store.membership_rows(brunch, world.restaurant).await, 1);
    assert_eq!(world.store.membership_rows(qs, world.restaurant).await, 1);

    // Tap again: only the quick saves row goes
    let tap = session.tap().await;
    assert_eq!(tap.outcome, ToggleOutcome::Unsaved { board: qs });
    assert_eq!(world.store.membership_rows(qs, world.restaurant).await, 0);
    assert_eq!(world.store.membership_rows(brunch, world.restaurant).await, 1);
    assert_eq!(session.view().await, IndicatorState::Unsaved);
}

#[tokio::test]
async fn date_night_only_shows_unsaved_and_asks_for_selection() {
    let world = World::new();
    let date_night = world
        .store
        .create_board(world.user, NewBoard::new(BoardTitle::new("Date Night").unwrap()))
        .await
        .unwrap()
        .id;
    world
        .store
        .insert_membership(date_night, world.restaurant, world.user)
        .await
        .unwrap();
    let session = world.session();

    assert_eq!(session.refresh().await.unwrap(), IndicatorState::Unsaved);

    let tap = session.tap().await;
    assert!(matches!(tap.outcome, ToggleOutcome::NeedsBoardSelection { .. }));
    assert_eq!(session.view().await, IndicatorState::Unsaved);
    assert_eq!(world.store.memberships_of(world.user, world.restaurant).await, 1);
}

#[tokio::test]
async fn failed_save_leaves_indicator_as_before() {
    let world = World::new();
    let session = world.session();
    world
        .store
        .inject(StoreOp::GetOrCreateQuickSaves, Fault::Fail)
        .await;

    let before = session.view().await;
    let tap = session.tap().await;

    assert!(matches!(
        tap.outcome,
        ToggleOutcome::Failed {
            error: SaveError::Failed { .. }
        }
    ));
    assert_eq!(session.view().await, before);
    assert_eq!(world.store.memberships_of(world.user, world.restaurant).await, 0);
}

#[tokio::test]
async fn two_screens_converge_without_duplicates() {
    let world = World::new();
    let phone = world.session();
    let tablet = world.session();

    // Both screens start from "unsaved". If both resolve before either writes,
    // both insert and one lands as already present; otherwise the later tap
    // sees the row and removes it.
    let (a, b) = tokio::join!(phone.tap(), tablet.tap());
    let outcomes = [&a.outcome, &b.outcome];
    let saved = outcomes
        .iter()
        .filter(|o| matches!(o, ToggleOutcome::Saved { .. }))
        .count();
    let unsaved = outcomes
        .iter()
        .filter(|o| matches!(o, ToggleOutcome::Unsaved { .. }))
        .count();
    assert_eq!(saved + unsaved, 2, "unexpected outcomes: {:?}", outcomes);
    assert!(saved >= 1);

    let rows = world.store.memberships_of(world.user, world.restaurant).await;
    let expected_rows = if unsaved == 0 { 1 } else { 0 };
    assert_eq!(rows, expected_rows);

    let fresh = SaveStateResolver::new(world.store.clone())
        .resolve(world.user, world.restaurant)
        .await
        .unwrap();
    assert_eq!(fresh.in_quick_saves(), expected_rows == 1);
    let expected = IndicatorState::from_state(&fresh);

    assert_eq!(phone.refresh().await.unwrap(), expected);
    assert_eq!(tablet.refresh().await.unwrap(), expected);
    assert_eq!(phone.view().await, expected);
    assert_eq!(tablet.view().await, expected);
}
