//! Board membership sheet - explicit multi-board selection
//!
//! Opened by a long-press, or after a tap answered `NeedsBoardSelection`.
//! Boards that already contain the restaurant are shown checked and
//! cannot be selected again, so the sheet never asks the store for a
//! duplicate row. Quick Saves is always listed separately and first.
//!
//! Commit policy:
//! - empty selection writes nothing and reports `NoSelection`
//! - inserts run one at a time, Quick Saves first, then list order
//! - `AlreadyExists` means the board is already in the desired state
//! - the first hard failure stops the remaining inserts; rows already
//!   written stay, and the sheet stays open listing failed and skipped boards

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::TryFutureExt;
use serde::{Deserialize, Serialize};

use crate::error::{SaveError, SelectionError};
use crate::models::{Board, BoardId, RestaurantId, UserId};
use crate::store::{BoardStore, MembershipDelete, MembershipInsert};

/// One row of the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardOption {
    pub board: Board,
    /// Rendered checked and disabled
    pub already_member: bool,
}

impl BoardOption {
    pub fn is_selectable(&self) -> bool {
        !self.already_member
    }
}

/// Contents of an opened membership sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipSheet {
    pub user: UserId,
    pub restaurant: RestaurantId,
    pub quick_saves: BoardOption,
    /// Custom boards, in store order
    pub boards: Vec<BoardOption>,
}

impl MembershipSheet {
    /// All options, Quick Saves first.
    pub fn options(&self) -> impl Iterator<Item = &BoardOption> {
        std::iter::once(&self.quick_saves).chain(self.boards.iter())
    }

    /// Boards the user may still add the restaurant to.
    pub fn selectable(&self) -> Vec<BoardId> {
        self.options()
            .filter(|o| o.is_selectable())
            .map(|o| o.board.id)
            .collect()
    }

    fn option(&self, board: BoardId) -> Option<&BoardOption> {
        self.options().find(|o| o.board.id == board)
    }

    /// Start an empty selection for this sheet.
    pub fn selection(&self) -> Selection {
        Selection::default()
    }

    /// Validate a board choice against this sheet.
    pub fn check(&self, board: BoardId) -> Result<(), SelectionError> {
        match self.option(board) {
            None => Err(SelectionError::UnknownBoard(board)),
            Some(o) if o.already_member => Err(SelectionError::AlreadyMember(board)),
            Some(_) => Ok(()),
        }
    }

    /// Build a selection from raw board ids, rejecting any invalid choice.
    pub fn select_all(
        &self,
        boards: impl IntoIterator<Item = BoardId>,
    ) -> Result<Selection, SelectionError> {
        let mut selection = self.selection();
        for board in boards {
            selection.add(self, board)?;
        }
        Ok(selection)
    }

    /// Split requested ids into a selection and the boards that already
    /// hold the restaurant. Unknown boards are still rejected.
    pub fn split_request(
        &self,
        boards: impl IntoIterator<Item = BoardId>,
    ) -> Result<(Selection, Vec<BoardId>), SelectionError> {
        let mut selection = self.selection();
        let mut present = Vec::new();
        for board in boards {
            match self.check(board) {
                Ok(()) => {
                    selection.boards.insert(board);
                }
                Err(SelectionError::AlreadyMember(board)) => {
                    if !present.contains(&board) {
                        present.push(board);
                    }
                }
                Err(err) => return Err(err),
            }
        }
        Ok((selection, present))
    }

    /// Selected ids in commit order: Quick Saves, then list order.
    fn commit_order(&self, selection: &Selection) -> Vec<BoardId> {
        self.options()
            .map(|o| o.board.id)
            .filter(|id| selection.boards.contains(id))
            .collect()
    }
}

/// Boards chosen in a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    boards: BTreeSet<BoardId>,
}

impl Selection {
    pub fn add(&mut self, sheet: &MembershipSheet, board: BoardId) -> Result<(), SelectionError> {
        sheet.check(board)?;
        self.boards.insert(board);
        Ok(())
    }

    /// Flip a checkbox. Returns whether the board is now selected.
    pub fn toggle(
        &mut self,
        sheet: &MembershipSheet,
        board: BoardId,
    ) -> Result<bool, SelectionError> {
        if self.boards.remove(&board) {
            return Ok(false);
        }
        self.add(sheet, board)?;
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn contains(&self, board: BoardId) -> bool {
        self.boards.contains(&board)
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }
}

/// How the user left the sheet
#[derive(Debug, Clone)]
pub enum SheetAction {
    Confirm(Selection),
    /// Leave to board creation; the user re-opens the sheet afterwards
    CreateNewBoard,
    Dismiss,
}

/// Per-board results of a confirmed selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub added: Vec<BoardId>,
    /// Another writer got there first; counted as success
    pub already_present: Vec<BoardId>,
    pub failure: Option<BoardFailure>,
    /// Not attempted because an earlier insert failed
    pub skipped: Vec<BoardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFailure {
    pub board: BoardId,
    pub error: SaveError,
}

impl CommitReport {
    /// Boards that now hold the restaurant because of this commit.
    pub fn committed(&self) -> Vec<BoardId> {
        self.added
            .iter()
            .chain(self.already_present.iter())
            .copied()
            .collect()
    }

    /// The sheet closes only when every selected board succeeded.
    pub fn close_sheet(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of leaving the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SheetResult {
    Committed { report: CommitReport },
    NoSelection,
    CreateBoardRequested,
}

/// Removal of one membership from one specific board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    Removed,
    /// Already absent; the end state matches
    AlreadyAbsent,
}

#[derive(Clone)]
pub struct MembershipSelector {
    store: Arc<dyn BoardStore>,
}

impl MembershipSelector {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Load the sheet for a restaurant, creating Quick Saves if needed.
    pub async fn open(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<MembershipSheet, SaveError> {
        // creating Quick Saves is a write
        let (all, containing, quick_saves) = futures::try_join!(
            self.store.boards_for_user(user).map_err(SaveError::fetch),
            self.store
                .boards_containing(user, restaurant)
                .map_err(SaveError::fetch),
            self.store
                .get_or_create_quick_saves(user)
                .map_err(SaveError::write),
        )?;

        let members: BTreeSet<BoardId> = containing.iter().map(|b| b.id).collect();
        let boards = all
            .into_iter()
            .filter(|b| !b.is_quick_saves())
            .map(|board| BoardOption {
                already_member: members.contains(&board.id),
                board,
            })
            .collect();

        let sheet = MembershipSheet {
            user,
            restaurant,
            quick_saves: BoardOption {
                already_member: members.contains(&quick_saves.id),
                board: quick_saves,
            },
            boards,
        };
        tracing::debug!(
            %user,
            %restaurant,
            boards = sheet.boards.len(),
            selectable = sheet.selectable().len(),
            "opened membership sheet"
        );
        Ok(sheet)
    }

    /// Apply the user's exit action.
    pub async fn apply(&self, sheet: &MembershipSheet, action: SheetAction) -> SheetResult {
        match action {
            SheetAction::CreateNewBoard => SheetResult::CreateBoardRequested,
            SheetAction::Dismiss => SheetResult::NoSelection,
            SheetAction::Confirm(selection) if selection.is_empty() => SheetResult::NoSelection,
            SheetAction::Confirm(selection) => SheetResult::Committed {
                report: self.commit(sheet, &selection).await,
            },
        }
    }

    async fn commit(&self, sheet: &MembershipSheet, selection: &Selection) -> CommitReport {
        let mut report = CommitReport::default();
        let mut pending = sheet.commit_order(selection).into_iter();

        while let Some(board) = pending.next() {
            match self
                .store
                .insert_membership(board, sheet.restaurant, sheet.user)
                .await
            {
                Ok(MembershipInsert::Inserted) => {
                    tracing::info!(user = %sheet.user, restaurant = %sheet.restaurant, %board, "added to board");
                    report.added.push(board);
                }
                Ok(MembershipInsert::AlreadyExists) => {
                    tracing::warn!(user = %sheet.user, restaurant = %sheet.restaurant, %board, "board already had restaurant");
                    report.already_present.push(board);
                }
                Err(err) => {
                    report.failure = Some(BoardFailure {
                        board,
                        error: SaveError::write(err),
                    });
                    report.skipped = pending.by_ref().collect();
                    break;
                }
            }
        }
        report
    }

    /// Remove the restaurant from one specific board.
    pub async fn remove(
        &self,
        user: UserId,
        board: BoardId,
        restaurant: RestaurantId,
    ) -> Result<Removal, SaveError> {
        match self.store.delete_membership(board, restaurant, user).await {
            Ok(MembershipDelete::Deleted) => {
                tracing::info!(%user, %restaurant, %board, "removed from board");
                Ok(Removal::Removed)
            }
            Ok(MembershipDelete::NotFound) => Ok(Removal::AlreadyAbsent),
            Err(err) => Err(SaveError::write(err)),
        }
    }
}
