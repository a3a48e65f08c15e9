//! In-process store
//!
//! Enforces the same unique constraints as the PostgreSQL store. Used when
//! the server runs without a database and throughout the test suites, where
//! faults can be injected per operation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{BoardStore, MembershipDelete, MembershipInsert};
use crate::error::StoreError;
use crate::models::{
    Board, BoardId, BoardKind, NewBoard, RestaurantId, UserId, Visibility, QUICK_SAVES_TITLE,
};

/// Store operations that can carry an injected fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    BoardsForUser,
    BoardsContaining,
    FindQuickSaves,
    GetOrCreateQuickSaves,
    CreateBoard,
    InsertMembership,
    DeleteMembership,
}

/// What happens the next time a faulted operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The operation fails with a backend error
    Fail,
    /// A concurrent writer performs the same membership write first
    Race,
}

#[derive(Debug, Clone)]
struct BoardRow {
    id: BoardId,
    owner: UserId,
    title: String,
    kind: BoardKind,
    visibility: Visibility,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct MembershipRow {
    user: UserId,
}

#[derive(Default)]
struct Inner {
    /// Creation order is the listing order
    boards: Vec<BoardRow>,
    memberships: HashMap<(BoardId, RestaurantId), MembershipRow>,
    faults: HashMap<StoreOp, Fault>,
}

impl Inner {
    fn take_fault(&mut self, op: StoreOp) -> Option<Fault> {
        self.faults.remove(&op)
    }

    fn fail_if_faulted(&mut self, op: StoreOp) -> Result<(), StoreError> {
        match self.take_fault(op) {
            Some(Fault::Fail) => Err(StoreError::backend(format!("injected failure in {:?}", op))),
            // Race only has meaning for membership writes
            Some(Fault::Race) | None => Ok(()),
        }
    }

    fn to_board(&self, row: &BoardRow) -> Board {
        let restaurant_count = self
            .memberships
            .keys()
            .filter(|(board, _)| *board == row.id)
            .count() as i64;

        Board {
            id: row.id,
            owner: row.owner,
            title: row.title.clone(),
            kind: row.kind,
            visibility: row.visibility,
            restaurant_count,
            created_at: row.created_at,
        }
    }

    fn owned_board(&self, board: BoardId, user: UserId) -> Result<&BoardRow, StoreError> {
        self.boards
            .iter()
            .find(|b| b.id == board && b.owner == user)
            .ok_or(StoreError::BoardNotFound { board })
    }

    fn quick_saves(&self, user: UserId) -> Option<&BoardRow> {
        self.boards
            .iter()
            .find(|b| b.owner == user && b.kind == BoardKind::QuickSaves)
    }
}

/// In-memory [`BoardStore`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot fault for the next call of `op`.
    pub async fn inject(&self, op: StoreOp, fault: Fault) {
        self.inner.write().await.faults.insert(op, fault);
    }

    /// Number of membership rows for a (board, restaurant) pair (0 or 1).
    pub async fn membership_rows(&self, board: BoardId, restaurant: RestaurantId) -> usize {
        let inner = self.inner.read().await;
        usize::from(inner.memberships.contains_key(&(board, restaurant)))
    }

    /// Total membership rows a user holds for one restaurant.
    pub async fn memberships_of(&self, user: UserId, restaurant: RestaurantId) -> usize {
        let inner = self.inner.read().await;
        inner
            .memberships
            .iter()
            .filter(|((_, r), row)| *r == restaurant && row.user == user)
            .count()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn boards_for_user(&self, user: UserId) -> Result<Vec<Board>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.fail_if_faulted(StoreOp::BoardsForUser)?;
        let inner = &*inner;

        Ok(inner
            .boards
            .iter()
            .filter(|b| b.owner == user)
            .map(|b| inner.to_board(b))
            .collect())
    }

    async fn boards_containing(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<Vec<Board>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.fail_if_faulted(StoreOp::BoardsContaining)?;
        let inner = &*inner;

        Ok(inner
            .boards
            .iter()
            .filter(|b| b.owner == user && inner.memberships.contains_key(&(b.id, restaurant)))
            .map(|b| inner.to_board(b))
            .collect())
    }

    async fn find_quick_saves(&self, user: UserId) -> Result<Option<Board>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.fail_if_faulted(StoreOp::FindQuickSaves)?;
        let inner = &*inner;

        Ok(inner.quick_saves(user).map(|b| inner.to_board(b)))
    }

    async fn get_or_create_quick_saves(&self, user: UserId) -> Result<Board, StoreError> {
        let mut inner = self.inner.write().await;
        inner.fail_if_faulted(StoreOp::GetOrCreateQuickSaves)?;

        if let Some(existing) = inner.quick_saves(user) {
            return Ok(inner.to_board(existing));
        }

        let row = BoardRow {
            id: BoardId::new(),
            owner: user,
            title: QUICK_SAVES_TITLE.to_owned(),
            kind: BoardKind::QuickSaves,
            visibility: Visibility::Private,
            created_at: Utc::now(),
        };
        tracing::debug!(%user, board = %row.id, "created quick saves board");
        let board = inner.to_board(&row);
        inner.boards.push(row);
        Ok(board)
    }

    async fn create_board(&self, user: UserId, board: NewBoard) -> Result<Board, StoreError> {
        let mut inner = self.inner.write().await;
        inner.fail_if_faulted(StoreOp::CreateBoard)?;

        let row = BoardRow {
            id: BoardId::new(),
            owner: user,
            title: board.title.into_string(),
            kind: BoardKind::Custom,
            visibility: board.visibility,
            created_at: Utc::now(),
        };
        let created = inner.to_board(&row);
        inner.boards.push(row);
        Ok(created)
    }

    async fn insert_membership(
        &self,
        board: BoardId,
        restaurant: RestaurantId,
        user: UserId,
    ) -> Result<MembershipInsert, StoreError> {
        let mut inner = self.inner.write().await;
        let fault = inner.take_fault(StoreOp::InsertMembership);
        if fault == Some(Fault::Fail) {
            return Err(StoreError::backend("injected failure in InsertMembership"));
        }
        inner.owned_board(board, user)?;

        if fault == Some(Fault::Race) {
            inner
                .memberships
                .insert((board, restaurant), MembershipRow { user });
        }

        if inner.memberships.contains_key(&(board, restaurant)) {
            return Ok(MembershipInsert::AlreadyExists);
        }
        inner
            .memberships
            .insert((board, restaurant), MembershipRow { user });
        Ok(MembershipInsert::Inserted)
    }

    async fn delete_membership(
        &self,
        board: BoardId,
        restaurant: RestaurantId,
        user: UserId,
    ) -> Result<MembershipDelete, StoreError> {
        let mut inner = self.inner.write().await;
        let fault = inner.take_fault(StoreOp::DeleteMembership);
        if fault == Some(Fault::Fail) {
            return Err(StoreError::backend("injected failure in DeleteMembership"));
        }
        inner.owned_board(board, user)?;

        if fault == Some(Fault::Race) {
            inner.memberships.remove(&(board, restaurant));
        }

        match inner.memberships.remove(&(board, restaurant)) {
            Some(_) => Ok(MembershipDelete::Deleted),
            None => Ok(MembershipDelete::NotFound),
        }
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
