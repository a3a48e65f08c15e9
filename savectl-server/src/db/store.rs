//! PostgreSQL board store
//!
//! Concurrency rests on two constraints created by the migrations:
//! - primary key `(board_id, restaurant_id)` on `board_memberships`
//! - partial unique index on `boards(owner_id) WHERE kind = 'quick_saves'`
//!
//! Inserts use `ON CONFLICT`, so two clients racing on the same row end
//! with one `Inserted` and one `AlreadyExists`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use savectl_core::models::{
    Board, BoardId, BoardKind, NewBoard, RestaurantId, UserId, Visibility, QUICK_SAVES_TITLE,
};
use savectl_core::{BoardStore, MembershipDelete, MembershipInsert, StoreError};

/// [`BoardStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgBoardStore {
    pool: PgPool,
}

impl PgBoardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn owns_board(&self, board: BoardId, user: UserId) -> Result<bool, StoreError> {
        let (owned,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM boards WHERE id = $1 AND owner_id = $2)")
                .bind(board.as_uuid())
                .bind(user.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::backend)?;
        Ok(owned)
    }
}

fn board_from_row(row: &PgRow) -> Result<Board, StoreError> {
    let kind: String = row.try_get("kind").map_err(StoreError::backend)?;
    let visibility: String = row.try_get("visibility").map_err(StoreError::backend)?;

    Ok(Board {
        id: BoardId::from_uuid(row.try_get::<Uuid, _>("id").map_err(StoreError::backend)?),
        owner: UserId::from_uuid(
            row.try_get::<Uuid, _>("owner_id")
                .map_err(StoreError::backend)?,
        ),
        title: row.try_get("title").map_err(StoreError::backend)?,
        kind: kind.parse::<BoardKind>().map_err(StoreError::backend)?,
        visibility: visibility.parse::<Visibility>().map_err(StoreError::backend)?,
        restaurant_count: row.try_get("restaurant_count").map_err(StoreError::backend)?,
        created_at: row.try_get("created_at").map_err(StoreError::backend)?,
    })
}

fn boards_from_rows(rows: &[PgRow]) -> Result<Vec<Board>, StoreError> {
    rows.iter().map(board_from_row).collect()
}

#[async_trait]
impl BoardStore for PgBoardStore {
    async fn boards_for_user(&self, user: UserId) -> Result<Vec<Board>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.id, b.owner_id, b.title, b.kind, b.visibility, b.created_at,
                COUNT(m.restaurant_id) AS restaurant_count
            FROM boards b
            LEFT JOIN board_memberships m ON m.board_id = b.id
            WHERE b.owner_id = $1
            GROUP BY b.id
            ORDER BY b.created_at, b.id
            "#,
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        boards_from_rows(&rows)
    }

    async fn boards_containing(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<Vec<Board>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.id, b.owner_id, b.title, b.kind, b.visibility, b.created_at,
                COUNT(c.restaurant_id) AS restaurant_count
            FROM boards b
            JOIN board_memberships m
                ON m.board_id = b.id AND m.restaurant_id = $2
            LEFT JOIN board_memberships c ON c.board_id = b.id
            WHERE b.owner_id = $1
            GROUP BY b.id
            ORDER BY b.created_at, b.id
            "#,
        )
        .bind(user.as_uuid())
        .bind(restaurant.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        boards_from_rows(&rows)
    }

    async fn find_quick_saves(&self, user: UserId) -> Result<Option<Board>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                b.id, b.owner_id, b.title, b.kind, b.visibility, b.created_at,
                COUNT(m.restaurant_id) AS restaurant_count
            FROM boards b
            LEFT JOIN board_memberships m ON m.board_id = b.id
            WHERE b.owner_id = $1 AND b.kind = 'quick_saves'
            GROUP BY b.id
            "#,
        )
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.as_ref().map(board_from_row).transpose()
    }

    /// Upsert against the partial unique index, then count in one query.
    async fn get_or_create_quick_saves(&self, user: UserId) -> Result<Board, StoreError> {
        let row = sqlx::query(
            r#"
            WITH upserted AS (
                INSERT INTO boards (owner_id, title, kind)
                VALUES ($1, $2, 'quick_saves')
                ON CONFLICT (owner_id) WHERE kind = 'quick_saves'
                DO UPDATE SET kind = EXCLUDED.kind
                RETURNING id, owner_id, title, kind, visibility, created_at
            )
            SELECT
                u.id, u.owner_id, u.title, u.kind, u.visibility, u.created_at,
                COUNT(m.restaurant_id) AS restaurant_count
            FROM upserted u
            LEFT JOIN board_memberships m ON m.board_id = u.id
            GROUP BY u.id, u.owner_id, u.title, u.kind, u.visibility, u.created_at
            "#,
        )
        .bind(user.as_uuid())
        .bind(QUICK_SAVES_TITLE)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        board_from_row(&row)
    }

    async fn create_board(&self, user: UserId, board: NewBoard) -> Result<Board, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO boards (owner_id, title, kind, visibility)
            VALUES ($1, $2, 'custom', $3)
            RETURNING
                id, owner_id, title, kind, visibility, created_at,
                0::BIGINT AS restaurant_count
            "#,
        )
        .bind(user.as_uuid())
        .bind(board.title.as_str())
        .bind(board.visibility.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let created = board_from_row(&row)?;
        tracing::info!(%user, board = %created.id, title = %created.title, "created board");
        Ok(created)
    }

    async fn insert_membership(
        &self,
        board: BoardId,
        restaurant: RestaurantId,
        user: UserId,
    ) -> Result<MembershipInsert, StoreError> {
        // Ownership is part of the insert; a conflict or a foreign board both return no row
        let inserted = sqlx::query(
            r#"
            INSERT INTO board_memberships (board_id, restaurant_id, user_id)
            SELECT b.id, $2, $3 FROM boards b
            WHERE b.id = $1 AND b.owner_id = $3
            ON CONFLICT (board_id, restaurant_id) DO NOTHING
            RETURNING board_id
            "#,
        )
        .bind(board.as_uuid())
        .bind(restaurant.as_uuid())
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if inserted.is_some() {
            return Ok(MembershipInsert::Inserted);
        }
        if self.owns_board(board, user).await? {
            Ok(MembershipInsert::AlreadyExists)
        } else {
            Err(StoreError::BoardNotFound { board })
        }
    }

    async fn delete_membership(
        &self,
        board: BoardId,
        restaurant: RestaurantId,
        user: UserId,
    ) -> Result<MembershipDelete, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM board_memberships m
            USING boards b
            WHERE m.board_id = $1
              AND m.restaurant_id = $2
              AND b.id = m.board_id
              AND b.owner_id = $3
            "#,
        )
        .bind(board.as_uuid())
        .bind(restaurant.as_uuid())
        .bind(user.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() > 0 {
            return Ok(MembershipDelete::Deleted);
        }
        if self.owns_board(board, user).await? {
            Ok(MembershipDelete::NotFound)
        } else {
            Err(StoreError::BoardNotFound { board })
        }
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
