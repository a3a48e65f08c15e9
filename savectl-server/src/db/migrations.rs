//! Schema for boards and memberships
//!
//! Idempotent; safe to run on every start.

use sqlx::PgPool;

/// Create tables and indexes if missing.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("running savectl migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS boards (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            title TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'custom'
                CHECK (kind IN ('quick_saves', 'custom')),
            visibility TEXT NOT NULL DEFAULT 'private'
                CHECK (visibility IN ('private', 'public')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one Quick Saves board per user
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS boards_one_quick_saves
            ON boards (owner_id) WHERE kind = 'quick_saves'
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS boards_owner_idx ON boards (owner_id, created_at)")
        .execute(pool)
        .await?;

    // At most one row per (board, restaurant)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS board_memberships (
            board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
            restaurant_id UUID NOT NULL,
            user_id UUID NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (board_id, restaurant_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS board_memberships_user_restaurant_idx
            ON board_memberships (user_id, restaurant_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("migrations complete");
    Ok(())
}
