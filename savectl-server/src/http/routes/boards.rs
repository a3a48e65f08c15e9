//! Board endpoints
//!
//! - `GET  /users/{user}/boards` - every board the user owns, Quick Saves included
//! - `POST /users/{user}/boards` - create a custom board
//! - `DELETE /users/{user}/boards/{board}/restaurants/{restaurant}` - remove one membership

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use savectl_core::models::{Board, BoardTitle, NewBoard, Visibility};
use savectl_core::{Removal, SaveError};

use crate::http::error::ApiError;
use crate::http::extractors::{MembershipPath, UserPath};
use crate::http::server::AppState;

/// Create board request
#[derive(Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(default)]
    pub visibility: Option<String>,
}

/// GET /users/{user}/boards
async fn list_boards(
    State(state): State<Arc<AppState>>,
    UserPath(user): UserPath,
) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = state
        .store
        .boards_for_user(user)
        .await
        .map_err(SaveError::fetch)?;
    Ok(Json(boards))
}

/// POST /users/{user}/boards
async fn create_board(
    State(state): State<Arc<AppState>>,
    UserPath(user): UserPath,
    Json(req): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let title = BoardTitle::new(&req.title)?;
    let visibility = match req.visibility.as_deref() {
        Some(raw) => raw.parse::<Visibility>()?,
        None => Visibility::default(),
    };

    let board = state
        .store
        .create_board(user, NewBoard::new(title).with_visibility(visibility))
        .await
        .map_err(SaveError::write)?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// DELETE /users/{user}/boards/{board}/restaurants/{restaurant}
///
/// 204 whether the row was removed now or was already gone.
async fn remove_membership(
    State(state): State<Arc<AppState>>,
    path: MembershipPath,
) -> Result<StatusCode, ApiError> {
    let owned = state
        .store
        .boards_for_user(path.user)
        .await
        .map_err(SaveError::fetch)?
        .iter()
        .any(|b| b.id == path.board);
    if !owned {
        return Err(ApiError::NotFound {
            resource: "board",
            id: path.board.to_string(),
        });
    }

    match state
        .selector
        .remove(path.user, path.board, path.restaurant)
        .await?
    {
        Removal::Removed | Removal::AlreadyAbsent => Ok(StatusCode::NO_CONTENT),
    }
}

/// Board routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{user}/boards", get(list_boards).post(create_board))
        .route(
            "/users/{user}/boards/{board}/restaurants/{restaurant}",
            delete(remove_membership),
        )
}
