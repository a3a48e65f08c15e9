//! Board membership sheet
//!
//! `GET` opens the sheet (creating Quick Saves if needed); `POST` confirms a
//! selection. A confirmed selection is always checked against a freshly
//! opened sheet. Boards that already hold the restaurant (added from another
//! device, or a repeated confirm) are reported as already present and never
//! written twice.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use savectl_core::models::BoardId;
use savectl_core::{CommitReport, MembershipSheet, SheetAction, SheetResult};

use crate::http::error::ApiError;
use crate::http::extractors::SavePath;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub board_ids: Vec<BoardId>,
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub report: CommitReport,
    /// False when a board failed; the client keeps the sheet open
    pub close_sheet: bool,
}

/// GET /users/{user}/saves/{restaurant}/sheet
async fn open_sheet(
    State(state): State<Arc<AppState>>,
    path: SavePath,
) -> Result<Json<MembershipSheet>, ApiError> {
    let sheet = state.selector.open(path.user, path.restaurant).await?;
    Ok(Json(sheet))
}

/// POST /users/{user}/saves/{restaurant}/sheet
async fn confirm(
    State(state): State<Arc<AppState>>,
    path: SavePath,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    if req.board_ids.is_empty() {
        return Err(ApiError::NoSelection);
    }

    let sheet = state.selector.open(path.user, path.restaurant).await?;
    let (selection, present) = sheet.split_request(req.board_ids)?;

    let mut report = if selection.is_empty() {
        CommitReport::default()
    } else {
        match state
            .selector
            .apply(&sheet, SheetAction::Confirm(selection))
            .await
        {
            SheetResult::Committed { report } => report,
            SheetResult::NoSelection | SheetResult::CreateBoardRequested => {
                return Err(ApiError::NoSelection);
            }
        }
    };
    report.already_present.splice(0..0, present);

    Ok(Json(ConfirmResponse {
        close_sheet: report.close_sheet(),
        report,
    }))
}

/// Sheet routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users/{user}/saves/{restaurant}/sheet",
        get(open_sheet).post(confirm),
    )
}
