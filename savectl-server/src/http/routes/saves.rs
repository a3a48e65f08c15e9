//! Save state and the one-tap toggle

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use savectl_core::models::{SaveState, ValidationError};
use savectl_core::{IndicatorState, ToggleOutcome};

use crate::http::error::ApiError;
use crate::http::extractors::SavePath;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SaveStateResponse {
    pub state: SaveState,
    /// What the bookmark icon should show (Quick Saves membership only)
    pub indicator: IndicatorState,
}

impl From<SaveState> for SaveStateResponse {
    fn from(state: SaveState) -> Self {
        Self {
            indicator: IndicatorState::from_state(&state),
            state,
        }
    }
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub restaurant_name: String,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub outcome: ToggleOutcome,
    /// State re-resolved after the tap; absent if that read failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciled: Option<SaveStateResponse>,
}

/// GET /users/{user}/saves/{restaurant}
async fn get_state(
    State(state): State<Arc<AppState>>,
    path: SavePath,
) -> Result<Json<SaveStateResponse>, ApiError> {
    let resolved = state
        .engine
        .resolver()
        .resolve(path.user, path.restaurant)
        .await?;
    Ok(Json(resolved.into()))
}

/// POST /users/{user}/saves/{restaurant}/toggle
///
/// A failed write is an error response; every other outcome is 200.
async fn toggle(
    State(state): State<Arc<AppState>>,
    path: SavePath,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let name = req.restaurant_name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty {
            field: "restaurant name",
        }
        .into());
    }

    let outcome = state.engine.toggle(path.user, path.restaurant, name).await;
    if let ToggleOutcome::Failed { error } = outcome {
        return Err(error.into());
    }

    let reconciled = match state
        .engine
        .resolver()
        .resolve(path.user, path.restaurant)
        .await
    {
        Ok(resolved) => Some(resolved.into()),
        Err(err) => {
            tracing::warn!(error = %err, restaurant = %path.restaurant, "could not reconcile after toggle");
            None
        }
    };

    Ok(Json(ToggleResponse {
        outcome,
        reconciled,
    }))
}

/// Save routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{user}/saves/{restaurant}", get(get_state))
        .route("/users/{user}/saves/{restaurant}/toggle", post(toggle))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use savectl_core::models::{BoardTitle, NewBoard};
    use savectl_core::store::{Fault, StoreOp};
    use savectl_core::{BoardStore, MixedMembership, RestaurantId, UserId};

    use crate::http::testing::{app, app_with_policy, send};

    fn body() -> Option<serde_json::Value> {
        Some(json!({ "restaurant_name": "Nopa" }))
    }

    #[tokio::test]
    async fn fresh_restaurant_is_unsaved() {
        let (app, _store) = app();
        let uri = format!("/users/{}/saves/{}", UserId::new(), RestaurantId::new());

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["indicator"]["state"], "unsaved");
        assert_eq!(body["state"]["boards"], json!([]));
    }

    #[tokio::test]
    async fn toggle_saves_then_unsaves() {
        let (app, store) = app();
        let user = UserId::new();
        let restaurant = RestaurantId::new();
        let uri = format!("/users/{}/saves/{}/toggle", user, restaurant);

        let (status, first) = send(&app, "POST", &uri, body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["outcome"]["outcome"], "saved");
        assert_eq!(first["reconciled"]["indicator"]["state"], "saved");
        assert_eq!(store.memberships_of(user, restaurant).await, 1);

        let (status, second) = send(&app, "POST", &uri, body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["outcome"]["outcome"], "unsaved");
        assert_eq!(second["reconciled"]["indicator"]["state"], "unsaved");
        assert_eq!(store.memberships_of(user, restaurant).await, 0);
    }

    #[tokio::test]
    async fn custom_only_asks_for_selection() {
        let (app, store) = app();
        let user = UserId::new();
        let restaurant = RestaurantId::new();
        let board = store
            .create_board(user, NewBoard::new(BoardTitle::new("Date Night").unwrap()))
            .await
            .unwrap();
        store
            .insert_membership(board.id, restaurant, user)
            .await
            .unwrap();

        let uri = format!("/users/{}/saves/{}/toggle", user, restaurant);
        let (status, body) = send(&app, "POST", &uri, body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"]["outcome"], "needs_board_selection");
        assert_eq!(body["reconciled"]["indicator"]["state"], "unsaved");
        assert_eq!(store.memberships_of(user, restaurant).await, 1);
    }

    #[tokio::test]
    async fn require_selection_policy_leaves_mixed_membership_alone() {
        let (app, store) = app_with_policy(MixedMembership::RequireSelection);
        let user = UserId::new();
        let restaurant = RestaurantId::new();
        let qs = store.get_or_create_quick_saves(user).await.unwrap();
        let brunch = store
            .create_board(user, NewBoard::new(BoardTitle::new("Brunch").unwrap()))
            .await
            .unwrap();
        for board in [qs.id, brunch.id] {
            store
                .insert_membership(board, restaurant, user)
                .await
                .unwrap();
        }

        let uri = format!("/users/{}/saves/{}/toggle", user, restaurant);
        let (_, body) = send(&app, "POST", &uri, body()).await;

        assert_eq!(body["outcome"]["outcome"], "needs_board_selection");
        assert_eq!(store.memberships_of(user, restaurant).await, 2);
    }

    #[tokio::test]
    async fn write_failure_is_502() {
        let (app, store) = app();
        store
            .inject(StoreOp::GetOrCreateQuickSaves, Fault::Fail)
            .await;

        let uri = format!("/users/{}/saves/{}/toggle", UserId::new(), RestaurantId::new());
        let (status, body) = send(&app, "POST", &uri, body()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "save_failed");
    }

    #[tokio::test]
    async fn read_failure_is_503() {
        let (app, store) = app();
        store.inject(StoreOp::BoardsContaining, Fault::Fail).await;

        let uri = format!("/users/{}/saves/{}", UserId::new(), RestaurantId::new());
        let (status, body) = send(&app, "GET", &uri, None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "fetch_failed");
    }

    #[tokio::test]
    async fn blank_name_is_400() {
        let (app, _store) = app();
        let uri = format!("/users/{}/saves/{}/toggle", UserId::new(), RestaurantId::new());

        let (status, _) = send(&app, "POST", &uri, Some(json!({ "restaurant_name": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
