//! Custom Axum extractors
//!
//! Path segments are parsed into typed ids before a handler runs, so a
//! malformed id is a 400 with a JSON body instead of axum's plain-text rejection.

use std::str::FromStr;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::Deserialize;

use savectl_core::models::{BoardId, RestaurantId, UserId, ValidationError};

use super::error::ApiError;

fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = ValidationError>,
{
    Ok(raw.parse()?)
}

fn missing_segments() -> ApiError {
    ApiError::Validation(ValidationError::InvalidFormat {
        field: "path",
        reason: "missing path parameters",
    })
}

#[derive(Deserialize)]
struct UserSegment {
    user: String,
}

/// `/users/{user}/...`
pub struct UserPath(pub UserId);

impl<S> FromRequestParts<S> for UserPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<UserSegment> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| missing_segments())?;

        Ok(Self(parse_id(&raw.user)?))
    }
}

#[derive(Deserialize)]
struct SaveSegments {
    user: String,
    restaurant: String,
}

/// `/users/{user}/saves/{restaurant}/...`
pub struct SavePath {
    pub user: UserId,
    pub restaurant: RestaurantId,
}

impl<S> FromRequestParts<S> for SavePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<SaveSegments> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| missing_segments())?;

        Ok(Self {
            user: parse_id(&raw.user)?,
            restaurant: parse_id(&raw.restaurant)?,
        })
    }
}

#[derive(Deserialize)]
struct MembershipSegments {
    user: String,
    board: String,
    restaurant: String,
}

/// `/users/{user}/boards/{board}/restaurants/{restaurant}`
pub struct MembershipPath {
    pub user: UserId,
    pub board: BoardId,
    pub restaurant: RestaurantId,
}

impl<S> FromRequestParts<S> for MembershipPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<MembershipSegments> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| missing_segments())?;

        Ok(Self {
            user: parse_id(&raw.user)?,
            board: parse_id(&raw.board)?,
            restaurant: parse_id(&raw.restaurant)?,
        })
    }
}
