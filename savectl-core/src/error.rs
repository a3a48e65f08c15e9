//! Error types for savectl-core.
//!
//! Store implementations report faults as [`StoreError`]. The resolver,
//! toggle engine and membership selector normalize those into the four-case
//! [`SaveError`] taxonomy before anything reaches a view.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BoardId, RestaurantId};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fault reported by a [`BoardStore`](crate::store::BoardStore)
#[derive(Error, Debug)]
pub enum StoreError {
    /// Board does not exist or is not owned by the acting user
    #[error("board '{board}' not found")]
    BoardNotFound { board: BoardId },

    /// Transport or storage failure
    #[error("store backend error: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    /// Wrap any backend error (sqlx, io, ...)
    pub fn backend(source: impl Into<BoxError>) -> Self {
        Self::Backend(source.into())
    }
}

/// Normalized error seen by views
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaveError {
    /// Read failed; retry or re-resolve
    #[error("could not load save state: {reason}")]
    FetchFailed { reason: String },

    /// Membership already present; the intended end state holds
    #[error("restaurant '{restaurant}' is already on board '{board}'")]
    AlreadyExists {
        board: BoardId,
        restaurant: RestaurantId,
    },

    /// Membership already absent; the intended end state holds
    #[error("restaurant '{restaurant}' is not on board '{board}'")]
    NotFound {
        board: BoardId,
        restaurant: RestaurantId,
    },

    /// Write failed
    #[error("save failed: {reason}")]
    Failed { reason: String },
}

impl SaveError {
    /// Normalize a store fault raised while reading.
    pub fn fetch(err: StoreError) -> Self {
        tracing::warn!(error = %err, "store read failed");
        Self::FetchFailed {
            reason: err.to_string(),
        }
    }

    /// Normalize a store fault raised while writing.
    pub fn write(err: StoreError) -> Self {
        tracing::warn!(error = %err, "store write failed");
        Self::Failed {
            reason: err.to_string(),
        }
    }
}

/// Invalid choice in a membership sheet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("board '{0}' is not one of the user's boards")]
    UnknownBoard(BoardId),

    #[error("board '{0}' already contains this restaurant")]
    AlreadyMember(BoardId),
}

/// Configuration loading failure
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not determine home directory")]
    NoHome,
}
