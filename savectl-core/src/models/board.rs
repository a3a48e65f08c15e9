//! Boards: user-owned collections of restaurants.
//!
//! Every user has at most one Quick Saves board. It is identified by
//! [`BoardKind::QuickSaves`], never by its title; a custom board titled
//! "Quick Saves" is still a custom board.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BoardId, UserId, ValidationError};

/// Maximum length for board titles
const MAX_BOARD_TITLE_LEN: usize = 64;

/// Display title given to the implicit default board
pub const QUICK_SAVES_TITLE: &str = "Quick Saves";

/// What role a board plays for its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    /// The implicit default board used by the one-tap bookmark
    QuickSaves,
    /// A board created explicitly by the user
    Custom,
}

impl BoardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickSaves => "quick_saves",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for BoardKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick_saves" => Ok(Self::QuickSaves),
            "custom" => Ok(Self::Custom),
            other => Err(ValidationError::InvalidVariant {
                field: "board kind",
                value: other.to_owned(),
            }),
        }
    }
}

/// Who can see a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            other => Err(ValidationError::InvalidVariant {
                field: "visibility",
                value: other.to_owned(),
            }),
        }
    }
}

/// Board record as returned by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub owner: UserId,
    pub title: String,
    pub kind: BoardKind,
    pub visibility: Visibility,
    /// Number of restaurants currently on the board
    pub restaurant_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Board {
    pub fn is_quick_saves(&self) -> bool {
        self.kind == BoardKind::QuickSaves
    }
}

/// Validated board title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardTitle(String);

impl BoardTitle {
    /// Create a new board title.
    ///
    /// Surrounding whitespace is trimmed; the result must be non-empty and
    /// at most 64 characters.
    ///
    /// # Example
    /// ```
    /// use savectl_core::models::BoardTitle;
    ///
    /// assert_eq!(BoardTitle::new("  Date Night ").unwrap().as_str(), "Date Night");
    /// assert!(BoardTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "board title" });
        }

        if trimmed.chars().count() > MAX_BOARD_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "board title",
                max: MAX_BOARD_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for BoardTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Input for creating a custom board
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub title: BoardTitle,
    pub visibility: Visibility,
}

impl NewBoard {
    pub fn new(title: BoardTitle) -> Self {
        Self {
            title,
            visibility: Visibility::default(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}
