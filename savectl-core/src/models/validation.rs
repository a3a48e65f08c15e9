//! Rejections raised while building boards and ids from user input
//!
//! `field` names what the user typed ("board title", "restaurant id"), so
//! the message can go straight back to a client.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank board title or id after trimming
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Board title longer than the display limit
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Id that is not a UUID
    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Unknown board kind or visibility
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },
}
