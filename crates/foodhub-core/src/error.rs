//! # Error Types — Validation Failures
//!
//! Errors produced by the validated newtype constructors in this crate.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations, and every message names the offending value so API
//! layers can surface it without extra bookkeeping.

use thiserror::Error;

/// A catalog primitive failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A name field violated the letters-and-spaces rule.
    #[error("invalid {field} {value:?}: must start with a letter and contain only letters and spaces")]
    InvalidName {
        /// Human-readable field label (e.g. "country name").
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A name field exceeded its maximum character count.
    #[error("{field} {value:?} is longer than {max} characters")]
    NameTooLong {
        /// Human-readable field label (e.g. "country name").
        field: &'static str,
        /// The rejected input.
        value: String,
        /// Maximum permitted character count.
        max: usize,
    },

    /// A taste tag slug contained characters outside letters and spaces.
    #[error("invalid taste tag slug {0:?}: must contain only letters and spaces")]
    InvalidSlug(String),

    /// A taste tag slug exceeded 50 characters.
    #[error("taste tag slug {0:?} is longer than 50 characters")]
    SlugTooLong(String),

    /// An EAN-13 code was not 13 digits or failed its check digit.
    #[error("invalid EAN-13 code {0:?}: must be 13 digits with a valid check digit")]
    InvalidEan(String),

    /// A rating value fell outside the 1..=5 scale.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    /// A rating comment exceeded 100 characters.
    #[error("rating comment is longer than 100 characters")]
    CommentTooLong,

    /// A taste polarity was neither "positive" nor "negative".
    #[error("invalid taste polarity {0:?}: expected \"positive\" or \"negative\"")]
    InvalidPolarity(String),
}
