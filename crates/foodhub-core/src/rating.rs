//! # Rating Primitives
//!
//! Products are rated on a 1..=5 scale with an optional short comment.
//! Both inputs are validated at construction so the persistence layer never
//! sees an out-of-scale rate or an oversized comment.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::name::impl_validating_deserialize;

/// A rating on the 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RatingValue(u8);

impl RatingValue {
    /// Lowest permitted rate.
    pub const MIN: u8 = 1;
    /// Highest permitted rate.
    pub const MAX: u8 = 5;

    /// Create a rating value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RatingOutOfRange`] outside 1..=5.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Access the numeric rate.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for RatingValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for RatingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A free-form comment attached to a rating.
///
/// # Validation
///
/// - At most 100 characters; empty is permitted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RatingComment(String);

impl_validating_deserialize!(RatingComment);

impl RatingComment {
    /// Maximum length in characters.
    pub const MAX_LEN: usize = 100;

    /// Create a rating comment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CommentTooLong`] past [`Self::MAX_LEN`]
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::CommentTooLong);
        }
        Ok(Self(s))
    }

    /// Access the comment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RatingComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- RatingValue --

    #[test]
    fn rate_accepts_full_scale() {
        for v in 1..=5 {
            assert!(RatingValue::new(v).is_ok());
        }
    }

    #[test]
    fn rate_rejects_out_of_scale() {
        assert!(RatingValue::new(0).is_err());
        assert!(RatingValue::new(6).is_err());
        assert!(RatingValue::new(255).is_err());
    }

    #[test]
    fn rate_deserialize_validates() {
        let ok: RatingValue = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<RatingValue>("0").is_err());
        assert!(serde_json::from_str::<RatingValue>("6").is_err());
        // Does not fit u8 at all.
        assert!(serde_json::from_str::<RatingValue>("300").is_err());
    }

    #[test]
    fn rate_orders_naturally() {
        let low = RatingValue::new(2).unwrap();
        let high = RatingValue::new(4).unwrap();
        assert!(low < high);
    }

    // -- RatingComment --

    #[test]
    fn comment_accepts_free_text() {
        assert!(RatingComment::new("Слишком сладко, но вкусно!").is_ok());
        assert!(RatingComment::new("").is_ok());
        assert!(RatingComment::new("5/5 would buy again").is_ok());
    }

    #[test]
    fn comment_boundary_lengths() {
        assert!(RatingComment::new("a".repeat(100)).is_ok());
        assert!(RatingComment::new("a".repeat(101)).is_err());
        // Characters, not bytes.
        assert!(RatingComment::new("ю".repeat(100)).is_ok());
    }

    #[test]
    fn comment_serde_roundtrip() {
        let comment = RatingComment::new("too salty").unwrap();
        let json_str = serde_json::to_string(&comment).unwrap();
        let deserialized: RatingComment = serde_json::from_str(&json_str).unwrap();
        assert_eq!(comment, deserialized);
    }
}
