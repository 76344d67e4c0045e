//! # Taste Tag Primitives
//!
//! Taste tags describe how a product tastes ("Sweet", "Горький") and carry a
//! polarity: positive tags are qualities people seek, negative tags are
//! qualities they avoid. Tags are attached to ratings and to categories, and
//! products can be browsed by tag slug.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::name::{impl_validating_deserialize, is_name_letter};

/// URL- and CSS-safe identifier for a taste tag.
///
/// Slugs appear in browse URLs (`/v1/products/by-tag/{slug}`) and as CSS
/// selector hooks on the frontend.
///
/// # Validation
///
/// - Non-empty; letters (ASCII or Cyrillic) and whitespace only
/// - At most 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagSlug(String);

impl_validating_deserialize!(TagSlug);

impl TagSlug {
    /// Maximum length in characters.
    pub const MAX_LEN: usize = 50;

    /// Create a validated slug.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSlug`] for empty values or values
    /// with characters outside letters and whitespace, and
    /// [`ValidationError::SlugTooLong`] past [`Self::MAX_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || !s.chars().all(|c| is_name_letter(c) || c.is_whitespace()) {
            return Err(ValidationError::InvalidSlug(s));
        }
        if s.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::SlugTooLong(s));
        }
        Ok(Self(s))
    }

    /// Access the slug string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a taste tag marks a desirable or undesirable quality.
///
/// Serialized on the wire as lowercase `"positive"` / `"negative"`; stored
/// in the database as the single-character codes `"P"` / `"N"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TastePolarity {
    Positive,
    Negative,
}

impl TastePolarity {
    /// Single-character database code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Positive => "P",
            Self::Negative => "N",
        }
    }

    /// Parse the single-character database code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPolarity`] for anything other than
    /// `"P"` or `"N"`.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code {
            "P" => Ok(Self::Positive),
            "N" => Ok(Self::Negative),
            other => Err(ValidationError::InvalidPolarity(other.to_string())),
        }
    }

    /// Capitalized label for human-readable displays, e.g. `Sweet [Positive]`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl std::str::FromStr for TastePolarity {
    type Err = ValidationError;

    /// Parse the lowercase wire form, as used in `?polarity=` query filters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(ValidationError::InvalidPolarity(other.to_string())),
        }
    }
}

impl std::fmt::Display for TastePolarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // -- TagSlug --

    #[test]
    fn slug_valid_examples() {
        assert!(TagSlug::new("sweet").is_ok());
        assert!(TagSlug::new("too salty").is_ok());
        assert!(TagSlug::new("кислый").is_ok());
    }

    #[test]
    fn slug_rejects_invalid() {
        assert!(TagSlug::new("").is_err());
        assert!(TagSlug::new("sweet-sour").is_err()); // hyphen
        assert!(TagSlug::new("tag2").is_err()); // digit
        assert!(TagSlug::new("salty!").is_err()); // punctuation
    }

    #[test]
    fn slug_boundary_lengths() {
        assert!(TagSlug::new("a".repeat(50)).is_ok());
        assert!(TagSlug::new("a".repeat(51)).is_err());
    }

    #[test]
    fn slug_serde_roundtrip() {
        let slug = TagSlug::new("bitter").unwrap();
        let json_str = serde_json::to_string(&slug).unwrap();
        let deserialized: TagSlug = serde_json::from_str(&json_str).unwrap();
        assert_eq!(slug, deserialized);
    }

    // -- TastePolarity --

    #[test]
    fn polarity_codes_roundtrip() {
        assert_eq!(TastePolarity::from_code("P").unwrap(), TastePolarity::Positive);
        assert_eq!(TastePolarity::from_code("N").unwrap(), TastePolarity::Negative);
        assert_eq!(TastePolarity::Positive.as_code(), "P");
        assert_eq!(TastePolarity::Negative.as_code(), "N");
    }

    #[test]
    fn polarity_rejects_unknown_code() {
        assert!(TastePolarity::from_code("X").is_err());
        assert!(TastePolarity::from_code("").is_err());
        assert!(TastePolarity::from_code("p").is_err()); // codes are uppercase
    }

    #[test]
    fn polarity_wire_form() {
        assert_eq!(
            serde_json::to_string(&TastePolarity::Positive).unwrap(),
            "\"positive\""
        );
        let parsed: TastePolarity = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(parsed, TastePolarity::Negative);
    }

    #[test]
    fn polarity_from_str_matches_wire_form() {
        assert_eq!(
            TastePolarity::from_str("positive").unwrap(),
            TastePolarity::Positive
        );
        assert!(TastePolarity::from_str("Positive").is_err());
        assert!(TastePolarity::from_str("P").is_err());
    }

    #[test]
    fn polarity_display_and_label() {
        assert_eq!(format!("{}", TastePolarity::Negative), "negative");
        assert_eq!(TastePolarity::Negative.label(), "Negative");
    }
}
