//! # Name Newtypes
//!
//! Validated name types for every catalog entity. Each name is a distinct
//! type — you cannot pass a [`CountryName`] where a [`CompanyName`] is
//! expected.
//!
//! ## Validation
//!
//! All names share one rule: they must start with a letter and contain only
//! letters and whitespace. Letters are ASCII (`A-Z`, `a-z`) or Cyrillic
//! (`А-Я`, `а-я`, `Ё`, `ё`), so both "Chocolate" and "Шоколад" are valid.
//! Maximum lengths differ per entity and are counted in characters, not
//! bytes, so a 30-character Cyrillic country name fits in [`CountryName`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_validating_deserialize;

/// True for the letters name fields accept: ASCII or Cyrillic, including
/// Ё/ё (which sit outside the contiguous А..я block).
pub(crate) fn is_name_letter(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | 'А'..='я' | 'Ё' | 'ё')
}

fn validate_name(field: &'static str, s: &str, max: usize) -> Result<(), ValidationError> {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_letter(first) => {}
        _ => {
            return Err(ValidationError::InvalidName {
                field,
                value: s.to_string(),
            })
        }
    }
    if !chars.all(|c| is_name_letter(c) || c.is_whitespace()) {
        return Err(ValidationError::InvalidName {
            field,
            value: s.to_string(),
        });
    }
    if s.chars().count() > max {
        return Err(ValidationError::NameTooLong {
            field,
            value: s.to_string(),
            max,
        });
    }
    Ok(())
}

/// Helper macro defining a validated name newtype. All generated types share
/// the letters-and-spaces rule and differ only in their field label (used in
/// error messages) and maximum character count.
macro_rules! catalog_name {
    ($(#[$meta:meta])* $ty:ident, $field:literal, $max:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        pub struct $ty(String);

        impl_validating_deserialize!($ty);

        impl $ty {
            /// Maximum length in characters (not bytes).
            pub const MAX_LEN: usize = $max;

            /// Create a validated name.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::InvalidName`] if the value does not
            /// start with a letter or contains characters outside letters and
            /// whitespace, and [`ValidationError::NameTooLong`] if it exceeds
            /// [`Self::MAX_LEN`] characters.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                validate_name($field, &s, Self::MAX_LEN)?;
                Ok(Self(s))
            }

            /// Access the name string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_name!(
    /// Name of a country of origin (e.g. "Italy", "Россия").
    ///
    /// # Validation
    ///
    /// - Must start with a letter; letters and whitespace only
    /// - At most 30 characters
    CountryName,
    "country name",
    30
);

catalog_name!(
    /// Name of a manufacturing company.
    ///
    /// # Validation
    ///
    /// - Must start with a letter; letters and whitespace only
    /// - At most 50 characters
    CompanyName,
    "company name",
    50
);

catalog_name!(
    /// Name of a product category (e.g. "Dairy", "Молочные продукты").
    ///
    /// # Validation
    ///
    /// - Must start with a letter; letters and whitespace only
    /// - At most 50 characters
    CategoryName,
    "category name",
    50
);

catalog_name!(
    /// Display name of a taste tag (e.g. "Sweet", "Горький").
    ///
    /// # Validation
    ///
    /// - Must start with a letter; letters and whitespace only
    /// - At most 50 characters
    TagName,
    "taste tag name",
    50
);

catalog_name!(
    /// Name of a product as shown in listings.
    ///
    /// # Validation
    ///
    /// - Must start with a letter; letters and whitespace only
    /// - At most 100 characters
    ProductName,
    "product name",
    100
);

#[cfg(test)]
mod tests {
    use super::*;

    // -- Shared rule --

    #[test]
    fn accepts_latin_names() {
        assert!(CountryName::new("Italy").is_ok());
        assert!(CompanyName::new("Barilla Group").is_ok());
        assert!(ProductName::new("Dark Chocolate").is_ok());
    }

    #[test]
    fn accepts_cyrillic_names() {
        assert!(CountryName::new("Россия").is_ok());
        assert!(CompanyName::new("Красный Октябрь").is_ok());
        assert!(TagName::new("Горький").is_ok());
        // Ё/ё sit outside the contiguous Cyrillic block and need their own arm.
        assert!(ProductName::new("Тёмный шоколад").is_ok());
        assert!(CategoryName::new("Ёжик").is_ok());
    }

    #[test]
    fn rejects_invalid() {
        assert!(CountryName::new("").is_err());
        assert!(CountryName::new(" Italy").is_err()); // must start with a letter
        assert!(CountryName::new("Ital1a").is_err()); // digit
        assert!(CountryName::new("U.S.A").is_err()); // punctuation
        assert!(CompanyName::new("Kellogg's").is_err()); // apostrophe
        assert!(ProductName::new("Choco-Pie").is_err()); // hyphen
    }

    #[test]
    fn interior_whitespace_ok() {
        assert!(CountryName::new("Sri Lanka").is_ok());
        assert!(CountryName::new("Коста Рика").is_ok());
        // The rule admits any whitespace after the first letter, not just space.
        assert!(CompanyName::new("Alpen\tGold").is_ok());
    }

    #[test]
    fn boundary_lengths() {
        // Exactly at the maximum is accepted.
        assert!(CountryName::new("a".repeat(30)).is_ok());
        assert!(CompanyName::new("a".repeat(50)).is_ok());
        assert!(ProductName::new("a".repeat(100)).is_ok());
        // One over is rejected.
        assert!(CountryName::new("a".repeat(31)).is_err());
        assert!(CompanyName::new("a".repeat(51)).is_err());
        assert!(ProductName::new("a".repeat(101)).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 30 Cyrillic characters = 60 bytes; must still fit.
        assert!(CountryName::new("ж".repeat(30)).is_ok());
        assert!(CountryName::new("ж".repeat(31)).is_err());
    }

    #[test]
    fn too_long_error_carries_limit() {
        let err = CountryName::new("a".repeat(31)).unwrap_err();
        match err {
            ValidationError::NameTooLong { field, max, .. } => {
                assert_eq!(field, "country name");
                assert_eq!(max, 30);
            }
            other => panic!("expected NameTooLong, got {other:?}"),
        }
    }

    #[test]
    fn display_and_as_str() {
        let name = ProductName::new("Молоко").unwrap();
        assert_eq!(name.as_str(), "Молоко");
        assert_eq!(format!("{name}"), "Молоко");
    }

    // -- Serde --

    #[test]
    fn serde_roundtrip() {
        let name = CompanyName::new("Nestle").unwrap();
        let json_str = serde_json::to_string(&name).unwrap();
        assert_eq!(json_str, "\"Nestle\"");
        let deserialized: CompanyName = serde_json::from_str(&json_str).unwrap();
        assert_eq!(name, deserialized);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<CountryName>("\"Ital1a\"").is_err());
        assert!(serde_json::from_str::<ProductName>("\"\"").is_err());
    }
}
