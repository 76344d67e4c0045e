//! # EAN-13 Barcode Codes
//!
//! The International Article Number (EAN-13) is the product key used across
//! the catalog: products are created from a barcode scan and deduplicated by
//! it. [`EanCode`] validates both shape (exactly 13 ASCII digits) and the
//! GS1 check digit at construction time, so a stored code is always a real
//! barcode.
//!
//! Reference: <https://www.gs1.org/services/how-calculate-check-digit-manually>

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::name::impl_validating_deserialize;

/// A validated EAN-13 barcode.
///
/// # Validation
///
/// - Exactly 13 ASCII digits
/// - GS1 check digit must match: digits weighted 1,3,1,3,... from the left
///   must sum to a multiple of 10
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EanCode(String);

impl_validating_deserialize!(EanCode);

impl EanCode {
    /// Create an EAN-13 code from a string, validating shape and check digit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEan`] if the value is not 13 ASCII
    /// digits or the check digit does not match.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != 13 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidEan(s));
        }
        if !checksum_holds(s.as_bytes()) {
            return Err(ValidationError::InvalidEan(s));
        }
        Ok(Self(s))
    }

    /// Access the 13-digit code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EanCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// GS1 check: odd positions (1st, 3rd, ...) weigh 1, even positions weigh 3,
/// and the weighted sum over all 13 digits must be divisible by 10.
fn checksum_holds(digits: &[u8]) -> bool {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 {
                d
            } else {
                d * 3
            }
        })
        .sum();
    sum % 10 == 0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy producing 12 random digits with the correct check digit
    /// appended.
    fn well_formed_ean13() -> impl Strategy<Value = String> {
        proptest::collection::vec(0u8..10, 12).prop_map(|digits| {
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &d)| {
                    if i % 2 == 0 {
                        u32::from(d)
                    } else {
                        u32::from(d) * 3
                    }
                })
                .sum();
            let check = (10 - sum % 10) % 10;
            let mut code: String = digits.iter().map(|&d| char::from(b'0' + d)).collect();
            code.push(char::from(b'0' + check as u8));
            code
        })
    }

    proptest! {
        /// Any 12-digit prefix with its computed check digit is accepted.
        #[test]
        fn accepts_well_formed_codes(code in well_formed_ean13()) {
            prop_assert!(EanCode::new(code).is_ok());
        }

        /// Changing any single digit breaks the check digit.
        #[test]
        fn rejects_single_digit_corruption(
            code in well_formed_ean13(),
            pos in 0usize..13,
            bump in 1u8..10,
        ) {
            let mut bytes = code.into_bytes();
            let d = bytes[pos] - b'0';
            bytes[pos] = b'0' + (d + bump) % 10;
            let corrupted = String::from_utf8(bytes).unwrap();
            prop_assert!(EanCode::new(corrupted).is_err());
        }
    }
}
