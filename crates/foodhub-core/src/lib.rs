//! # foodhub-core — Foundational Types for FoodHub
//!
//! This crate is the bedrock of the FoodHub catalog. It defines the validated
//! domain primitives every other crate in the workspace builds on; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`CountryName`],
//!    [`CompanyName`], [`CategoryName`], [`TagName`], [`ProductName`],
//!    [`TagSlug`], [`EanCode`], [`RatingValue`], [`RatingComment`] — all
//!    newtypes with validated constructors. No bare strings for catalog data.
//!
//! 2. **Validation at the boundary.** Every constructor rejects malformed
//!    input, and `Deserialize` routes through the same constructors so that
//!    invalid values never enter the system through JSON either.
//!
//! 3. **Cyrillic-aware names.** Name fields accept Latin and Cyrillic letters
//!    (including Ё/ё) with spaces, matching the bilingual product data the
//!    catalog holds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `foodhub-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod ean;
pub mod error;
pub mod name;
pub mod rating;
pub mod taste;

// Re-export primary types for ergonomic imports.
pub use ean::EanCode;
pub use error::ValidationError;
pub use name::{CategoryName, CompanyName, CountryName, ProductName, TagName};
pub use rating::{RatingComment, RatingValue};
pub use taste::{TagSlug, TastePolarity};
