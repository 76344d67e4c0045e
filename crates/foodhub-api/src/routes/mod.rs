//! # API Route Modules
//!
//! Route modules for the FoodHub API surface:
//!
//! - `products` — Catalog browsing, full-text search, the by-tag listing,
//!   and barcode-driven intake (`POST /v1/products` takes an EAN-13 code,
//!   not a free-form body).
//! - `ratings` — Community ratings with taste tags, nested under products.
//! - `reference` — Countries, companies, and categories, including each
//!   category's expected taste profile.
//! - `taste_tags` — Taste tag management and the polarity-filtered listing.

pub mod products;
pub mod ratings;
pub mod reference;
pub mod taste_tags;
