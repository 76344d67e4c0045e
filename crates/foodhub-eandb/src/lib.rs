//! # foodhub-eandb — Typed HTTP Client for the EAN-DB Registry
//!
//! [EAN-DB](https://ean-db.com) is the barcode registry FoodHub enriches new
//! products from: given an EAN-13 code, this crate fetches the product's
//! name, manufacturer, country of origin, first category, and first listed
//! image.
//!
//! ## Architecture
//!
//! [`EanDbClient`] wraps two `reqwest::Client`s with per-request timeouts:
//! one carrying the bearer token for registry calls, and a bare one for
//! image downloads so the credential is never sent to third-party image
//! hosts. The client is cheap to clone and safe to share across tasks.
//!
//! ## Error Handling
//!
//! [`EanDbClient::try_fetch`] surfaces typed [`LookupError`]s with the
//! endpoint, HTTP status, and response body excerpt. The higher-level
//! [`EanDbClient::fetch_product_data`] treats the registry as best-effort:
//! every failure is logged and collapsed to `None`, leaving the caller a
//! single "no usable data" signal.

pub mod client;
pub mod error;
pub mod types;

pub use client::{EanDbClient, EanDbConfig};
pub use error::LookupError;
pub use types::ProductLookup;
