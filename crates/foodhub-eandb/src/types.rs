//! Wire types for the EAN-DB v2 product endpoint.
//!
//! Registry records vary a lot in completeness: whole sections may be
//! absent, and title maps carry whichever languages contributors filled in.
//! Every struct here tolerates missing keys via `#[serde(default)]`, and
//! extraction collapses blank strings to `None` so downstream completeness
//! checks only ever see real data.

use serde::Deserialize;

/// Top-level response envelope from `GET {base_url}/{ean}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EanDbResponse {
    /// The product record. Absent when the registry answers 200 without
    /// holding any data for the barcode.
    #[serde(default)]
    pub product: Option<EanDbProduct>,
}

/// A product record as EAN-DB reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EanDbProduct {
    #[serde(default)]
    pub titles: Titles,
    #[serde(default)]
    pub manufacturer: Option<Manufacturer>,
    #[serde(default, rename = "barcodeDetails")]
    pub barcode_details: Option<BarcodeDetails>,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

/// Localized titles. The registry carries more languages; the catalog only
/// consults Russian and English.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Titles {
    #[serde(default)]
    pub ru: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

/// Manufacturer section of a product record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manufacturer {
    #[serde(default)]
    pub titles: Titles,
}

/// Facts derived from the barcode prefix.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BarcodeDetails {
    #[serde(default)]
    pub country: Option<String>,
}

/// One category assignment of a product record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryEntry {
    #[serde(default)]
    pub titles: Titles,
}

/// One image listing of a product record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub url: Option<String>,
}

impl EanDbProduct {
    /// Product name: Russian title with English fallback.
    pub fn title(&self) -> Option<String> {
        clean(self.titles.ru.as_deref()).or_else(|| clean(self.titles.en.as_deref()))
    }

    /// Manufacturer name (Russian title, matching the catalog language).
    pub fn manufacturer_title(&self) -> Option<String> {
        self.manufacturer
            .as_ref()
            .and_then(|m| clean(m.titles.ru.as_deref()))
    }

    /// Country of origin from the barcode prefix details.
    pub fn country(&self) -> Option<String> {
        self.barcode_details
            .as_ref()
            .and_then(|d| clean(d.country.as_deref()))
    }

    /// Russian title of the first category assignment.
    pub fn category_title(&self) -> Option<String> {
        self.categories
            .first()
            .and_then(|c| clean(c.titles.ru.as_deref()))
    }

    /// URL of the first listed image.
    pub fn first_image_url(&self) -> Option<&str> {
        self.images
            .first()
            .and_then(|i| i.url.as_deref())
            .filter(|u| !u.trim().is_empty())
    }

    /// Collapse the record into catalog-facing facts. The image is not
    /// fetched here; `image_path` is filled in once a download succeeds.
    pub fn to_lookup(&self) -> ProductLookup {
        ProductLookup {
            name: self.title(),
            company: self.manufacturer_title(),
            country: self.country(),
            category: self.category_title(),
            image_path: None,
        }
    }
}

/// Trim and collapse blank strings to `None`.
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Product facts extracted from an EAN-DB record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductLookup {
    /// Product name (Russian preferred, English fallback).
    pub name: Option<String>,
    /// Manufacturer name.
    pub company: Option<String>,
    /// Country of origin.
    pub country: Option<String>,
    /// First category title.
    pub category: Option<String>,
    /// Stored image path relative to the media root, once downloaded.
    pub image_path: Option<String>,
}

impl ProductLookup {
    /// True when every fact required to create a product is present.
    /// The image is optional: a missing photo never blocks intake.
    pub fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.company.is_some()
            && self.country.is_some()
            && self.category.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> EanDbProduct {
        let resp: EanDbResponse = serde_json::from_str(json).unwrap();
        resp.product.unwrap()
    }

    #[test]
    fn full_record_extracts_everything() {
        let product = parse(
            r#"{
                "product": {
                    "titles": {"ru": "Молоко", "en": "Milk"},
                    "manufacturer": {"titles": {"ru": "Простоквашино"}},
                    "barcodeDetails": {"country": "Россия"},
                    "categories": [{"titles": {"ru": "Молочные продукты"}}],
                    "images": [{"url": "https://img.example.com/milk.jpg"}]
                }
            }"#,
        );
        let lookup = product.to_lookup();
        assert_eq!(lookup.name.as_deref(), Some("Молоко"));
        assert_eq!(lookup.company.as_deref(), Some("Простоквашино"));
        assert_eq!(lookup.country.as_deref(), Some("Россия"));
        assert_eq!(lookup.category.as_deref(), Some("Молочные продукты"));
        assert_eq!(
            product.first_image_url(),
            Some("https://img.example.com/milk.jpg")
        );
        assert!(lookup.is_complete());
    }

    #[test]
    fn title_falls_back_to_english() {
        let product = parse(r#"{"product": {"titles": {"en": "Dark Chocolate"}}}"#);
        assert_eq!(product.title().as_deref(), Some("Dark Chocolate"));
    }

    #[test]
    fn blank_russian_title_falls_back() {
        let product = parse(r#"{"product": {"titles": {"ru": "  ", "en": "Milk"}}}"#);
        assert_eq!(product.title().as_deref(), Some("Milk"));
    }

    #[test]
    fn missing_sections_yield_incomplete_lookup() {
        let product = parse(r#"{"product": {"titles": {"ru": "Молоко"}}}"#);
        let lookup = product.to_lookup();
        assert_eq!(lookup.name.as_deref(), Some("Молоко"));
        assert!(lookup.company.is_none());
        assert!(lookup.country.is_none());
        assert!(lookup.category.is_none());
        assert!(!lookup.is_complete());
    }

    #[test]
    fn empty_image_list_gives_no_url() {
        let product = parse(r#"{"product": {"images": []}}"#);
        assert!(product.first_image_url().is_none());
        let product = parse(r#"{"product": {"images": [{"url": ""}]}}"#);
        assert!(product.first_image_url().is_none());
    }

    #[test]
    fn values_are_trimmed() {
        let product = parse(r#"{"product": {"titles": {"ru": "  Молоко  "}}}"#);
        assert_eq!(product.title().as_deref(), Some("Молоко"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let resp: EanDbResponse = serde_json::from_str(
            r#"{"balance": 93, "product": {"barcode": "4006381333931", "titles": {"ru": "Ручка"}}}"#,
        )
        .unwrap();
        assert_eq!(resp.product.unwrap().title().as_deref(), Some("Ручка"));
    }

    #[test]
    fn null_product_is_tolerated() {
        let resp: EanDbResponse = serde_json::from_str(r#"{"product": null}"#).unwrap();
        assert!(resp.product.is_none());
    }
}
