//! # Application State
//!
//! Shared state for the Axum application: the Postgres pool, the optional
//! EAN-DB lookup client, and runtime configuration read from the
//! environment. The catalog record types returned by the persistence layer
//! live here as well.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use foodhub_core::TastePolarity;
use foodhub_eandb::EanDbClient;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the server binds to.
    pub port: u16,
    /// Directory where downloaded product images are stored.
    pub media_root: PathBuf,
    /// Public URL prefix under which stored images are served.
    pub media_url: String,
    /// Postgres text search configuration used by product search.
    pub search_language: String,
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// `SEARCH_LANGUAGE` is checked against the supported configurations;
    /// an unsupported value is replaced with `russian` rather than being
    /// interpolated into queries.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let media_root = std::env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./media"));
        let media_url = std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string());
        let search_language = match std::env::var("SEARCH_LANGUAGE") {
            Ok(lang) if crate::db::products::SEARCH_LANGUAGES.contains(&lang.as_str()) => lang,
            Ok(lang) => {
                tracing::warn!(
                    language = %lang,
                    "unsupported SEARCH_LANGUAGE, falling back to russian"
                );
                "russian".to_string()
            }
            Err(_) => "russian".to_string(),
        };

        Self {
            port,
            media_root,
            media_url,
            search_language,
        }
    }

    /// Public URL for a stored image path such as `product_images/milk.jpg`.
    pub fn image_url(&self, image_path: &str) -> String {
        format!(
            "{}/{}",
            self.media_url.trim_end_matches('/'),
            image_path.trim_start_matches('/')
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            media_root: PathBuf::from("./media"),
            media_url: "/media/".to_string(),
            search_language: "russian".to_string(),
        }
    }
}

/// Shared application state passed to all route handlers.
///
/// Cloning is cheap: the pool and the lookup client are handle types and
/// the configuration sits behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Postgres connection pool. The catalog cannot run without it.
    pub db: PgPool,
    /// EAN-DB lookup client. `None` when the registry credentials are not
    /// configured; barcode intake then answers 503.
    pub lookup: Option<EanDbClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create application state with default configuration and no lookup
    /// client.
    pub fn new(db: PgPool) -> Self {
        Self::with_config(AppConfig::default(), db, None)
    }

    /// Create application state with explicit configuration and an optional
    /// EAN-DB client.
    pub fn with_config(config: AppConfig, db: PgPool, lookup: Option<EanDbClient>) -> Self {
        Self {
            db,
            lookup,
            config: Arc::new(config),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// A country of origin.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct CountryRecord {
    pub id: Uuid,
    pub name: String,
}

/// A manufacturer, joined with the name of its country of origin.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct CompanyRecord {
    pub id: Uuid,
    pub name: String,
    pub country_id: Uuid,
    pub country_name: String,
}

/// A product category.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
}

/// A taste tag: a named flavor descriptor with a polarity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TasteTagRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[schema(value_type = String, example = "positive")]
    pub polarity: TastePolarity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for TasteTagRecord {
    /// Renders as `Sweet [Positive]`, the form used in logs and exports.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.polarity.label())
    }
}

/// Abbreviated taste tag, embedded in ratings and category detail views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[schema(value_type = String, example = "positive")]
    pub polarity: TastePolarity,
}

/// A catalog product, joined with its company and category names.
///
/// `image_path` is the path relative to the media root; route handlers
/// turn it into a public URL via [`AppConfig::image_url`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub ean_code: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A community rating for a product, with the taste tags the rater chose.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RatingRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Score on the 1..=5 scale.
    pub rate: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub taste_tags: Vec<TagRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_joins_prefix_and_path() {
        let config = AppConfig::default();
        assert_eq!(
            config.image_url("product_images/milk.jpg"),
            "/media/product_images/milk.jpg"
        );
    }

    #[test]
    fn image_url_tolerates_stray_slashes() {
        let config = AppConfig {
            media_url: "https://cdn.foodhub.dev/media".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.image_url("/product_images/milk.jpg"),
            "https://cdn.foodhub.dev/media/product_images/milk.jpg"
        );
    }

    #[test]
    fn taste_tag_display_includes_polarity_label() {
        let tag = TasteTagRecord {
            id: Uuid::new_v4(),
            name: "Sweet".to_string(),
            slug: "sweet".to_string(),
            polarity: TastePolarity::Positive,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(tag.to_string(), "Sweet [Positive]");
    }

    #[test]
    fn default_config_uses_russian_search() {
        let config = AppConfig::default();
        assert_eq!(config.search_language, "russian");
        assert_eq!(config.port, 8080);
    }
}
