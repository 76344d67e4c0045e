//! # OpenAPI Document Assembly
//!
//! Collects every utoipa-annotated route and schema into one spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI description of the whole catalog surface: paths, wire
/// schemas, and tag groups.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FoodHub API — Food Product Catalog",
        version = "0.2.7",
        description = "Axum API service for the FoodHub catalog: community-curated food products with taste ratings.\n\nProvides:\n- **Product catalog** browsing, retrieval, and removal\n- **Barcode intake**: POST an EAN-13 code and the service fills in product data from the EAN-DB registry, creating missing companies, countries, and categories along the way\n- **Full-text search** over product and company names (PostgreSQL tsvector, Russian config by default)\n- **Taste-tag filtering**: list products whose ratings carry a given tag slug\n- **Community ratings** with 1-5 scores, optional comments, and taste tags\n- **Reference data** management for countries, companies, categories, and taste tags\n\nAll endpoints are unauthenticated. Health probes live under `/health/*`.",
        license(name = "Apache-2.0"),
        contact(name = "FoodHub")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Products ─────────────────────────────────────────────────────
        crate::routes::products::add_product,
        crate::routes::products::list_products,
        crate::routes::products::search_products,
        crate::routes::products::list_products_by_tag,
        crate::routes::products::get_product,
        crate::routes::products::delete_product,
        // ── Ratings ──────────────────────────────────────────────────────
        crate::routes::ratings::create_rating,
        crate::routes::ratings::list_ratings,
        crate::routes::ratings::delete_rating,
        // ── Countries ────────────────────────────────────────────────────
        crate::routes::reference::create_country,
        crate::routes::reference::list_countries,
        crate::routes::reference::delete_country,
        // ── Companies ────────────────────────────────────────────────────
        crate::routes::reference::create_company,
        crate::routes::reference::list_companies,
        crate::routes::reference::delete_company,
        // ── Categories ───────────────────────────────────────────────────
        crate::routes::reference::create_category,
        crate::routes::reference::list_categories,
        crate::routes::reference::get_category,
        crate::routes::reference::set_category_taste_tags,
        crate::routes::reference::delete_category,
        // ── Taste tags ───────────────────────────────────────────────────
        crate::routes::taste_tags::create_taste_tag,
        crate::routes::taste_tags::list_taste_tags,
        crate::routes::taste_tags::delete_taste_tag,
    ),
    components(
        schemas(
            // ── Catalog record types ─────────────────────────────────────
            crate::state::CountryRecord,
            crate::state::CompanyRecord,
            crate::state::CategoryRecord,
            crate::state::TasteTagRecord,
            crate::state::TagRef,
            crate::state::RatingRecord,
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            // ── Product DTOs ────────────────────────────────────────────
            crate::routes::products::AddProductRequest,
            crate::routes::products::ProductResponse,
            crate::routes::products::ProductListResponse,
            // ── Rating DTOs ─────────────────────────────────────────────
            crate::routes::ratings::CreateRatingRequest,
            crate::routes::ratings::RatingListResponse,
            // ── Reference data DTOs ─────────────────────────────────────
            crate::routes::reference::CreateCountryRequest,
            crate::routes::reference::CreateCompanyRequest,
            crate::routes::reference::CreateCategoryRequest,
            crate::routes::reference::SetCategoryTagsRequest,
            crate::routes::reference::CountryListResponse,
            crate::routes::reference::CompanyListResponse,
            crate::routes::reference::CategoryListResponse,
            crate::routes::reference::CategoryDetailResponse,
            // ── Taste tag DTOs ──────────────────────────────────────────
            crate::routes::taste_tags::CreateTasteTagRequest,
            crate::routes::taste_tags::TasteTagListResponse,
        ),
    ),
    tags(
        (name = "products", description = "Product catalog — browsing, search, taste-tag filtering, and barcode-driven intake"),
        (name = "ratings", description = "Community ratings — 1-5 scores with optional comments and taste tags"),
        (name = "countries", description = "Country reference data for producing companies"),
        (name = "companies", description = "Producing companies and their home countries"),
        (name = "categories", description = "Product categories and their expected taste profiles"),
        (name = "taste-tags", description = "Taste descriptors with positive or negative polarity"),
    )
)]
pub struct ApiDoc;

/// Serve the assembled spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — the generated spec.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_carries_catalog_metadata() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "FoodHub API — Food Product Catalog");
        assert_eq!(spec.info.version, "0.2.7");
    }

    #[test]
    fn every_catalog_path_is_documented() {
        let spec = ApiDoc::openapi();
        let expected = [
            "/v1/products",
            "/v1/products/search",
            "/v1/products/by-tag/{slug}",
            "/v1/products/{id}",
            "/v1/products/{id}/ratings",
            "/v1/ratings/{id}",
            "/v1/countries",
            "/v1/countries/{id}",
            "/v1/companies",
            "/v1/companies/{id}",
            "/v1/categories",
            "/v1/categories/{id}",
            "/v1/categories/{id}/taste-tags",
            "/v1/taste-tags",
            "/v1/taste-tags/{id}",
        ];
        for path in expected {
            assert!(spec.paths.paths.contains_key(path), "missing path: {path}");
        }
        assert_eq!(spec.paths.paths.len(), expected.len());
    }

    #[test]
    fn declared_tags_cover_every_group() {
        let spec = ApiDoc::openapi();
        let tags = spec.tags.as_ref().expect("spec has tags");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        for group in [
            "products",
            "ratings",
            "countries",
            "companies",
            "categories",
            "taste-tags",
        ] {
            assert!(names.contains(&group), "missing tag: {group}");
        }
    }

    #[test]
    fn wire_schemas_are_registered() {
        let spec = ApiDoc::openapi();
        let schemas = &spec
            .components
            .as_ref()
            .expect("spec has components")
            .schemas;
        for name in [
            "ProductResponse",
            "ProductListResponse",
            "AddProductRequest",
            "CreateRatingRequest",
            "RatingRecord",
            "TagRef",
            "TasteTagRecord",
            "CategoryDetailResponse",
            "ErrorBody",
        ] {
            assert!(schemas.contains_key(name), "missing schema: {name}");
        }
    }

    #[test]
    fn no_security_schemes_are_declared() {
        let spec = ApiDoc::openapi();
        let components = spec.components.as_ref().expect("spec has components");
        assert!(components.security_schemes.is_empty());
    }

    #[test]
    fn spec_serializes_to_json() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).expect("spec serializes");
        assert!(json.contains("\"/v1/products\""));
        assert!(json.contains("http://localhost:8080"));
    }

    #[test]
    fn router_builds() {
        let _ = router();
    }
}
