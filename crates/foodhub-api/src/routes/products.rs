//! # Product API Endpoints
//!
//! Browsing, search, taste-tag filtering, and barcode-driven intake.
//! Products are never created from a free-form body: `POST /v1/products`
//! takes a barcode and the catalog entry is built from the EAN-DB record.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/products` | `add_product` |
//! | `GET` | `/v1/products` | `list_products` |
//! | `GET` | `/v1/products/search` | `search_products` |
//! | `GET` | `/v1/products/by-tag/:slug` | `list_products_by_tag` |
//! | `GET` | `/v1/products/:id` | `get_product` |
//! | `DELETE` | `/v1/products/:id` | `delete_product` |

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use foodhub_core::{EanCode, TagSlug};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::intake;
use crate::state::{AppConfig, AppState, ProductRecord};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to add a product by barcode.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddProductRequest {
    /// EAN-13 barcode: 13 digits with a valid check digit.
    #[schema(example = "4006381333931")]
    pub ean_code: String,
}

/// A catalog product as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub ean_code: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    /// Public URL of the product image, when one was imported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    fn from_record(record: ProductRecord, config: &AppConfig) -> Self {
        let image_url = record.image_path.as_deref().map(|p| config.image_url(p));
        Self {
            id: record.id,
            name: record.name,
            ean_code: record.ean_code,
            company_id: record.company_id,
            company_name: record.company_name,
            category_id: record.category_id,
            category_name: record.category_name,
            image_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A page of products.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total: usize,
}

impl ProductListResponse {
    fn from_records(records: Vec<ProductRecord>, config: &AppConfig) -> Self {
        let products: Vec<ProductResponse> = records
            .into_iter()
            .map(|r| ProductResponse::from_record(r, config))
            .collect();
        let total = products.len();
        Self { products, total }
    }
}

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/products", post(add_product).get(list_products))
        .route("/v1/products/search", get(search_products))
        .route("/v1/products/by-tag/:slug", get(list_products_by_tag))
        .route("/v1/products/:id", get(get_product).delete(delete_product))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/products — Add a product by its barcode.
#[utoipa::path(
    post,
    path = "/v1/products",
    request_body = AddProductRequest,
    responses(
        (status = 201, description = "Product created from the registry record", body = ProductResponse),
        (status = 200, description = "Barcode already cataloged; existing product returned", body = ProductResponse),
        (status = 422, description = "Malformed barcode", body = crate::error::ErrorBody),
        (status = 503, description = "Registry not configured, unreachable, or record incomplete", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
async fn add_product(
    State(state): State<AppState>,
    Json(req): Json<AddProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ean = EanCode::new(req.ean_code)?;
    let outcome = intake::add_product_by_ean(&state, &ean).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(ProductResponse::from_record(outcome.product, &state.config)),
    ))
}

/// GET /v1/products — List the catalog, oldest first.
#[utoipa::path(
    get,
    path = "/v1/products",
    responses(
        (status = 200, description = "All cataloged products", body = ProductListResponse),
    ),
    tag = "products"
)]
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, AppError> {
    let records = db::products::list(&state.db).await?;
    Ok(Json(ProductListResponse::from_records(
        records,
        &state.config,
    )))
}

/// GET /v1/products/search — Full-text search over product and company names.
#[utoipa::path(
    get,
    path = "/v1/products/search",
    params(
        ("query" = Option<String>, Query, description = "Search phrase; blank or missing returns no results"),
    ),
    responses(
        (status = 200, description = "Matching products, best match first", body = ProductListResponse),
    ),
    tag = "products"
)]
async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductListResponse>, AppError> {
    let records = db::products::search(
        &state.db,
        &state.config.search_language,
        &params.query,
    )
    .await?;
    Ok(Json(ProductListResponse::from_records(
        records,
        &state.config,
    )))
}

/// GET /v1/products/by-tag/:slug — Products whose ratings carry a taste tag.
#[utoipa::path(
    get,
    path = "/v1/products/by-tag/{slug}",
    params(
        ("slug" = String, Path, description = "Taste tag slug"),
    ),
    responses(
        (status = 200, description = "Products rated with the tag; empty for an unknown slug", body = ProductListResponse),
        (status = 422, description = "Malformed slug", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
async fn list_products_by_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductListResponse>, AppError> {
    let slug = TagSlug::new(slug)?;
    let records = db::products::list_by_tag_slug(&state.db, slug.as_str()).await?;
    Ok(Json(ProductListResponse::from_records(
        records,
        &state.config,
    )))
}

/// GET /v1/products/:id — Fetch one product.
#[utoipa::path(
    get,
    path = "/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Unknown product", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let record = db::products::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("product {id} not found")))?;
    Ok(Json(ProductResponse::from_record(record, &state.config)))
}

/// DELETE /v1/products/:id — Remove a product and its ratings.
#[utoipa::path(
    delete,
    path = "/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Unknown product", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if db::products::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("product {id} not found")))
    }
}
