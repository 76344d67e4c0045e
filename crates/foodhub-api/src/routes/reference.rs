//! # Reference Data API Endpoints
//!
//! Countries, companies, and categories: the reference rows products hang
//! off. Direct creation goes through the catalog name validators; rows
//! created implicitly by barcode intake do not pass through here.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/countries` | `create_country` |
//! | `GET` | `/v1/countries` | `list_countries` |
//! | `DELETE` | `/v1/countries/:id` | `delete_country` |
//! | `POST` | `/v1/companies` | `create_company` |
//! | `GET` | `/v1/companies` | `list_companies` |
//! | `DELETE` | `/v1/companies/:id` | `delete_company` |
//! | `POST` | `/v1/categories` | `create_category` |
//! | `GET` | `/v1/categories` | `list_categories` |
//! | `GET` | `/v1/categories/:id` | `get_category` |
//! | `PUT` | `/v1/categories/:id/taste-tags` | `set_category_taste_tags` |
//! | `DELETE` | `/v1/categories/:id` | `delete_category` |

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use foodhub_core::{CategoryName, CompanyName, CountryName};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::state::{AppState, CategoryRecord, CompanyRecord, CountryRecord, TagRef};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to create a country.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCountryRequest {
    /// Country name: letters and spaces, at most 30 characters.
    #[schema(example = "Германия")]
    pub name: String,
}

/// Request to create a company.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCompanyRequest {
    /// Company name: letters and spaces, at most 50 characters.
    #[schema(example = "Alpen Gold")]
    pub name: String,
    /// Country of origin. Must already exist.
    pub country_id: Uuid,
}

/// Request to create a category.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    /// Category name: letters and spaces, at most 50 characters.
    #[schema(example = "Шоколад")]
    pub name: String,
}

/// Request to replace the expected taste profile of a category.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetCategoryTagsRequest {
    pub taste_tag_ids: Vec<Uuid>,
}

/// All countries.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountryListResponse {
    pub countries: Vec<CountryRecord>,
    pub total: usize,
}

/// All companies.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanyRecord>,
    pub total: usize,
}

/// All categories.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryRecord>,
    pub total: usize,
}

/// A category together with its expected taste profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub taste_tags: Vec<TagRef>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the reference data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/countries", post(create_country).get(list_countries))
        .route("/v1/countries/:id", delete(delete_country))
        .route("/v1/companies", post(create_company).get(list_companies))
        .route("/v1/companies/:id", delete(delete_company))
        .route("/v1/categories", post(create_category).get(list_categories))
        .route(
            "/v1/categories/:id",
            get(get_category).delete(delete_category),
        )
        .route(
            "/v1/categories/:id/taste-tags",
            put(set_category_taste_tags),
        )
}

// ---------------------------------------------------------------------------
// Country handlers
// ---------------------------------------------------------------------------

/// POST /v1/countries — Create a country.
#[utoipa::path(
    post,
    path = "/v1/countries",
    request_body = CreateCountryRequest,
    responses(
        (status = 201, description = "Country created", body = CountryRecord),
        (status = 409, description = "Name already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid name", body = crate::error::ErrorBody),
    ),
    tag = "countries"
)]
async fn create_country(
    State(state): State<AppState>,
    Json(req): Json<CreateCountryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = CountryName::new(req.name)?;
    let record = CountryRecord {
        id: Uuid::new_v4(),
        name: name.as_str().to_string(),
    };
    db::countries::insert(&state.db, &record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/countries — List countries.
#[utoipa::path(
    get,
    path = "/v1/countries",
    responses(
        (status = 200, description = "All countries", body = CountryListResponse),
    ),
    tag = "countries"
)]
async fn list_countries(
    State(state): State<AppState>,
) -> Result<Json<CountryListResponse>, AppError> {
    let countries = db::countries::list(&state.db).await?;
    let total = countries.len();
    Ok(Json(CountryListResponse { countries, total }))
}

/// DELETE /v1/countries/:id — Remove a country.
///
/// Countries are protected while companies reference them; the foreign key
/// violation surfaces as 409.
#[utoipa::path(
    delete,
    path = "/v1/countries/{id}",
    params(
        ("id" = Uuid, Path, description = "Country id"),
    ),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Unknown country", body = crate::error::ErrorBody),
        (status = 409, description = "Companies still reference this country", body = crate::error::ErrorBody),
    ),
    tag = "countries"
)]
async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if db::countries::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("country {id} not found")))
    }
}

// ---------------------------------------------------------------------------
// Company handlers
// ---------------------------------------------------------------------------

/// POST /v1/companies — Create a company.
#[utoipa::path(
    post,
    path = "/v1/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyRecord),
        (status = 409, description = "Name already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid name or unknown country", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = CompanyName::new(req.name)?;
    let country = db::countries::get_by_id(&state.db, req.country_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("country {} does not exist", req.country_id))
        })?;

    let record = CompanyRecord {
        id: Uuid::new_v4(),
        name: name.as_str().to_string(),
        country_id: country.id,
        country_name: country.name,
    };
    db::companies::insert(&state.db, &record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/companies — List companies.
#[utoipa::path(
    get,
    path = "/v1/companies",
    responses(
        (status = 200, description = "All companies", body = CompanyListResponse),
    ),
    tag = "companies"
)]
async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<CompanyListResponse>, AppError> {
    let companies = db::companies::list(&state.db).await?;
    let total = companies.len();
    Ok(Json(CompanyListResponse { companies, total }))
}

/// DELETE /v1/companies/:id — Remove a company and its products.
#[utoipa::path(
    delete,
    path = "/v1/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company id"),
    ),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Unknown company", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if db::companies::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("company {id} not found")))
    }
}

// ---------------------------------------------------------------------------
// Category handlers
// ---------------------------------------------------------------------------

/// POST /v1/categories — Create a category.
#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryRecord),
        (status = 409, description = "Name already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid name", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = CategoryName::new(req.name)?;
    let record = CategoryRecord {
        id: Uuid::new_v4(),
        name: name.as_str().to_string(),
    };
    db::categories::insert(&state.db, &record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/categories — List categories.
#[utoipa::path(
    get,
    path = "/v1/categories",
    responses(
        (status = 200, description = "All categories", body = CategoryListResponse),
    ),
    tag = "categories"
)]
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let categories = db::categories::list(&state.db).await?;
    let total = categories.len();
    Ok(Json(CategoryListResponse { categories, total }))
}

/// GET /v1/categories/:id — Fetch a category with its taste profile.
#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id"),
    ),
    responses(
        (status = 200, description = "The category", body = CategoryDetailResponse),
        (status = 404, description = "Unknown category", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryDetailResponse>, AppError> {
    let record = db::categories::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("category {id} not found")))?;
    let taste_tags = db::taste_tags::tags_for_category(&state.db, id).await?;
    Ok(Json(CategoryDetailResponse {
        id: record.id,
        name: record.name,
        taste_tags,
    }))
}

/// PUT /v1/categories/:id/taste-tags — Replace a category's taste profile.
#[utoipa::path(
    put,
    path = "/v1/categories/{id}/taste-tags",
    params(
        ("id" = Uuid, Path, description = "Category id"),
    ),
    request_body = SetCategoryTagsRequest,
    responses(
        (status = 200, description = "Profile replaced", body = CategoryDetailResponse),
        (status = 404, description = "Unknown category", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown taste tag id", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn set_category_taste_tags(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetCategoryTagsRequest>,
) -> Result<Json<CategoryDetailResponse>, AppError> {
    let record = db::categories::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("category {id} not found")))?;

    let mut tag_ids = req.taste_tag_ids;
    tag_ids.sort();
    tag_ids.dedup();
    if !tag_ids.is_empty() {
        let refs = db::taste_tags::get_refs(&state.db, &tag_ids).await?;
        if refs.len() != tag_ids.len() {
            return Err(AppError::Validation(
                "one or more taste tags do not exist".to_string(),
            ));
        }
    }

    db::taste_tags::set_category_tags(&state.db, id, &tag_ids).await?;
    let taste_tags = db::taste_tags::tags_for_category(&state.db, id).await?;
    Ok(Json(CategoryDetailResponse {
        id: record.id,
        name: record.name,
        taste_tags,
    }))
}

/// DELETE /v1/categories/:id — Remove a category and its products.
#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id"),
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Unknown category", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if db::categories::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("category {id} not found")))
    }
}
