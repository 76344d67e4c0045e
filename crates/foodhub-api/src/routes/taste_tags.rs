//! # Taste Tag API Endpoints
//!
//! Taste tags name a perceived flavor ("sweet", "bitter") and carry a
//! polarity. Ratings and category profiles link to them; the slug is what
//! the by-tag product listing filters on.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/taste-tags` | `create_taste_tag` |
//! | `GET` | `/v1/taste-tags` | `list_taste_tags` |
//! | `DELETE` | `/v1/taste-tags/:id` | `delete_taste_tag` |

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use chrono::Utc;
use foodhub_core::{TagName, TagSlug, TastePolarity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::state::{AppState, TasteTagRecord};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to create a taste tag.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTasteTagRequest {
    /// Display name: letters and spaces, at most 50 characters.
    #[schema(example = "Sweet")]
    pub name: String,
    /// Filter slug: letters and spaces, at most 50 characters.
    #[schema(example = "sweet")]
    pub slug: String,
    /// `positive` or `negative`.
    #[schema(example = "positive")]
    pub polarity: String,
}

/// All taste tags, optionally restricted to one polarity.
#[derive(Debug, Serialize, ToSchema)]
pub struct TasteTagListResponse {
    pub taste_tags: Vec<TasteTagRecord>,
    pub total: usize,
}

/// Query parameters for the taste tag listing.
#[derive(Debug, Deserialize)]
pub struct TasteTagListParams {
    #[serde(default)]
    pub polarity: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the taste tag router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/taste-tags",
            post(create_taste_tag).get(list_taste_tags),
        )
        .route("/v1/taste-tags/:id", delete(delete_taste_tag))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/taste-tags — Create a taste tag.
#[utoipa::path(
    post,
    path = "/v1/taste-tags",
    request_body = CreateTasteTagRequest,
    responses(
        (status = 201, description = "Taste tag created", body = TasteTagRecord),
        (status = 409, description = "Name or slug already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid name, slug, or polarity", body = crate::error::ErrorBody),
    ),
    tag = "taste-tags"
)]
async fn create_taste_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTasteTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = TagName::new(req.name)?;
    let slug = TagSlug::new(req.slug)?;
    let polarity: TastePolarity = req.polarity.parse()?;

    let now = Utc::now();
    let record = TasteTagRecord {
        id: Uuid::new_v4(),
        name: name.as_str().to_string(),
        slug: slug.as_str().to_string(),
        polarity,
        created_at: now,
        updated_at: now,
    };
    db::taste_tags::insert(&state.db, &record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/taste-tags — List taste tags.
#[utoipa::path(
    get,
    path = "/v1/taste-tags",
    params(
        ("polarity" = Option<String>, Query, description = "Restrict to `positive` or `negative` tags"),
    ),
    responses(
        (status = 200, description = "Matching taste tags", body = TasteTagListResponse),
        (status = 422, description = "Unknown polarity value", body = crate::error::ErrorBody),
    ),
    tag = "taste-tags"
)]
async fn list_taste_tags(
    State(state): State<AppState>,
    Query(params): Query<TasteTagListParams>,
) -> Result<Json<TasteTagListResponse>, AppError> {
    let polarity = params
        .polarity
        .as_deref()
        .map(str::parse::<TastePolarity>)
        .transpose()?;

    let taste_tags = db::taste_tags::list(&state.db, polarity).await?;
    let total = taste_tags.len();
    Ok(Json(TasteTagListResponse { taste_tags, total }))
}

/// DELETE /v1/taste-tags/:id — Remove a taste tag.
///
/// Links from ratings and category profiles are removed with it; the
/// ratings themselves stay.
#[utoipa::path(
    delete,
    path = "/v1/taste-tags/{id}",
    params(
        ("id" = Uuid, Path, description = "Taste tag id"),
    ),
    responses(
        (status = 204, description = "Taste tag deleted"),
        (status = 404, description = "Unknown taste tag", body = crate::error::ErrorBody),
    ),
    tag = "taste-tags"
)]
async fn delete_taste_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if db::taste_tags::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("taste tag {id} not found")))
    }
}
