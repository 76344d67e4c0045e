//! # Rating API Endpoints
//!
//! Community ratings for cataloged products. A rating carries a 1..=5
//! score, an optional short comment, and the taste tags the rater
//! perceived, referenced by slug. Tags attached to ratings are what drives
//! the by-tag product listing.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/products/:id/ratings` | `create_rating` |
//! | `GET` | `/v1/products/:id/ratings` | `list_ratings` |
//! | `DELETE` | `/v1/ratings/:id` | `delete_rating` |

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use chrono::Utc;
use foodhub_core::{RatingComment, RatingValue, TagSlug};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::state::{AppState, RatingRecord, TagRef};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to rate a product.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateRatingRequest {
    /// Score on the 1..=5 scale.
    #[schema(example = 4)]
    pub rate: u8,
    /// Free-text comment, at most 100 characters.
    #[serde(default)]
    pub comment: Option<String>,
    /// Slugs of the taste tags the rater perceived.
    #[serde(default)]
    pub tag_slugs: Vec<String>,
}

/// The ratings of one product.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingListResponse {
    pub ratings: Vec<RatingRecord>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the rating router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/products/:id/ratings",
            post(create_rating).get(list_ratings),
        )
        .route("/v1/ratings/:id", delete(delete_rating))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/products/:id/ratings — Rate a product.
#[utoipa::path(
    post,
    path = "/v1/products/{id}/ratings",
    params(
        ("id" = Uuid, Path, description = "Product id"),
    ),
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating recorded", body = RatingRecord),
        (status = 404, description = "Unknown product", body = crate::error::ErrorBody),
        (status = 422, description = "Score out of range, comment too long, or unknown tag slug", body = crate::error::ErrorBody),
    ),
    tag = "ratings"
)]
async fn create_rating(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<CreateRatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rate = RatingValue::new(req.rate)?;
    // Blank comments are stored as absent rather than as empty strings.
    let comment = req
        .comment
        .filter(|c| !c.trim().is_empty())
        .map(RatingComment::new)
        .transpose()?;

    // Malformed slugs are rejected before any database round trip.
    let mut slugs = Vec::with_capacity(req.tag_slugs.len());
    for raw in req.tag_slugs {
        slugs.push(TagSlug::new(raw)?);
    }
    slugs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    slugs.dedup();

    if db::products::get_by_id(&state.db, product_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "product {product_id} not found"
        )));
    }

    let mut taste_tags = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        let Some(tag) = db::taste_tags::get_by_slug(&state.db, slug.as_str()).await? else {
            return Err(AppError::Validation(format!(
                "unknown taste tag slug: {slug}"
            )));
        };
        taste_tags.push(TagRef {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
            polarity: tag.polarity,
        });
    }

    let now = Utc::now();
    let record = RatingRecord {
        id: Uuid::new_v4(),
        product_id,
        rate: i16::from(rate.get()),
        comment: comment.map(|c| c.as_str().to_string()),
        taste_tags,
        created_at: now,
        updated_at: now,
    };
    db::ratings::insert(&state.db, &record).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/products/:id/ratings — List a product's ratings, newest first.
#[utoipa::path(
    get,
    path = "/v1/products/{id}/ratings",
    params(
        ("id" = Uuid, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "The product's ratings", body = RatingListResponse),
        (status = 404, description = "Unknown product", body = crate::error::ErrorBody),
    ),
    tag = "ratings"
)]
async fn list_ratings(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<RatingListResponse>, AppError> {
    if db::products::get_by_id(&state.db, product_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "product {product_id} not found"
        )));
    }

    let ratings = db::ratings::list_for_product(&state.db, product_id).await?;
    let total = ratings.len();
    Ok(Json(RatingListResponse { ratings, total }))
}

/// DELETE /v1/ratings/:id — Remove a rating.
#[utoipa::path(
    delete,
    path = "/v1/ratings/{id}",
    params(
        ("id" = Uuid, Path, description = "Rating id"),
    ),
    responses(
        (status = 204, description = "Rating removed"),
        (status = 404, description = "Unknown rating", body = crate::error::ErrorBody),
    ),
    tag = "ratings"
)]
async fn delete_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if db::ratings::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("rating {id} not found")))
    }
}
