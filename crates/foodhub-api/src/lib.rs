//! # foodhub-api — Axum API Service for the FoodHub Catalog
//!
//! FoodHub is a community-curated catalog of food products. Products are
//! added by EAN-13 barcode: the service looks the code up in the EAN-DB
//! registry, downloads the product image, and files the product under its
//! company, country of origin, and category. Visitors rate products on a
//! 1-5 scale and attach taste tags, which in turn drive tag-based browsing.
//!
//! ## API Surface
//!
//! | Prefix                      | Module                  | Domain                  |
//! |-----------------------------|-------------------------|-------------------------|
//! | `/v1/products/*`            | [`routes::products`]    | Catalog, search, intake |
//! | `/v1/products/:id/ratings`  | [`routes::ratings`]     | Community ratings       |
//! | `/v1/ratings/:id`           | [`routes::ratings`]     | Rating moderation       |
//! | `/v1/countries`             | [`routes::reference`]   | Reference data          |
//! | `/v1/companies`             | [`routes::reference`]   | Reference data          |
//! | `/v1/categories/*`          | [`routes::reference`]   | Reference data          |
//! | `/v1/taste-tags/*`          | [`routes::taste_tags`]  | Taste descriptors       |
//!
//! Requests pass through `TraceLayer`, then the metrics middleware, then the
//! handler. The OpenAPI document is generated from utoipa annotations and
//! served at `/openapi.json`.

pub mod db;
pub mod error;
pub mod intake;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Metrics are on unless `FOODHUB_METRICS_ENABLED` is set to `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("FOODHUB_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` are mounted outside the API
/// middleware stack so a scrape never shows up in its own request counters.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Rating comments and barcode payloads are small; 2 MiB is generous.
    let mut api = Router::new()
        .merge(routes::products::router())
        .merge(routes::ratings::router())
        .merge(routes::reference::router())
        .merge(routes::taste_tags::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(axum::Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Operational endpoints.
    let mut ops = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        ops = ops
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(axum::Extension(metrics));
    }

    let ops = ops.with_state(state);

    Router::new().merge(ops).merge(api)
}

/// GET /metrics — Prometheus scrape endpoint.
///
/// Refreshes the catalog gauges from the database on each scrape, then
/// encodes every family in the text exposition format. A failed gauge query
/// is logged and skipped; the scrape itself still succeeds so the HTTP
/// counters remain visible while the database is down.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    match db::products::count(&state.db).await {
        Ok(n) => metrics.products_total().set(n as f64),
        Err(e) => tracing::warn!("product count query failed: {e}"),
    }

    match db::ratings::count(&state.db).await {
        Ok(n) => metrics.ratings_total().set(n as f64),
        Err(e) => tracing::warn!("rating count query failed: {e}"),
    }

    match db::companies::count(&state.db).await {
        Ok(n) => metrics.companies_total().set(n as f64),
        Err(e) => tracing::warn!("company count query failed: {e}"),
    }

    // Reset both polarity labels first so a polarity whose last tag was
    // deleted reads zero instead of its stale count.
    match db::taste_tags::count_by_polarity(&state.db).await {
        Ok(counts) => {
            metrics.taste_tags_total().reset();
            for label in ["positive", "negative"] {
                metrics
                    .taste_tags_total()
                    .with_label_values(&[label])
                    .set(0.0);
            }
            for (code, count) in &counts {
                let polarity = db::taste_tags::parse_polarity(code);
                metrics
                    .taste_tags_total()
                    .with_label_values(&[&polarity.to_string()])
                    .set(*count as f64);
            }
        }
        Err(e) => tracing::warn!("taste tag count query failed: {e}"),
    }

    // Lookup client wiring needs no database round trip.
    metrics
        .lookup_client_configured()
        .set(if state.lookup.is_some() { 1.0 } else { 0.0 });

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("metrics encoding failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe. Answers 200 whenever the process is up at all.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Runs `SELECT 1` against the pool; a missing EAN-DB
/// lookup client is not a readiness failure because barcode intake answers
/// 503 on its own and the rest of the catalog works without it.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = sqlx::query("SELECT 1").execute(&state.db).await {
        tracing::warn!("database health check failed: {e}");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
    }

    (StatusCode::OK, "ready").into_response()
}
