//! # Prometheus Metrics
//!
//! Two kinds of instrumentation share one registry: request counters and
//! latency histograms recorded by the middleware on every response, and
//! catalog gauges (row counts, lookup client presence) refreshed by the
//! `/metrics` handler in `lib.rs` at scrape time.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, Gauge, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // Recorded by the middleware on every response.
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // Refreshed on each /metrics scrape.
    products_total: Gauge,
    ratings_total: Gauge,
    companies_total: Gauge,
    taste_tags_total: GaugeVec,
    lookup_client_configured: Gauge,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Gauge {
    let g = Gauge::new(name, help).expect("metric can be created");
    registry
        .register(Box::new(g.clone()))
        .expect("metric can be registered");
    g
}

fn gauge_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> GaugeVec {
    let g = GaugeVec::new(Opts::new(name, help), labels).expect("metric can be created");
    registry
        .register(Box::new(g.clone()))
        .expect("metric can be registered");
    g
}

fn counter_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let c = IntCounterVec::new(Opts::new(name, help), labels).expect("metric can be created");
    registry
        .register(Box::new(c.clone()))
        .expect("metric can be registered");
    c
}

/// Sum a counter family across all label combinations.
fn counter_sum(counter: &IntCounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

impl ApiMetrics {
    /// Create a metrics instance with a fresh registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            &registry,
            "foodhub_http_requests_total",
            "Total HTTP requests",
            &["method", "path", "status"],
        );

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "foodhub_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");

        let http_errors_total = counter_vec(
            &registry,
            "foodhub_http_errors_total",
            "Total HTTP errors (4xx and 5xx)",
            &["method", "path", "status"],
        );

        let products_total = gauge(&registry, "foodhub_products_total", "Cataloged products");
        let ratings_total = gauge(&registry, "foodhub_ratings_total", "Stored product ratings");
        let companies_total = gauge(&registry, "foodhub_companies_total", "Known companies");
        let taste_tags_total = gauge_vec(
            &registry,
            "foodhub_taste_tags_total",
            "Taste tags by polarity",
            &["polarity"],
        );
        let lookup_client_configured = gauge(
            &registry,
            "foodhub_lookup_client_configured",
            "Whether the EAN-DB lookup client is configured (1=yes, 0=no)",
        );

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                products_total,
                ratings_total,
                companies_total,
                taste_tags_total,
                lookup_client_configured,
            }),
        }
    }

    /// Total requests recorded so far, summed across all label sets.
    pub fn requests(&self) -> u64 {
        counter_sum(&self.inner.http_requests_total)
    }

    /// Total 4xx/5xx responses recorded so far.
    pub fn errors(&self) -> u64 {
        counter_sum(&self.inner.http_errors_total)
    }

    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    // Gauges refreshed by the /metrics handler.

    pub fn products_total(&self) -> &Gauge {
        &self.inner.products_total
    }

    pub fn ratings_total(&self) -> &Gauge {
        &self.inner.ratings_total
    }

    pub fn companies_total(&self) -> &Gauge {
        &self.inner.companies_total
    }

    pub fn taste_tags_total(&self) -> &GaugeVec {
        &self.inner.taste_tags_total
    }

    pub fn lookup_client_configured(&self) -> &Gauge {
        &self.inner.lookup_client_configured
    }

    /// Encode every registered family to the Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.inner.registry.gather(), &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a request path for use as a Prometheus label.
///
/// UUID segments become `{id}` and the tag segment of the by-tag listing
/// becomes `{slug}`. Prevents cardinality explosion in Prometheus labels.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        let after_by_tag = segments.last() == Some(&"by-tag");
        if after_by_tag && !segment.is_empty() {
            segments.push("{slug}");
        } else if is_uuid_segment(segment) {
            segments.push("{id}");
        } else {
            segments.push(segment);
        }
    }
    segments.join("/")
}

/// Match a standard UUID (8-4-4-4-12 hex chars with hyphens) or a bare
/// 32-hex-char form.
fn is_uuid_segment(segment: &str) -> bool {
    if segment.len() == 36 {
        return segment.chars().enumerate().all(|(i, c)| {
            if i == 8 || i == 13 || i == 18 || i == 23 {
                c == '-'
            } else {
                c.is_ascii_hexdigit()
            }
        });
    }
    segment.len() == 32 && segment.chars().all(|c| c.is_ascii_hexdigit())
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registry_counts_nothing() {
        let m = ApiMetrics::default();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn record_request_feeds_both_counters() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/v1/products", 200, 0.012);
        m.record_request("POST", "/v1/products", 201, 0.034);
        m.record_request("GET", "/v1/products/{id}", 404, 0.002);
        m.record_request("POST", "/v1/ratings", 422, 0.004);

        assert_eq!(m.requests(), 4);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn parallel_recording_is_lossless() {
        let m = ApiMetrics::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        m.record_request("GET", "/v1/products", 200, 0.001);
                        m.record_request("GET", "/v1/products/{id}", 500, 0.001);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(m.requests(), 8_000);
        assert_eq!(m.errors(), 4_000);
    }

    #[test]
    fn clones_share_the_registry() {
        let m = ApiMetrics::new();
        let clone = m.clone();
        m.record_request("GET", "/v1/countries", 200, 0.01);
        clone.record_request("GET", "/v1/countries", 500, 0.01);

        assert_eq!(m.requests(), 2);
        assert_eq!(clone.errors(), 1);
    }

    #[test]
    fn scrape_contains_http_families() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/v1/products", 200, 0.01);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("foodhub_http_requests_total"));
        assert!(output.contains("foodhub_http_request_duration_seconds"));
    }

    #[test]
    fn scrape_contains_domain_gauges() {
        let m = ApiMetrics::new();
        m.products_total().set(12.0);
        m.ratings_total().set(30.0);
        m.companies_total().set(5.0);
        m.taste_tags_total()
            .with_label_values(&["positive"])
            .set(4.0);
        m.taste_tags_total()
            .with_label_values(&["negative"])
            .set(2.0);
        m.lookup_client_configured().set(1.0);

        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("foodhub_products_total 12"));
        assert!(output.contains("foodhub_taste_tags_total{polarity=\"positive\"} 4"));
        assert!(output.contains("foodhub_lookup_client_configured 1"));
    }

    #[test]
    fn path_ids_collapse_for_labels() {
        let path = "/v1/products/550e8400-e29b-41d4-a716-446655440000/ratings";
        assert_eq!(normalize_path(path), "/v1/products/{id}/ratings");
    }

    #[test]
    fn bare_hex_ids_collapse_too() {
        assert_eq!(
            normalize_path("/v1/products/550e8400e29b41d4a716446655440000"),
            "/v1/products/{id}"
        );
    }

    #[test]
    fn by_tag_slugs_collapse_for_labels() {
        assert_eq!(
            normalize_path("/v1/products/by-tag/bitter"),
            "/v1/products/by-tag/{slug}"
        );
    }

    #[test]
    fn static_segments_pass_through() {
        assert_eq!(normalize_path("/v1/products/search"), "/v1/products/search");
    }

    #[test]
    fn every_id_in_the_path_collapses() {
        let path = "/v1/products/550e8400-e29b-41d4-a716-446655440000/ratings/660e8400-e29b-41d4-a716-446655440001";
        assert_eq!(normalize_path(path), "/v1/products/{id}/ratings/{id}");
    }
}
