//! EAN-DB HTTP client: barcode lookups and image retrieval.

use std::path::Path;
use std::time::Duration;

use foodhub_core::EanCode;

use crate::error::LookupError;
use crate::types::{EanDbProduct, EanDbResponse, ProductLookup};

/// Configuration for the EAN-DB client.
#[derive(Debug, Clone)]
pub struct EanDbConfig {
    /// Base URL of the product endpoint (e.g., `https://ean-db.com/api/v2/product`).
    pub base_url: String,
    /// JWT bearer token for EAN-DB authentication.
    pub token: String,
    /// Request timeout in seconds (default: 5).
    pub timeout_secs: u64,
}

impl EanDbConfig {
    /// Create a new configuration with the default timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_secs: 5,
        }
    }
}

/// HTTP client for EAN-DB product lookups.
///
/// Holds two `reqwest::Client`s: `api` carries the bearer token for registry
/// calls, `downloads` is bare so the credential is never sent to the image
/// hosts the registry links to.
#[derive(Debug, Clone)]
pub struct EanDbClient {
    api: reqwest::Client,
    downloads: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl EanDbClient {
    /// Create a new EAN-DB client from configuration.
    pub fn new(config: EanDbConfig) -> Result<Self, LookupError> {
        let api = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.token))
                        .map_err(|_| LookupError::NotConfigured {
                            reason: "invalid token characters".into(),
                        })?,
                );
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| LookupError::NotConfigured {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let downloads = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::NotConfigured {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            api,
            downloads,
            base_url,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Look up a barcode, returning the raw registry record.
    ///
    /// `Ok(None)` means the registry answered 200 without a product payload.
    /// A 404 maps to [`LookupError::NotFound`]; other non-2xx statuses map to
    /// [`LookupError::Api`] with a body excerpt for diagnostics.
    pub async fn try_fetch(&self, ean: &EanCode) -> Result<Option<EanDbProduct>, LookupError> {
        let endpoint = format!("{}/{}", self.base_url, ean);
        let resp = self
            .api
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                ean: ean.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                endpoint,
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let payload: EanDbResponse =
            resp.json()
                .await
                .map_err(|source| LookupError::Deserialization { endpoint, source })?;
        Ok(payload.product)
    }

    /// Fetch product facts for a barcode, downloading the first listed image
    /// under `{media_root}/product_images/`.
    ///
    /// The registry is best-effort: every lookup failure is logged and
    /// collapsed to `None`. A failed image download never discards the rest
    /// of the record.
    pub async fn fetch_product_data(
        &self,
        ean: &EanCode,
        media_root: &Path,
    ) -> Option<ProductLookup> {
        let product = match self.try_fetch(ean).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                tracing::info!(ean = %ean, "EAN-DB record has no product payload");
                return Some(ProductLookup::default());
            }
            Err(err) => {
                tracing::warn!(ean = %ean, error = %err, "EAN-DB lookup failed");
                return None;
            }
        };

        let mut lookup = product.to_lookup();
        if let Some(url) = product.first_image_url() {
            match self.download_image(url, media_root).await {
                Ok(path) => lookup.image_path = Some(path),
                Err(err) => {
                    tracing::warn!(
                        ean = %ean,
                        url,
                        error = %err,
                        "image download failed, continuing without image"
                    );
                }
            }
        }
        Some(lookup)
    }

    /// Download an image into `{media_root}/product_images/`, returning the
    /// stored path relative to the media root.
    async fn download_image(&self, image_url: &str, media_root: &Path) -> Result<String, LookupError> {
        let filename = image_filename(image_url);
        let dir = media_root.join("product_images");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| LookupError::ImageStore {
                url: image_url.to_string(),
                reason: e.to_string(),
            })?;

        let resp = self
            .downloads
            .get(image_url)
            .send()
            .await
            .map_err(|e| self.transport_error(image_url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Api {
                endpoint: image_url.to_string(),
                status: status.as_u16(),
                body: String::new(),
            });
        }
        let bytes = resp.bytes().await.map_err(|source| LookupError::Http {
            endpoint: image_url.to_string(),
            source,
        })?;

        tokio::fs::write(dir.join(&filename), &bytes)
            .await
            .map_err(|e| LookupError::ImageStore {
                url: image_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(format!("product_images/{filename}"))
    }

    fn transport_error(&self, endpoint: &str, source: reqwest::Error) -> LookupError {
        if source.is_timeout() {
            LookupError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            LookupError::Http {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }
}

/// First few hundred characters of an error response body, enough to see
/// what the registry complained about without logging whole payloads.
fn excerpt(body: &str) -> String {
    const MAX: usize = 256;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        body.chars().take(MAX).collect()
    }
}

/// Derive a storage filename from the URL's last path segment, falling back
/// to a fixed name. Path segments never contain `/`, and dot-only names are
/// rejected, so the stored file cannot escape the media directory.
fn image_filename(image_url: &str) -> String {
    const FALLBACK: &str = "image_product.jpg";
    let basename = url::Url::parse(image_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .unwrap_or_default();
    if basename.is_empty() || basename == "." || basename == ".." {
        FALLBACK.to_string()
    } else {
        basename
    }
}
