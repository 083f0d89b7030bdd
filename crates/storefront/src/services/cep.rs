//! Postal-code (CEP) lookup client.
//!
//! Resolves a Brazilian postal code to a partial delivery address using
//! a third-party JSON API. Successful lookups are cached with a short TTL
//! since postal-code data changes rarely and the checkout form fires a
//! lookup every time the field reaches a complete value.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Cache TTL for resolved postal codes.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached postal codes.
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when resolving a postal code.
#[derive(Debug, Error)]
pub enum CepError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service does not know this postal code (HTTP 400/404).
    #[error("postal code not found: {0}")]
    NotFound(String),

    /// The service returned an unexpected error status.
    #[error("lookup service error: status {status}")]
    Api { status: u16 },
}

impl CepError {
    /// Whether this failure means "the postal code does not exist", as
    /// opposed to a transport or service problem.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Partial address resolved from a postal code.
///
/// Field names follow the lookup service's JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct CepAddress {
    /// Street name.
    #[serde(rename = "address_name")]
    pub street: String,
    /// Two-letter region (UF) code.
    #[serde(rename = "state")]
    pub region: String,
    /// District (bairro).
    pub district: String,
    /// City name.
    pub city: String,
}

/// Client for the postal-code lookup service.
#[derive(Clone)]
pub struct CepClient {
    inner: Arc<CepClientInner>,
}

struct CepClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CepAddress>,
}

impl CepClient {
    /// Create a new lookup client against the given service base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CepClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Resolve a postal code to a partial address.
    ///
    /// # Errors
    ///
    /// Returns [`CepError::NotFound`] when the service answers 400 or 404,
    /// [`CepError::Api`] for other error statuses, and [`CepError::Http`]
    /// for transport failures.
    #[instrument(skip(self))]
    pub async fn lookup(&self, postal_code: &str) -> Result<CepAddress, CepError> {
        if let Some(hit) = self.inner.cache.get(postal_code).await {
            debug!(postal_code, "postal-code cache hit");
            return Ok(hit);
        }

        let url = format!(
            "{}/json/{}",
            self.inner.base_url,
            urlencoding::encode(postal_code)
        );

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            return Err(CepError::NotFound(postal_code.to_string()));
        }
        if !status.is_success() {
            return Err(CepError::Api {
                status: status.as_u16(),
            });
        }

        let address: CepAddress = response.json().await?;
        self.inner
            .cache
            .insert(postal_code.to_string(), address.clone())
            .await;

        Ok(address)
    }
}
