//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::CepClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the static catalog and the postal-code lookup client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cep: CepClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let cep = CepClient::new(&config.cep_api_base_url);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::default(),
                cep,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the coffee catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the postal-code lookup client.
    #[must_use]
    pub fn cep(&self) -> &CepClient {
        &self.inner.cep
    }
}
