//! Name-keyed registry of provider factories
//!
//! Registering a name twice replaces the earlier factory.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parley_config::ProviderConfig;

use super::Client;
use crate::error::LlmError;
use crate::types::RequestContext;

/// Builds a client from a request context and resolved configuration
pub type ProviderFactory =
    Arc<dyn Fn(RequestContext, ProviderConfig) -> BoxFuture<'static, Result<Box<dyn Client>, LlmError>> + Send + Sync>;

/// Thread-safe map from provider name to factory
#[derive(Default)]
pub struct ProviderRegistry {
    factories: DashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any existing entry
    pub fn register<F, Fut>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(RequestContext, ProviderConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn Client>, LlmError>> + Send + 'static,
    {
        let name = name.into();
        let factory: ProviderFactory = Arc::new(move |ctx, config| factory(ctx, config).boxed());

        if self.factories.insert(name.clone(), factory).is_some() {
            tracing::debug!(provider = %name, "replaced provider factory");
        }
    }

    /// Factory registered under `name`
    pub fn get_factory(&self, name: &str) -> Result<ProviderFactory, LlmError> {
        self.factories
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LlmError::UnsupportedProvider {
                name: name.to_owned(),
                available: self.list_providers(),
            })
    }

    /// Registered names, sorted and joined with `", "`
    pub fn list_providers(&self) -> String {
        let mut names: Vec<String> = self.factories.iter().map(|entry| entry.key().clone()).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.factories.len()
    }

    /// Look up `name` and build a client with it
    pub async fn create(
        &self,
        name: &str,
        ctx: RequestContext,
        config: ProviderConfig,
    ) -> Result<Box<dyn Client>, LlmError> {
        let factory = self.get_factory(name)?;
        factory(ctx, config).await
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list_providers())
            .finish()
    }
}
