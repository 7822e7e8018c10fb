//! Search processors selected through a registry.
//!
//! The registry is resolved once at startup from `search.processor`. An
//! unknown key falls back to the built-in metadata scan.

pub mod metadata_scan;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use vellum_core::constants::DEFAULT_SEARCH_PROCESSOR;
use vellum_db::model::item::ItemRecord;
use vellum_db::store::RepositoryStore;

use crate::auth::ItemVisibility;
use crate::error::{ServiceError, ServiceResult};

pub use metadata_scan::MetadataScanProcessor;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleQuery {
    pub query: Option<String>,
    pub offset: Option<i64>,
    pub rpp: Option<i64>,
}

/// One `fieldN`/`queryN` pair; a missing field or `ANY` searches every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub field: Option<String>,
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedQuery {
    pub terms: Vec<SearchTerm>,
    pub offset: Option<i64>,
    pub rpp: Option<i64>,
}

impl AdvancedQuery {
    /// ## Summary
    /// Collects numbered `field1`/`query1`, `field2`/`query2`, ... pairs,
    /// stopping at the first missing query number. Blank queries are skipped.
    pub fn from_params<'p>(params: impl Fn(&str) -> Option<&'p str>) -> Self {
        let mut terms = Vec::new();
        for n in 1.. {
            let Some(query) = params(&format!("query{n}")) else {
                break;
            };
            let query = query.trim();
            if query.is_empty() {
                continue;
            }
            let field = params(&format!("field{n}"))
                .map(str::trim)
                .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case("any"))
                .map(ToString::to_string);
            terms.push(SearchTerm {
                field,
                query: query.to_string(),
            });
        }

        Self {
            terms,
            offset: params("offset").and_then(|s| s.parse().ok()),
            rpp: params("rpp").and_then(|s| s.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub items: Vec<ItemRecord>,
    pub total: usize,
    pub offset: i64,
    pub results_per_page: i64,
}

#[async_trait]
pub trait SearchProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    /// ## Summary
    /// Results hold only items `visibility` admits, and `total` counts only those.
    ///
    /// ## Errors
    /// Returns collaborator errors from the store.
    async fn simple_search(
        &self,
        store: &dyn RepositoryStore,
        query: &SimpleQuery,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<SearchResults>;

    /// ## Errors
    /// Returns collaborator errors from the store.
    async fn advanced_search(
        &self,
        store: &dyn RepositoryStore,
        query: &AdvancedQuery,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<SearchResults>;
}

/// Processors by key, with the one chosen for this deployment.
pub struct SearchRegistry {
    processors: HashMap<&'static str, Arc<dyn SearchProcessor>>,
    active: Arc<dyn SearchProcessor>,
}

impl Default for SearchRegistry {
    fn default() -> Self {
        let fallback: Arc<dyn SearchProcessor> = Arc::new(MetadataScanProcessor::default());
        Self {
            processors: HashMap::from([(fallback.name(), fallback.clone())]),
            active: fallback,
        }
    }
}

impl SearchRegistry {
    pub fn register(&mut self, processor: Arc<dyn SearchProcessor>) {
        self.processors.insert(processor.name(), processor);
    }

    /// ## Summary
    /// Selects the processor registered under `key`, falling back to
    /// `metadata-scan` when there is none.
    #[must_use]
    pub fn resolve(mut self, key: &str) -> Self {
        if let Some(processor) = self.processors.get(key) {
            self.active = processor.clone();
        } else {
            tracing::warn!(
                requested = %key,
                fallback = DEFAULT_SEARCH_PROCESSOR,
                "Unknown search processor, using fallback"
            );
            if let Some(fallback) = self.processors.get(DEFAULT_SEARCH_PROCESSOR) {
                self.active = fallback.clone();
            }
        }
        tracing::info!(processor = self.active.name(), "Search processor selected");
        self
    }

    #[must_use]
    pub fn active(&self) -> Arc<dyn SearchProcessor> {
        self.active.clone()
    }
}

pub struct SearchRegistryHandler {
    pub registry: Arc<SearchRegistry>,
}

#[salvo::async_trait]
impl salvo::Handler for SearchRegistryHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.registry.clone());
    }
}

/// ## Errors
/// Returns `InvariantViolation` if the registry is not in the depot.
pub fn get_search_registry_from_depot(depot: &salvo::Depot) -> ServiceResult<Arc<SearchRegistry>> {
    depot
        .obtain::<Arc<SearchRegistry>>()
        .cloned()
        .map_err(|_err| ServiceError::InvariantViolation("Search registry not found in depot"))
}
