//! Case-insensitive substring search over item metadata.

use async_trait::async_trait;
use vellum_core::constants::DEFAULT_SEARCH_PROCESSOR;
use vellum_db::model::item::ItemRecord;
use vellum_db::store::RepositoryStore;

use crate::auth::ItemVisibility;
use crate::error::ServiceResult;

use super::{AdvancedQuery, SearchProcessor, SearchResults, SearchTerm, SimpleQuery};

#[derive(Debug, Clone)]
pub struct MetadataScanProcessor {
    default_rpp: i64,
    max_rpp: i64,
}

impl Default for MetadataScanProcessor {
    fn default() -> Self {
        Self {
            default_rpp: 20,
            max_rpp: 100,
        }
    }
}

fn matches_term(record: &ItemRecord, term: &SearchTerm) -> bool {
    let needle = term.query.to_lowercase();
    record
        .metadata
        .iter()
        .filter(|m| term.field.as_deref().is_none_or(|f| m.field == f))
        .any(|m| m.value.to_lowercase().contains(&needle))
}

impl MetadataScanProcessor {
    fn page(&self, matched: Vec<ItemRecord>, offset: Option<i64>, rpp: Option<i64>) -> SearchResults {
        let offset = offset.filter(|o| *o >= 0).unwrap_or(0);
        let rpp = rpp
            .filter(|r| *r > 0)
            .unwrap_or(self.default_rpp)
            .min(self.max_rpp);
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(rpp).unwrap_or(usize::MAX))
            .collect();

        SearchResults {
            items,
            total,
            offset,
            results_per_page: rpp,
        }
    }

    async fn scan(
        &self,
        store: &dyn RepositoryStore,
        terms: &[SearchTerm],
        offset: Option<i64>,
        rpp: Option<i64>,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<SearchResults> {
        if terms.is_empty() {
            return Ok(self.page(Vec::new(), offset, rpp));
        }
        let matched: Vec<ItemRecord> = store
            .archived_items(None)
            .await?
            .into_iter()
            .filter(|r| terms.iter().all(|t| matches_term(r, t)))
            .collect();
        let matched = visibility.retain_visible(matched)?;
        tracing::debug!(matched = matched.len(), "Metadata scan complete");
        Ok(self.page(matched, offset, rpp))
    }
}

#[async_trait]
impl SearchProcessor for MetadataScanProcessor {
    fn name(&self) -> &'static str {
        DEFAULT_SEARCH_PROCESSOR
    }

    #[tracing::instrument(skip(self, store, visibility))]
    async fn simple_search(
        &self,
        store: &dyn RepositoryStore,
        query: &SimpleQuery,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<SearchResults> {
        let terms: Vec<SearchTerm> = query
            .query
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(|word| SearchTerm {
                field: None,
                query: word.to_string(),
            })
            .collect();
        self.scan(store, &terms, query.offset, query.rpp, visibility).await
    }

    #[tracing::instrument(skip(self, store, visibility))]
    async fn advanced_search(
        &self,
        store: &dyn RepositoryStore,
        query: &AdvancedQuery,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<SearchResults> {
        self.scan(store, &query.terms, query.offset, query.rpp, visibility)
            .await
    }
}
