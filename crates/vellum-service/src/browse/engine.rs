//! Browse engine over archived item metadata.

use std::cmp::Ordering;

use vellum_core::config::BrowseConfig;
use vellum_core::types::SortOrder;
use vellum_db::model::item::ItemRecord;
use vellum_db::store::RepositoryStore;

use crate::auth::ItemVisibility;
use crate::error::{ServiceError, ServiceResult};
use crate::hierarchy::HierarchyBuilder;

use super::scope::{BrowseContainer, BrowserScope};

/// One page of browse results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsePage {
    pub items: Vec<ItemRecord>,
    pub total: usize,
    pub offset: i64,
    pub results_per_page: i64,
    /// Metadata field the listing was sorted on.
    pub sort_field: String,
}

/// Metadata fields a scope resolves to.
struct ResolvedFields<'c> {
    index_field: &'c str,
    sort_field: &'c str,
}

pub struct BrowseEngine<'a> {
    store: &'a dyn RepositoryStore,
    config: &'a BrowseConfig,
}

impl<'a> BrowseEngine<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn RepositoryStore, config: &'a BrowseConfig) -> Self {
        Self { store, config }
    }

    fn resolve_fields(&self, scope: &BrowserScope) -> ServiceResult<ResolvedFields<'a>> {
        let config: &'a BrowseConfig = self.config;
        let index_field = config
            .indices
            .iter()
            .find(|i| i.name == scope.index)
            .map(|i| i.field.as_str())
            .ok_or_else(|| ServiceError::BrowseFailure(format!("unknown browse index {}", scope.index)))?;

        let sort_field = match &scope.sort_by {
            None => index_field,
            Some(name) => config
                .sort_options
                .iter()
                .find(|s| &s.name == name)
                .map(|s| s.field.as_str())
                .ok_or_else(|| ServiceError::BrowseFailure(format!("unknown sort option {name}")))?,
        };

        Ok(ResolvedFields {
            index_field,
            sort_field,
        })
    }

    async fn collection_filter(
        &self,
        container: Option<&BrowseContainer>,
    ) -> ServiceResult<Option<Vec<uuid::Uuid>>> {
        Ok(match container {
            None => None,
            Some(BrowseContainer::Collection(collection)) => Some(vec![collection.id]),
            Some(BrowseContainer::Community(community)) => Some(
                HierarchyBuilder::new(self.store)
                    .build_from(community.id)
                    .await?
                    .collection_ids(),
            ),
        })
    }

    /// ## Summary
    /// Runs a browse and returns the requested page.
    ///
    /// Only items `visibility` admits are counted or paged. Items are
    /// ordered by the first value of the sort field, case-insensitively,
    /// with items lacking the field last and ties broken by item id.
    ///
    /// ## Errors
    /// `BrowseFailure` for an unknown index or sort option or a negative
    /// range; `StructuralCycle` or collaborator errors from scope expansion.
    #[tracing::instrument(skip(self, scope, visibility), fields(index = %scope.index, offset = scope.offset))]
    pub async fn browse(
        &self,
        scope: &BrowserScope,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<BrowsePage> {
        let fields = self.resolve_fields(scope)?;
        if scope.offset < 0 || scope.results_per_page <= 0 {
            return Err(ServiceError::BrowseFailure("invalid browse range".to_string()));
        }

        let collection_ids = self.collection_filter(scope.container.as_ref()).await?;
        let mut records = self.store.archived_items(collection_ids.as_deref()).await?;

        if let Some(value) = &scope.value {
            records.retain(|r| r.values(fields.index_field).any(|v| v.eq_ignore_ascii_case(value)));
        }

        let sort_key = |record: &ItemRecord| record.first_value(fields.sort_field).map(str::to_lowercase);

        if let Some(prefix) = &scope.starts_with {
            let prefix = prefix.to_lowercase();
            records.retain(|r| sort_key(r).is_some_and(|k| k.starts_with(&prefix)));
        }
        let records = visibility.retain_visible(records)?;

        let mut keyed: Vec<(Option<String>, ItemRecord)> =
            records.into_iter().map(|r| (sort_key(&r), r)).collect();
        keyed.sort_by(|(ka, a), (kb, b)| {
            let by_key = match (ka, kb) {
                (Some(x), Some(y)) => match scope.order {
                    SortOrder::Ascending => x.cmp(y),
                    SortOrder::Descending => y.cmp(x),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_key.then_with(|| a.item.id.cmp(&b.item.id))
        });

        let total = keyed.len();
        let skip = usize::try_from(scope.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(scope.results_per_page).unwrap_or(usize::MAX);
        let items: Vec<ItemRecord> = keyed.into_iter().skip(skip).take(take).map(|(_, r)| r).collect();

        tracing::debug!(total, returned = items.len(), "Browse complete");

        Ok(BrowsePage {
            items,
            total,
            offset: scope.offset,
            results_per_page: scope.results_per_page,
            sort_field: fields.sort_field.to_string(),
        })
    }
}
