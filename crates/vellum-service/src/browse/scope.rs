use serde::Deserialize;
use vellum_core::config::BrowseConfig;
use vellum_core::types::SortOrder;
use vellum_db::model::container::{Collection, Community};
use vellum_db::store::HandleTarget;

use crate::auth::ResourcePath;
use crate::error::{ServiceError, ServiceResult};
use crate::locate::ResourceLocator;

/// Container a browse is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseContainer {
    Community(Community),
    Collection(Collection),
}

impl BrowseContainer {
    #[must_use]
    pub fn handle(&self) -> &str {
        match self {
            Self::Community(c) => &c.handle,
            Self::Collection(c) => &c.handle,
        }
    }

    #[must_use]
    pub const fn resource_path(&self) -> ResourcePath {
        match self {
            Self::Community(c) => ResourcePath::community(c.id),
            Self::Collection(c) => ResourcePath::collection(c.id),
        }
    }
}

/// Raw browse query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseParams {
    #[serde(rename = "type")]
    pub index: Option<String>,
    pub order: Option<String>,
    pub sort_by: Option<String>,
    pub scope: Option<String>,
    pub value: Option<String>,
    pub starts_with: Option<String>,
    pub offset: Option<String>,
    pub rpp: Option<String>,
}

/// A fully resolved browse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserScope {
    pub index: String,
    pub order: SortOrder,
    pub sort_by: Option<String>,
    pub container: Option<BrowseContainer>,
    pub value: Option<String>,
    pub starts_with: Option<String>,
    pub offset: i64,
    pub results_per_page: i64,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty()).map(ToString::to_string)
}

impl BrowserScope {
    /// ## Summary
    /// Builds a scope from query parameters.
    ///
    /// Missing or malformed paging values fall back to defaults and the page
    /// size is capped at the configured maximum. Index and sort names are
    /// checked later by the engine.
    ///
    /// ## Errors
    /// `BrowseFailure` for an unknown order, `NotFound` if the scope handle is
    /// unknown or names an item, or a collaborator error.
    pub async fn from_params(
        params: &BrowseParams,
        locator: &ResourceLocator<'_>,
        config: &BrowseConfig,
    ) -> ServiceResult<Self> {
        let order = match non_empty(params.order.as_ref()) {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(&raw)
                .ok_or_else(|| ServiceError::BrowseFailure(format!("unknown order {raw}")))?,
        };

        let container = match non_empty(params.scope.as_ref()) {
            None => None,
            Some(handle) => Some(match locator.locate_handle(&handle).await? {
                HandleTarget::Community(c) => BrowseContainer::Community(c),
                HandleTarget::Collection(c) => BrowseContainer::Collection(c),
                HandleTarget::Item(_) => {
                    return Err(ServiceError::NotFound(format!(
                        "browse scope {handle} is not a container"
                    )));
                }
            }),
        };

        let index = non_empty(params.index.as_ref())
            .or_else(|| config.indices.first().map(|i| i.name.clone()))
            .unwrap_or_default();

        let offset = params
            .offset
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|o| *o >= 0)
            .unwrap_or(0);
        let results_per_page = params
            .rpp
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|r| *r > 0)
            .unwrap_or(config.default_rpp)
            .min(config.max_rpp);

        Ok(Self {
            index,
            order,
            sort_by: non_empty(params.sort_by.as_ref()),
            container,
            value: non_empty(params.value.as_ref()),
            starts_with: non_empty(params.starts_with.as_ref()),
            offset,
            results_per_page,
        })
    }

    /// ## Summary
    /// Widens the scope to the complete result set.
    #[must_use]
    pub const fn for_export(mut self) -> Self {
        self.offset = 0;
        self.results_per_page = i64::MAX;
        self
    }
}
