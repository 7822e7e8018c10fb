//! `/simple-search` and `/advanced-search` through the configured processor.

use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;
use vellum_core::constants::{ADVANCED_SEARCH_ROUTE_COMPONENT, SIMPLE_SEARCH_ROUTE_COMPONENT};
use vellum_service::search::{
    AdvancedQuery, SearchResults, SimpleQuery, get_search_registry_from_depot,
};

use super::context::RequestContext;
use super::render::ItemSummary;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct SearchBody {
    processor: &'static str,
    total: usize,
    offset: i64,
    results_per_page: i64,
    items: Vec<ItemSummary>,
}

enum SearchRequest {
    Simple(SimpleQuery),
    Advanced(AdvancedQuery),
}

async fn serve(depot: &Depot, res: &mut Response, request: SearchRequest) -> AppResult<()> {
    let ctx = RequestContext::from_depot(depot)?;
    let processor = get_search_registry_from_depot(depot)?.active();
    let store = ctx.store.as_ref();
    let visibility = ctx.gate.view(&ctx.subjects);

    let results: SearchResults = match &request {
        SearchRequest::Simple(query) => processor.simple_search(store, query, &visibility).await?,
        SearchRequest::Advanced(query) => {
            processor.advanced_search(store, query, &visibility).await?
        }
    };

    res.render(Json(SearchBody {
        processor: processor.name(),
        total: results.total,
        offset: results.offset,
        results_per_page: results.results_per_page,
        items: results.items.iter().map(ItemSummary::from).collect(),
    }));
    Ok(())
}

/// GET `/simple-search?query=&offset=&rpp=`.
#[handler]
#[tracing::instrument(skip_all)]
async fn simple_search(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let query = SimpleQuery {
        query: req.query::<String>("query"),
        offset: req.query::<i64>("offset"),
        rpp: req.query::<i64>("rpp"),
    };
    if let Err(err) = serve(depot, res, SearchRequest::Simple(query)).await {
        err.render(req, depot, res);
    }
}

/// GET `/advanced-search?field1=&query1=&field2=&query2=...&offset=&rpp=`.
#[handler]
#[tracing::instrument(skip_all)]
async fn advanced_search(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let queries = req.queries();
    let query = AdvancedQuery::from_params(|key| queries.get(key).map(String::as_str));
    if let Err(err) = serve(depot, res, SearchRequest::Advanced(query)).await {
        err.render(req, depot, res);
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(Router::with_path(SIMPLE_SEARCH_ROUTE_COMPONENT).get(simple_search))
        .push(Router::with_path(ADVANCED_SEARCH_ROUTE_COMPONENT).get(advanced_search))
}
