//! `/browse`: paged metadata listings, and full CSV export for administrators.

use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;
use vellum_core::constants::{BROWSE_ROUTE_COMPONENT, EXPORT_METADATA_SUBMIT};
use vellum_service::auth::Action;
use vellum_service::browse::{
    BrowseEngine, BrowseExportCoordinator, BrowseParams, BrowserScope,
};
use vellum_service::delivery::stream::ContentStreamer;
use vellum_service::error::ServiceError;
use vellum_service::locate::ResourceLocator;

use super::context::RequestContext;
use super::render::ItemSummary;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct BrowseBody {
    index: String,
    order: &'static str,
    sort_field: String,
    scope: Option<String>,
    total: usize,
    offset: i64,
    results_per_page: i64,
    items: Vec<ItemSummary>,
}

/// ## Summary
/// GET `/browse?type=&order=&sort_by=&scope=&value=&starts_with=&offset=&rpp=`.
///
/// With `submit_export_metadata` present, the complete result set is sent
/// as a CSV attachment instead. Export is restricted to administrators.
///
/// ## Errors
/// Unknown indices, sort options or orders answer 500 `integrity_error`
/// before any content is written.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn browse(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let params = match req.parse_queries::<BrowseParams>() {
        Ok(params) => params,
        Err(e) => {
            tracing::debug!(error = %e, "Unparseable browse parameters");
            BrowseParams::default()
        }
    };
    let export = req.query::<String>(EXPORT_METADATA_SUBMIT).is_some();

    if let Err(err) = serve(depot, res, &params, export).await {
        err.render(req, depot, res);
    }
}

async fn serve(
    depot: &Depot,
    res: &mut Response,
    params: &BrowseParams,
    export: bool,
) -> AppResult<()> {
    let ctx = RequestContext::from_depot(depot)?;
    let store = ctx.store.as_ref();

    if export && !ctx.gate.is_admin(&ctx.subjects)? {
        return Err(ServiceError::AuthorizationDenied("browse export".to_string()).into());
    }

    let scope =
        BrowserScope::from_params(params, &ResourceLocator::new(store), &ctx.config.browse).await?;
    if let Some(container) = &scope.container {
        let resource = container.resource_path();
        ctx.gate
            .authorize(&ctx.subjects, &resource, Action::Read)?
            .require(&resource)?;
    }

    let engine = BrowseEngine::new(store, &ctx.config.browse);
    let visibility = ctx.gate.view(&ctx.subjects);

    if export {
        let document = BrowseExportCoordinator::new(store, engine)
            .export_all(scope, &visibility)
            .await?;
        let headers = document.headers();
        tracing::info!(filename = %document.filename, "Sending browse export");
        ContentStreamer::stream(res, document.into_source(), &headers, false)?;
        return Ok(());
    }

    let page = engine.browse(&scope, &visibility).await?;

    res.render(Json(BrowseBody {
        index: scope.index,
        order: scope.order.as_str(),
        sort_field: page.sort_field,
        scope: scope.container.as_ref().map(|c| c.handle().to_string()),
        total: page.total,
        offset: page.offset,
        results_per_page: page.results_per_page,
        items: page.items.iter().map(ItemSummary::from).collect(),
    }));
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(BROWSE_ROUTE_COMPONENT).get(browse)
}
