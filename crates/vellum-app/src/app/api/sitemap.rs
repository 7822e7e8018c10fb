//! `/sitemap` and `/htmlmap`: pre-generated site maps served from disk.

use salvo::http::Method;
use salvo::{Depot, Request, Response, Router, handler};
use vellum_core::config::DispositionThreshold;
use vellum_core::constants::{HTMLMAP_ROUTE_COMPONENT, SITEMAP_ROUTE_COMPONENT};
use vellum_service::delivery::stream::ContentStreamer;
use vellum_service::delivery::{DeliveryHeaders, respond_not_modified};
use vellum_service::locate::sitemap::{SitemapKind, open_sitemap};

use crate::config::get_config_from_depot;
use crate::error::AppResult;

async fn serve(req: &Request, depot: &Depot, res: &mut Response, kind: SitemapKind) -> AppResult<()> {
    let config = get_config_from_depot(depot)?;
    let map = req.query::<String>("map");

    let source = open_sitemap(&config.sitemap.dir, kind, map.as_deref()).await?;
    if respond_not_modified(req, res, source.last_modified)? {
        return Ok(());
    }

    let headers = DeliveryHeaders::plan(
        kind.content_type(),
        source.length,
        "",
        DispositionThreshold::Disabled,
    )
    .with_last_modified(source.last_modified)
    .with_content_encoding(kind.content_encoding());

    ContentStreamer::stream(res, source, &headers, req.method() == Method::HEAD)?;
    Ok(())
}

/// ## Summary
/// GET `/sitemap?map={n}`: compressed XML sitemap, or the index when `map` is absent.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn sitemap(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = serve(req, depot, res, SitemapKind::Xml).await {
        err.render(req, depot, res);
    }
}

/// GET `/htmlmap?map={n}`.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn htmlmap(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = serve(req, depot, res, SitemapKind::Html).await {
        err.render(req, depot, res);
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(Router::with_path(SITEMAP_ROUTE_COMPONENT).get(sitemap).head(sitemap))
        .push(Router::with_path(HTMLMAP_ROUTE_COMPONENT).get(htmlmap).head(htmlmap))
}
