use salvo::{Depot, Request, Response, handler};
use vellum_service::locate::{ResourceLocator, parse_retrieve_path};

use super::helpers::deliver;
use crate::app::api::context::RequestContext;
use crate::error::AppResult;
use crate::store_handler::get_assets_from_depot;

/// ## Summary
/// GET/HEAD `/retrieve/{id}[/{filename}]`: streams a bitstream by its
/// numeric id. Anything after the id is decorative.
///
/// ## Errors
/// Invalid or unknown ids answer 404 with an `invalid_id` body.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = %req.method(),
    path = %req.uri().path()
))]
pub async fn retrieve(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let rest = req.param::<String>("rest").unwrap_or_default();
    if let Err(err) = serve(req, depot, res, &rest).await {
        err.render(req, depot, res);
    }
}

async fn serve(req: &Request, depot: &Depot, res: &mut Response, rest: &str) -> AppResult<()> {
    let legacy_id = parse_retrieve_path(rest)?;
    tracing::debug!(legacy_id, "Retrieving bitstream");

    let ctx = RequestContext::from_depot(depot)?;
    let assets = get_assets_from_depot(depot)?;
    let record = ResourceLocator::new(ctx.store.as_ref())
        .locate_retrieve(rest)
        .await?;

    deliver(req, res, &ctx, assets.as_ref(), &record).await
}
