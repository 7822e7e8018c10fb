use salvo::{Depot, Request, Response, handler};
use vellum_service::locate::ResourceLocator;

use super::helpers::deliver;
use crate::app::api::context::RequestContext;
use crate::error::AppResult;
use crate::store_handler::get_assets_from_depot;

/// ## Summary
/// GET/HEAD `/bitstream/{prefix}/{suffix}/{sequence}/{filename...}`: streams
/// a bitstream of the item with that handle, by sequence number or, failing
/// that, by file name.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = %req.method(),
    path = %req.uri().path()
))]
pub async fn bitstream(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let rest = req.param::<String>("rest").unwrap_or_default();
    if let Err(err) = serve(req, depot, res, &rest).await {
        err.render(req, depot, res);
    }
}

async fn serve(req: &Request, depot: &Depot, res: &mut Response, rest: &str) -> AppResult<()> {
    let ctx = RequestContext::from_depot(depot)?;
    let assets = get_assets_from_depot(depot)?;
    let record = ResourceLocator::new(ctx.store.as_ref())
        .locate_bitstream_path(rest)
        .await?;

    deliver(req, res, &ctx, assets.as_ref(), &record).await
}
