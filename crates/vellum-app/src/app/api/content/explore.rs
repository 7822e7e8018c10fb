use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};
use vellum_service::error::ServiceError;
use vellum_service::locate::{BitstreamRef, ResourceLocator};
use vellum_service::viewer::{ViewerOutput, ViewerRegistry};

use super::helpers::{authorize_read, send_bitstream};
use crate::app::api::context::RequestContext;
use crate::error::AppResult;
use crate::store_handler::get_assets_from_depot;

/// ## Summary
/// GET `/explore?bitstream_id=&handle=&provider=`: presents a bitstream
/// through a viewer provider. When `handle` is given the bitstream must
/// belong to that item.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn explore(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = serve(req, depot, res).await {
        err.render(req, depot, res);
    }
}

async fn serve(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let reference = req
        .query::<String>("bitstream_id")
        .ok_or_else(|| ServiceError::InvalidIdentifier("missing bitstream_id".to_string()))?;
    let reference = BitstreamRef::parse(&reference)?;
    let handle = req.query::<String>("handle").filter(|h| !h.is_empty());
    let provider_key = req.query::<String>("provider");

    let ctx = RequestContext::from_depot(depot)?;
    let record = ResourceLocator::new(ctx.store.as_ref())
        .locate_bitstream_ref(reference)
        .await?;

    if let Some(handle) = &handle
        && record.item.handle.as_deref() != Some(handle.as_str())
    {
        return Err(ServiceError::NotFound(format!(
            "bitstream {} is not part of {handle}",
            record.bitstream.id
        ))
        .into());
    }

    authorize_read(&ctx, &record)?;

    let provider = ViewerRegistry::default()
        .get(provider_key.as_deref())
        .ok_or(ServiceError::InvariantViolation("No default viewer provider"))?;
    tracing::debug!(provider = provider.name(), "Presenting bitstream");

    match provider.present(&record) {
        ViewerOutput::Info(info) => {
            res.status_code(StatusCode::OK);
            res.render(Json(info));
            Ok(())
        }
        ViewerOutput::Content(planned) => {
            let assets = get_assets_from_depot(depot)?;
            send_bitstream(req, res, assets.as_ref(), &record, |length| {
                let mut headers = planned;
                headers.content_length = length;
                headers
            })
            .await
        }
    }
}
