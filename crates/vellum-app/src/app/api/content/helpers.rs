//! The resolve, authorize, conditional and stream sequence shared by content routes.

use salvo::http::Method;
use salvo::{Request, Response};
use vellum_db::assetstore::{AssetStore, ByteSource};
use vellum_db::model::bitstream::BitstreamRecord;
use vellum_service::auth::ResourcePath;
use vellum_service::delivery::stream::ContentStreamer;
use vellum_service::delivery::{DeliveryHeaders, respond_not_modified};
use vellum_service::error::ServiceError;

use crate::app::api::context::RequestContext;
use crate::error::AppResult;

/// ## Errors
/// Returns `AuthorizationDenied` if the actor may not read the bitstream.
pub(super) fn authorize_read(ctx: &RequestContext, record: &BitstreamRecord) -> AppResult<()> {
    ctx.gate
        .authorize_bitstream(&ctx.subjects, record)?
        .require(&ResourcePath::bitstream(record.bitstream.id))?;
    Ok(())
}

/// ## Errors
/// Returns a storage error classified by [`ServiceError::from_storage_io`].
pub(super) async fn open_content(
    assets: &dyn AssetStore,
    record: &BitstreamRecord,
) -> AppResult<ByteSource> {
    assets
        .open(&record.bitstream.internal_id)
        .await
        .map_err(|e| {
            ServiceError::from_storage_io(&e, &format!("bitstream {}", record.bitstream.id)).into()
        })
}

/// ## Summary
/// Answers 304 or streams the bitstream's bytes with planned headers.
/// The caller has already authorized the read.
///
/// ## Errors
/// Storage errors opening the content, or header failures.
pub(super) async fn send_bitstream(
    req: &Request,
    res: &mut Response,
    assets: &dyn AssetStore,
    record: &BitstreamRecord,
    plan: impl FnOnce(u64) -> DeliveryHeaders,
) -> AppResult<()> {
    let last_modified = Some(record.bitstream.last_modified);
    if respond_not_modified(req, res, last_modified)? {
        return Ok(());
    }

    let source = open_content(assets, record).await?;
    let headers = plan(source.length).with_last_modified(last_modified);
    tracing::debug!(
        bitstream_id = %record.bitstream.id,
        length = source.length,
        attachment = headers.content_disposition.is_some(),
        "Delivering bitstream"
    );
    ContentStreamer::stream(res, source, &headers, req.method() == Method::HEAD)?;
    Ok(())
}

/// ## Summary
/// Full pipeline for `/retrieve` and `/bitstream`: authorize, then send with
/// the configured attachment threshold.
///
/// ## Errors
/// Denials, storage errors and header failures.
pub(super) async fn deliver(
    req: &Request,
    res: &mut Response,
    ctx: &RequestContext,
    assets: &dyn AssetStore,
    record: &BitstreamRecord,
) -> AppResult<()> {
    authorize_read(ctx, record)?;
    let threshold = ctx.config.delivery.threshold();
    send_bitstream(req, res, assets, record, |length| {
        DeliveryHeaders::plan(
            &record.bitstream.mime_type,
            length,
            &record.bitstream.name,
            threshold,
        )
    })
    .await
}
