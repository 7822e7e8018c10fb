use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};
use serde::Serialize;
use vellum_service::hierarchy::HierarchyBuilder;

use crate::app::api::context::RequestContext;
use crate::app::api::render::CommunityNode;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct CommunityList {
    communities: Vec<CommunityNode>,
}

/// ## Summary
/// GET `/community-list`: every top-level community with its sub-communities
/// and collections, in store order.
///
/// ## Errors
/// A cycle in the stored hierarchy answers 500 `integrity_error`.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn community_list(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = serve(depot, res).await {
        err.render(req, depot, res);
    }
}

async fn serve(depot: &Depot, res: &mut Response) -> AppResult<()> {
    let ctx = RequestContext::from_depot(depot)?;
    let index = HierarchyBuilder::new(ctx.store.as_ref()).build_all().await?;

    let communities = index
        .roots()
        .iter()
        .filter_map(|id| index.community(*id))
        .map(|community| CommunityNode::from_index(&index, community))
        .collect();

    res.render(Json(CommunityList { communities }));
    Ok(())
}
