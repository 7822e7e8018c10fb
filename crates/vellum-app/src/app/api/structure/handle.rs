use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};
use serde::Serialize;
use vellum_db::model::item::ItemRecord;
use vellum_db::store::HandleTarget;
use vellum_service::auth::{Action, ResourcePath};
use vellum_service::hierarchy::HierarchyBuilder;
use vellum_service::locate::{HandlePath, ResourceLocator};

use crate::app::api::context::RequestContext;
use crate::app::api::render::{BitstreamSummary, CollectionSummary, CommunityNode, ItemSummary};
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HandlePage {
    Community(CommunityNode),
    Collection(CollectionSummary),
    Item {
        #[serde(flatten)]
        item: ItemSummary,
        bitstreams: Vec<BitstreamSummary>,
    },
}

/// ## Summary
/// GET `/handle/{prefix}/{suffix}`: a community's sub-tree, a collection
/// summary, or an item with the bitstreams the actor may read.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn handle(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let rest = req.param::<String>("rest").unwrap_or_default();
    if let Err(err) = serve(depot, res, &rest).await {
        err.render(req, depot, res);
    }
}

async fn serve(depot: &Depot, res: &mut Response, rest: &str) -> AppResult<()> {
    let path = HandlePath::parse(rest)?;
    if !path.extra.is_empty() {
        tracing::debug!(extra = ?path.extra, "Ignoring extra path info after handle");
    }

    let ctx = RequestContext::from_depot(depot)?;
    let store = ctx.store.as_ref();
    let target = ResourceLocator::new(store).locate_handle(&path.handle).await?;

    let page = match target {
        HandleTarget::Community(community) => {
            let resource = ResourcePath::community(community.id);
            ctx.gate
                .authorize(&ctx.subjects, &resource, Action::Read)?
                .require(&resource)?;
            let index = HierarchyBuilder::new(store).build_from(community.id).await?;
            HandlePage::Community(CommunityNode::from_index(&index, &community))
        }
        HandleTarget::Collection(collection) => {
            let resource = ResourcePath::collection(collection.id);
            ctx.gate
                .authorize(&ctx.subjects, &resource, Action::Read)?
                .require(&resource)?;
            HandlePage::Collection(CollectionSummary::from(&collection))
        }
        HandleTarget::Item(item) => {
            ctx.gate
                .authorize_item(&ctx.subjects, &item)?
                .require(&ResourcePath::item(item.id))?;

            let record = ItemRecord {
                metadata: store.item_metadata(item.id).await?,
                item,
            };

            let mut bitstreams = Vec::new();
            for bitstream in store.item_bitstreams(record.item.id).await? {
                if ctx.gate.authorize_bitstream(&ctx.subjects, &bitstream)?.is_allowed() {
                    bitstreams.push(BitstreamSummary::from(&bitstream));
                }
            }

            HandlePage::Item {
                item: ItemSummary::from(&record),
                bitstreams,
            }
        }
    };

    res.render(Json(page));
    Ok(())
}
