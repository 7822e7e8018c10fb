use std::sync::Arc;

use salvo::async_trait;
use vellum_core::error::CoreError;
use vellum_db::assetstore::AssetStore;
use vellum_db::store::RepositoryStore;

use crate::error::AppResult;

/// Injects the repository store and the asset store holding bitstream bytes.
pub struct StoreHandler {
    pub store: Arc<dyn RepositoryStore>,
    pub assets: Arc<dyn AssetStore>,
}

#[async_trait]
impl salvo::Handler for StoreHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.store.clone());
        depot.inject(self.assets.clone());
    }
}

/// ## Summary
/// Retrieves the repository store from the depot.
///
/// ## Errors
/// Returns an error if the store is not found in the depot.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn RepositoryStore>> {
    depot
        .obtain::<Arc<dyn RepositoryStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Repository store not found in depot").into())
}

/// ## Errors
/// Returns an error if the asset store is not found in the depot.
pub fn get_assets_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn AssetStore>> {
    depot
        .obtain::<Arc<dyn AssetStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Asset store not found in depot").into())
}
