//! Per-request collaborators assembled from the depot.

use std::sync::Arc;

use vellum_core::config::Settings;
use vellum_db::store::RepositoryStore;
use vellum_service::auth::{
    AuthorizationGate, ExpandedSubjects, authorizer_from_depot, get_subjects_from_depot,
};

use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

pub(crate) struct RequestContext {
    pub config: Arc<Settings>,
    pub store: Arc<dyn RepositoryStore>,
    pub subjects: ExpandedSubjects,
    pub gate: AuthorizationGate,
}

impl RequestContext {
    /// ## Errors
    /// Returns an invariant violation if a hoop did not run.
    pub fn from_depot(depot: &salvo::Depot) -> AppResult<Self> {
        let config = get_config_from_depot(depot)?;
        let store = get_store_from_depot(depot)?;
        let gate = AuthorizationGate::new(
            authorizer_from_depot(depot)?,
            config.delivery.show_license_bitstreams,
        );

        Ok(Self {
            config,
            store,
            subjects: get_subjects_from_depot(depot),
            gate,
        })
    }
}
