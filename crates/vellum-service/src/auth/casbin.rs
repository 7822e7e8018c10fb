use std::sync::Arc;

use casbin::{CoreApi, MgmtApi};
use salvo::async_trait;

use crate::error::{ServiceError, ServiceResult};
use vellum_db::db::connection::DbPool;

const MODEL: &str = include_str!("casbin_model.conf");

/// Policies seeded by the initial migration, in Casbin CSV form.
pub const DEFAULT_POLICIES: &str = "\
p, all, /communities/**, reader
p, all, /collections/**, reader
p, all, /items/**, reader
p, all, /bitstreams/**, reader
p, principal:00000000-0000-0000-0000-000000000001, /**, administrator
g2, reader, read
g2, administrator, read
g2, administrator, admin
";

/// ## Summary
/// Builds an enforcer over the delivery model with policies from `adapter`.
///
/// ## Errors
/// Returns an error if the model cannot be parsed or the policies cannot be loaded.
pub async fn enforcer_with_adapter(
    adapter: impl casbin::Adapter + 'static,
) -> ServiceResult<casbin::Enforcer> {
    let model = casbin::DefaultModel::from_str(MODEL).await?;
    tracing::debug!("Casbin model loaded");

    let enforcer = casbin::Enforcer::new(model, adapter).await?;

    let policy_count = enforcer.get_policy().len();
    let grouping_count = enforcer.get_named_grouping_policy("g2").len();
    tracing::info!(
        policy_count = policy_count,
        grouping_count = grouping_count,
        "Casbin enforcer initialized successfully"
    );
    Ok(enforcer)
}

/// ## Summary
/// Initialize a Casbin enforcer with a Diesel adapter using the provided connection pool.
///
/// ## Errors
/// Returns an error if the adapter or enforcer cannot be created.
#[tracing::instrument(skip(pool))]
pub async fn init_casbin(pool: DbPool) -> ServiceResult<casbin::Enforcer> {
    tracing::debug!("Initializing Casbin enforcer");

    let adapter = diesel_async_adapter::DieselAdapter::with_pool(pool).await?;
    tracing::debug!("Casbin adapter created");

    enforcer_with_adapter(adapter).await
}

pub struct CasbinEnforcerHandler {
    pub enforcer: Arc<casbin::Enforcer>,
}

#[async_trait]
impl salvo::Handler for CasbinEnforcerHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.enforcer.clone());
    }
}

/// ## Summary
/// Retrieves the Casbin enforcer from the depot.
///
/// ## Errors
/// Returns an error if the Casbin enforcer is not found in the depot.
pub fn get_enforcer_from_depot(depot: &salvo::Depot) -> ServiceResult<Arc<casbin::Enforcer>> {
    depot
        .obtain::<Arc<casbin::Enforcer>>()
        .cloned()
        .map_err(|_err| ServiceError::InvariantViolation("Casbin enforcer not found in depot"))
}
