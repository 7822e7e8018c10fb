use salvo::Depot;
use tracing::error;

use vellum_service::auth::depot::set_user_in_depot;
use vellum_service::auth::{DepotUser, authenticate::authenticate};
use vellum_service::error::ServiceError;

use crate::config::get_config_from_depot;
use crate::error::AppError;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Middleware handler for authentication.
///
/// Requests without credentials continue as anonymous. Bad credentials end
/// the request with 401.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let context = get_config_from_depot(depot)
            .and_then(|config| get_store_from_depot(depot).map(|store| (config, store)));
        let (config, store) = match context {
            Ok(context) => context,
            Err(e) => {
                error!(error = ?e, "Authentication context missing from depot");
                e.render(req, depot, res);
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(req, store.as_ref(), &config).await {
            Ok(user) => {
                if let DepotUser::User(user) = &user {
                    tracing::debug!(user_email = %user.email, "User authenticated successfully");
                }
                set_user_in_depot(depot, user);
            }
            Err(err) => {
                if !matches!(err, ServiceError::NotAuthenticated) {
                    error!(error = ?err, "Authentication failed with error");
                }
                AppError::from(err).render(req, depot, res);
                ctrl.skip_rest();
            }
        }
    }
}
