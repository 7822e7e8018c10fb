use salvo::prelude::Json;
use salvo::{Depot, Router, handler};
use serde_json::json;

use vellum_service::auth::DepotUser;
use vellum_service::auth::depot::depot_keys;

/// ## Summary
/// Returns the current actor as JSON, as resolved by the `AuthMiddleware`.
#[handler]
async fn whoami(depot: &Depot) -> Json<serde_json::Value> {
    match depot.get::<DepotUser>(depot_keys::AUTHENTICATED_PRINCIPAL) {
        Ok(DepotUser::User(user)) => Json(serde_json::to_value(user).unwrap_or(json!(null))),
        Ok(DepotUser::Public) => Json(json!({ "status": "anonymous" })),
        Err(_) => Json(json!({ "error": "User not found in depot" })),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("whoami").get(whoami)
}
