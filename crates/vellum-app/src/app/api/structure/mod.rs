//! Container listings and handle pages.

mod community_list;
mod handle;

use salvo::Router;
use vellum_core::constants::{COMMUNITY_LIST_ROUTE_COMPONENT, HANDLE_ROUTE_COMPONENT};

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(Router::with_path(COMMUNITY_LIST_ROUTE_COMPONENT).get(community_list::community_list))
        .push(Router::with_path(format!("{HANDLE_ROUTE_COMPONENT}/{{**rest}}")).get(handle::handle))
}
