mod app_specific;
mod browse;
mod content;
mod context;
mod render;
mod search;
mod sitemap;
mod structure;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

/// ## Summary
/// Constructs the router for every public route, behind authentication.
///
/// ## Errors
/// Returns an error if any child route fails to initialize.
pub fn routes() -> anyhow::Result<Router> {
    Ok(Router::new()
        .hoop(AuthMiddleware)
        .push(content::routes())
        .push(sitemap::routes())
        .push(browse::routes())
        .push(structure::routes())
        .push(search::routes())
        .push(app_specific::routes()))
}
