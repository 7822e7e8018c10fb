//! Routes that send bitstream bytes.

mod bitstream;
mod explore;
mod helpers;
mod retrieve;


use salvo::Router;
use vellum_core::constants::{
    BITSTREAM_ROUTE_COMPONENT, EXPLORE_ROUTE_COMPONENT, RETRIEVE_ROUTE_COMPONENT,
};

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(
            Router::with_path(format!("{RETRIEVE_ROUTE_COMPONENT}/{{**rest}}"))
                .get(retrieve::retrieve)
                .head(retrieve::retrieve),
        )
        .push(
            Router::with_path(format!("{BITSTREAM_ROUTE_COMPONENT}/{{**rest}}"))
                .get(bitstream::bitstream)
                .head(bitstream::bitstream),
        )
        .push(Router::with_path(EXPLORE_ROUTE_COMPONENT).get(explore::explore))
}
