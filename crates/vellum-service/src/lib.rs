//! Domain services for hierarchical content delivery: locating entities,
//! authorizing access, conditional caching, streaming, hierarchy
//! materialisation, browse export and search.

pub mod auth;
pub mod browse;
pub mod delivery;
pub mod error;
pub mod hierarchy;
pub mod locate;
pub mod search;
pub mod viewer;

#[cfg(test)]
mod test_support;
