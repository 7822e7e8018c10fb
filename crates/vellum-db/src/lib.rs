//! Persistence for the Vellum delivery tier: diesel schema, row models, the
//! repository store port and the asset store holding bitstream bytes.

pub mod assetstore;
pub mod db;
pub mod error;
pub mod model;
pub mod store;
