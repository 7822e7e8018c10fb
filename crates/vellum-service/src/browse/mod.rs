//! Browse listings over archived items and the "export all" CSV download.

pub mod csv;
pub mod engine;
pub mod export;
pub mod scope;

pub use engine::{BrowseEngine, BrowsePage};
pub use export::{BrowseExportCoordinator, CsvDocument};
pub use scope::{BrowseContainer, BrowseParams, BrowserScope};
