//! Catalog loading and the in-memory record store.

/// Remote/file loading with sample fallback.
pub mod loader;
mod sample;
/// The shared record store.
pub mod store;
/// File watching for local catalogs.
pub mod watch;

pub use loader::{
    CatalogError, CatalogEvent, CatalogLoader, CatalogOrigin, CatalogSource, LoadOutcome,
};
pub use sample::sample_games;
pub use store::RecordStore;
pub use watch::watch_catalog;
