#![warn(clippy::all, missing_docs)]

//! Core logic for the GamePedia catalog browser.
//!
//! This crate hosts the record store and catalog loading, the query
//! engine, fragment routing, the recently viewed history and its string
//! store, the derived home page views, and the decorative player widget.
//! Everything here is presentation-free; front ends consume the
//! [`RenderInstruction`] values emitted by [`AppState`].

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod models;
pub mod query;
pub mod recent;
pub mod router;
pub mod slug;
pub mod state;
pub mod storage;
pub mod views;
pub mod widget;

pub use catalog::{CatalogEvent, CatalogLoader, CatalogSource, RecordStore};
pub use config::AppConfig;
pub use models::GameRecord;
pub use query::{Collection, Filters};
pub use recent::RecentlyViewed;
pub use router::{Location, PageState, Route, Router};
pub use state::{AppState, HomeView, Notification, RenderInstruction, SearchSettings};
pub use storage::{FileStore, MemoryStore, StorageError, StringStore};
pub use widget::{WidgetClient, WidgetEvent, WidgetView};
