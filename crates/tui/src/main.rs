mod app;

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    sync::Arc,
};

use gamepedia_core::{
    catalog::{watch_catalog, CatalogLoader, CatalogSource},
    config::{self, AppConfig},
    AppState, FileStore, Location, RecordStore, SearchSettings, WidgetClient,
};
use tokio::sync::mpsc;
use tracing::{error, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let source = CatalogSource::from_location(config.catalog_url.as_deref());
    let loader = CatalogLoader::new(source.clone());
    let widget = WidgetClient::new(config.widget_url.as_deref());

    let (catalog_tx, catalog_rx) = mpsc::channel(8);
    let (widget_tx, widget_rx) = mpsc::channel(8);

    {
        let loader = loader.clone();
        let sender = catalog_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = loader.run(sender).await {
                error!("Catalog load task error: {err}");
            }
        });
    }

    // Dropping the watcher stops it, so it lives as long as `main`.
    let _watcher = match &source {
        CatalogSource::File(path) if config.watch_catalog => {
            match watch_catalog(path, catalog_tx.clone()) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    warn!("Catalog watching disabled: {err:#}");
                    None
                }
            }
        }
        _ => None,
    };

    {
        let widget = widget.clone();
        let sender = widget_tx.clone();
        let period = config.widget_refresh();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(err) = widget.run(sender.clone()).await {
                    error!("Widget refresh task error: {err}");
                    break;
                }
            }
        });
    }

    let start = start_fragment(std::env::args());
    let strings = Arc::new(FileStore::new(config.resolved_state_path()));
    let state = AppState::new(
        RecordStore::new(),
        strings,
        Location::new(&start),
        SearchSettings::from(&config),
    );

    let mut app = app::GamepediaApp::new(state, loader, widget);
    app.attach_catalog(catalog_tx, catalog_rx);
    app.attach_widget(widget_tx, widget_rx);
    app.run().await
}

/// Optional starting fragment from the first argument, e.g. `gamepedia '#game/minecraft'`.
fn start_fragment(args: impl IntoIterator<Item = String>) -> String {
    args.into_iter().nth(1).unwrap_or_default()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamepedia.log");

    let env_filter = EnvFilter::from_default_env();

    // The terminal belongs to the UI; log to the file only.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepedia_core::{catalog::sample_games, PageState};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn first_argument_is_the_starting_fragment() {
        assert_eq!(start_fragment(args(&["gamepedia"])), "");
        assert_eq!(
            start_fragment(args(&["gamepedia", "#game/minecraft"])),
            "#game/minecraft"
        );
    }

    #[test]
    fn deep_link_opens_once_the_catalog_arrives() {
        let start = start_fragment(args(&["gamepedia", "#game/minecraft"]));
        let mut state = AppState::new(
            RecordStore::new(),
            Arc::new(gamepedia_core::MemoryStore::new()),
            Location::new(&start),
            SearchSettings::default(),
        );
        state.sync_location();
        assert_eq!(state.page_state(), PageState::Home);

        state.replace_catalog(sample_games());
        assert_eq!(state.page_state(), PageState::GameDetail(3));
        assert_eq!(state.recently_viewed().len(), 1);
    }
}
