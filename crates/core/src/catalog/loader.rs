use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::sample::sample_games;
use crate::models::GameRecord;

/// Where the catalog JSON document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// HTTP(S) endpoint returning the JSON array.
    Remote(String),
    /// Local JSON file.
    File(PathBuf),
    /// Only the built-in sample records.
    Builtin,
}

impl CatalogSource {
    /// Interpret a configured location: URLs are remote, anything else is a path.
    pub fn from_location(location: Option<&str>) -> Self {
        match location.map(str::trim).filter(|value| !value.is_empty()) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                CatalogSource::Remote(url.to_string())
            }
            Some(path) => CatalogSource::File(PathBuf::from(path)),
            None => CatalogSource::Builtin,
        }
    }
}

/// Which source produced the records of a [`LoadOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Fetched from the remote endpoint.
    Remote,
    /// Read from the local file.
    File,
    /// Built-in samples because the configured source failed.
    Fallback,
    /// Built-in samples because no source is configured.
    Builtin,
}

impl CatalogOrigin {
    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            CatalogOrigin::Remote => "remote catalog",
            CatalogOrigin::File => "catalog file",
            CatalogOrigin::Fallback => "sample data (fallback)",
            CatalogOrigin::Builtin => "sample data",
        }
    }
}

/// Result of a load; never empty-handed thanks to the sample fallback.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Loaded records, in document order.
    pub records: Vec<GameRecord>,
    /// Source that produced them.
    pub origin: CatalogOrigin,
}

/// Failures while fetching or decoding the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("catalog endpoint returned {0}")]
    Status(StatusCode),
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not a JSON array of records.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Events emitted by the background catalog loader.
#[derive(Debug)]
pub enum CatalogEvent {
    /// A load finished (possibly with fallback data).
    Loaded(LoadOutcome),
    /// The watched catalog file changed on disk.
    SourceChanged(PathBuf),
}

/// Loads the catalog from its configured source.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Build a loader for `source`.
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Configured source.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Fetch and decode the catalog without any fallback.
    pub async fn fetch(&self) -> Result<Vec<GameRecord>, CatalogError> {
        match &self.source {
            CatalogSource::Remote(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status));
                }
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            CatalogSource::File(path) => {
                let body = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Ok(serde_json::from_str(&body)?)
            }
            CatalogSource::Builtin => Ok(sample_games()),
        }
    }

    /// Load the catalog, substituting the built-in samples on any failure.
    pub async fn load(&self) -> LoadOutcome {
        match self.fetch().await {
            Ok(records) => {
                let origin = match self.source {
                    CatalogSource::Remote(_) => CatalogOrigin::Remote,
                    CatalogSource::File(_) => CatalogOrigin::File,
                    CatalogSource::Builtin => CatalogOrigin::Builtin,
                };
                info!(total = records.len(), origin = origin.label(), "Catalog loaded");
                LoadOutcome { records, origin }
            }
            Err(err) => {
                warn!(%err, source = ?self.source, "Catalog load failed; using sample data");
                LoadOutcome {
                    records: sample_games(),
                    origin: CatalogOrigin::Fallback,
                }
            }
        }
    }

    /// Load once and report the outcome on `sender`.
    pub async fn run(self, sender: mpsc::Sender<CatalogEvent>) -> Result<()> {
        let outcome = self.load().await;
        sender
            .send(CatalogEvent::Loaded(outcome))
            .await
            .context("failed to send catalog event")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn interprets_configured_locations() {
        assert_eq!(
            CatalogSource::from_location(Some("https://example.com/games.json")),
            CatalogSource::Remote("https://example.com/games.json".to_string())
        );
        assert_eq!(
            CatalogSource::from_location(Some("data/games.json")),
            CatalogSource::File(PathBuf::from("data/games.json"))
        );
        assert_eq!(CatalogSource::from_location(Some("  ")), CatalogSource::Builtin);
        assert_eq!(CatalogSource::from_location(None), CatalogSource::Builtin);
    }

    #[tokio::test]
    async fn loads_catalog_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("games.json");
        fs::write(
            &path,
            r#"[{"id": 1, "title": "Minecraft", "developer": "Mojang Studios",
                "releaseDate": "2011-11-18", "platforms": ["PC"], "genre": "simulation"}]"#,
        )?;

        let outcome = CatalogLoader::new(CatalogSource::File(path)).load().await;
        assert_eq!(outcome.origin, CatalogOrigin::File);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].title, "Minecraft");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_falls_back_to_samples() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("games.json");
        fs::write(&path, "{ broken")?;

        let loader = CatalogLoader::new(CatalogSource::File(path));
        assert!(matches!(loader.fetch().await, Err(CatalogError::Parse(_))));

        let outcome = loader.load().await;
        assert_eq!(outcome.origin, CatalogOrigin::Fallback);
        assert_eq!(outcome.records.len(), 10);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_falls_back_and_reports_over_channel() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let loader = CatalogLoader::new(CatalogSource::File(dir.path().join("absent.json")));
        let (tx, mut rx) = mpsc::channel(1);

        loader.run(tx).await?;

        match rx.recv().await {
            Some(CatalogEvent::Loaded(outcome)) => {
                assert_eq!(outcome.origin, CatalogOrigin::Fallback);
                assert_eq!(outcome.records.len(), 10);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }
}
