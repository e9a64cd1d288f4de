//! Application configuration: defaults, an optional TOML file and
//! `GAMEPEDIA_*` environment overrides, in that order.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{query::DEFAULT_SUGGESTION_LIMIT, storage::FileStore, views::DEFAULT_RECENT_LIMIT};

const APP_DIR: &str = "gamepedia";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "GAMEPEDIA";

const DEFAULT_CONFIG: &str = r#"# GamePedia configuration.
# Every key is optional; environment variables such as
# GAMEPEDIA_CATALOG_URL override the values below.

# HTTP(S) URL or local path of the JSON game catalog.
# Without one the built-in sample catalog is used.
# catalog_url = "https://example.com/games.json"

# Endpoint returning the player widget payload. Demo data is shown without one.
# widget_url = "http://localhost:3000/api/steam/widget"

widget_refresh_secs = 300
search_debounce_ms = 300
suggestion_min_chars = 3
suggestion_limit = 5
recent_limit = 6

# Reload local catalogs when the file changes.
watch_catalog = true

# state_path = "/path/to/state.json"
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog location: URL or file path.
    pub catalog_url: Option<String>,
    /// Widget payload endpoint.
    pub widget_url: Option<String>,
    /// Seconds between widget refreshes.
    pub widget_refresh_secs: u64,
    /// Quiet period for search-as-you-type.
    pub search_debounce_ms: u64,
    /// Minimum trimmed input length before suggestions show.
    pub suggestion_min_chars: usize,
    /// Maximum number of suggestions.
    pub suggestion_limit: usize,
    /// Length of the recent releases strip.
    pub recent_limit: usize,
    /// File backing the string store.
    pub state_path: Option<PathBuf>,
    /// Watch file catalogs for changes.
    pub watch_catalog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: None,
            widget_url: None,
            widget_refresh_secs: 300,
            search_debounce_ms: 300,
            suggestion_min_chars: 3,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            recent_limit: DEFAULT_RECENT_LIMIT,
            state_path: None,
            watch_catalog: true,
        }
    }
}

impl AppConfig {
    /// Load from the user config file and the environment.
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::build(None),
        }
    }

    /// Load from `path` (which may be missing) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(Some(path))
    }

    fn build(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("failed to read configuration")?;
        settings
            .try_deserialize()
            .context("invalid configuration")
    }

    /// String store file, falling back to the per-user default.
    pub fn resolved_state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(FileStore::default_path)
    }

    /// Debounce delay.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Widget refresh period; never shorter than a second.
    pub fn widget_refresh(&self) -> Duration {
        Duration::from_secs(self.widget_refresh_secs.max(1))
    }
}

/// `<config_dir>/gamepedia`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// `<config_dir>/gamepedia/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Write the default config file if none exists. Failures are logged only.
pub fn ensure_default_config() -> Result<()> {
    let Some(path) = config_file_path() else {
        warn!("No configuration directory on this platform; using defaults");
        return Ok(());
    };
    if let Err(err) = ensure_default_config_at(&path) {
        warn!(path = %path.display(), "Could not write default configuration: {err:#}");
    }
    Ok(())
}

/// Write the default config to `path` unless it exists. Returns whether it wrote.
pub fn ensure_default_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = AppConfig::load_from(&dir.path().join("absent.toml"))?;
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.suggestion_min_chars, 3);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.recent_limit, 6);
        assert!(config.watch_catalog);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "catalog_url = \"games.json\"\nrecent_limit = 3\nstate_path = \"/tmp/state.json\"\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.catalog_url.as_deref(), Some("games.json"));
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(
            config.resolved_state_path(),
            PathBuf::from("/tmp/state.json")
        );
        Ok(())
    }

    #[test]
    fn default_file_is_written_once_and_parses() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        assert!(ensure_default_config_at(&path)?);
        assert!(!ensure_default_config_at(&path)?);

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.widget_refresh(), Duration::from_secs(300));
        assert!(config.catalog_url.is_none());
        Ok(())
    }
}
