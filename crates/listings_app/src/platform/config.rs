//! Console configuration, read from a RON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use listings_core::{LoadMoreState, DEFAULT_PAGE_SIZE};
use listings_engine::BackendSettings;
use listings_logging::listings_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub backend: BackendConfig,
    /// Fixed for the lifetime of every cached listing.
    pub page_size: u32,
    /// Company selected on startup.
    pub company: Option<String>,
    pub labels: LoadMoreLabels,
    pub log: LogConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            company: None,
            labels: LoadMoreLabels::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let settings = BackendSettings::default();
        Self {
            base_url: settings.base_url,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            max_bytes: settings.max_bytes,
        }
    }
}

impl BackendConfig {
    pub fn to_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
        }
    }
}

/// Wording of the "load more" line for each state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadMoreLabels {
    pub loading: String,
    pub load_more: String,
    pub exhausted: String,
}

impl Default for LoadMoreLabels {
    fn default() -> Self {
        Self {
            loading: "Loading more jobs ...".to_string(),
            load_more: "Load more jobs".to_string(),
            exhausted: "No more jobs to load".to_string(),
        }
    }
}

impl LoadMoreLabels {
    pub fn label(&self, state: LoadMoreState) -> &str {
        match state {
            LoadMoreState::CanLoadMore => &self.load_more,
            LoadMoreState::Loading => &self.loading,
            LoadMoreState::Exhausted => &self.exhausted,
        }
    }
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum LogDestination {
    /// Write to the configured log file.
    File,
    /// Write to stderr.
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub destination: LogDestination,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: "info".to_string(),
            file: PathBuf::from("./listings.log"),
        }
    }
}

/// Loads the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> anyhow::Result<ConsoleConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ConsoleConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };

    let config: ConsoleConfig = ron::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    listings_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("console.ron");
        fs::write(
            &path,
            r#"(
                backend: (base_url: "https://jobs.example.com/api"),
                page_size: 25,
                labels: (exhausted: "Nu mai sunt joburi de incarcat"),
                log: (destination: Both),
            )"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.backend.base_url, "https://jobs.example.com/api");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.labels.exhausted, "Nu mai sunt joburi de incarcat");
        assert_eq!(config.labels.load_more, "Load more jobs");
        assert_eq!(config.log.destination, LogDestination::Both);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.ron");
        fs::write(&path, "(page_size: \"many\")").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
    }

    #[test]
    fn labels_follow_load_more_state() {
        let labels = LoadMoreLabels::default();
        assert_eq!(labels.label(LoadMoreState::Loading), "Loading more jobs ...");
        assert_eq!(labels.label(LoadMoreState::Exhausted), "No more jobs to load");
    }
}
