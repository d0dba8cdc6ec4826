//! Host configuration, read from a RON file and overridden from the command line.
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use listsync_core::ListConfig;
use listsync_engine::FetchSettings;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::{LogDestination, DEFAULT_LOG_FILE};

pub const DEFAULT_CONFIG_FILE: &str = "listsync.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_ms: defaults.connect_timeout.as_millis() as u64,
            request_timeout_ms: defaults.request_timeout.as_millis() as u64,
            max_bytes: defaults.max_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub list: ListConfig,
    pub fetch: FetchConfig,
    pub log: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: FetchSettings::default().base_url,
            list: ListConfig {
                base_endpoint: "/api/samples/".to_string(),
                ..ListConfig::default()
            },
            fetch: FetchConfig::default(),
            log: LogDestination::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: "info".to_string(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub endpoint: Option<String>,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub process: Option<String>,
    pub log: Option<LogDestination>,
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_millis(self.fetch.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.fetch.request_timeout_ms),
            max_bytes: self.fetch.max_bytes,
        }
    }

    pub fn level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.backend_url {
            self.backend_url = url;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.list.base_endpoint = endpoint;
        }
        if let Some(ordering) = overrides.ordering {
            self.list.ordering_key = Some(ordering);
        }
        if let Some(search) = overrides.search {
            self.list.search_term = Some(search);
        }
        if let Some(process) = overrides.process {
            self.list.process_id = Some(process);
        }
        if let Some(log) = overrides.log {
            self.log = log;
        }
    }
}

pub fn parse_config(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    ron::from_str(content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Loads the config. A missing file is only an error when the path was given explicitly.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(content) => parse_config(&path, &content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listsync_core::PageStrategy;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn parses_partial_config_with_defaults() {
        let content = r#"(
            backend_url: "http://backend:8000",
            list: (
                base_endpoint: "/api/objects/",
                ordering_key: Some("-serial"),
                page_strategy: threshold,
                buffer_px: 900,
            ),
            log: both,
        )"#;
        let config = parse_config(Path::new("test.ron"), content).unwrap();

        assert_eq!(config.backend_url, "http://backend:8000");
        assert_eq!(config.list.base_endpoint, "/api/objects/");
        assert_eq!(config.list.ordering_key.as_deref(), Some("-serial"));
        assert_eq!(config.list.page_strategy, PageStrategy::Threshold);
        assert_eq!(config.list.buffer_px, 900);
        assert_eq!(config.list.debounce_ms, 250);
        assert_eq!(config.log, LogDestination::Both);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = parse_config(Path::new("bad.ron"), "(backend_url: 3)").unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, PathBuf::from("bad.ron")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.ron");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn loads_file_and_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(backend_url: "http://a", list: (base_endpoint: "/api/samples/"), log_level: "debug")"#
        )
        .unwrap();

        let mut config = load_config(Some(file.path())).unwrap();
        config.apply(Overrides {
            backend_url: Some("http://b".to_string()),
            search: Some("gold".to_string()),
            log: Some(LogDestination::Terminal),
            ..Overrides::default()
        });

        assert_eq!(config.backend_url, "http://b");
        assert_eq!(config.list.search_term.as_deref(), Some("gold"));
        assert_eq!(config.log, LogDestination::Terminal);
        assert_eq!(config.level().unwrap(), LevelFilter::Debug);
        assert_eq!(config.fetch_settings().base_url, "http://b");
    }

    #[test]
    fn example_config_parses() {
        let content = include_str!("../../../listsync.example.ron");
        let config = parse_config(Path::new("listsync.example.ron"), content).unwrap();
        assert_eq!(config.list.ordering_key.as_deref(), Some("-created_at"));
        assert_eq!(config.list.page_strategy, PageStrategy::Visibility);
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.level(), Err(ConfigError::LogLevel(_))));
    }
}
