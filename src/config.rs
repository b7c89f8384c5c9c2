//! TOML configuration: the builder list and fetch options.
//!
//! ```toml
//! [fetch]
//! timeout_secs = 10
//! connect_timeout_secs = 3
//! jsonp_callback = "ADD_RESULTS"
//!
//! [[builders]]
//! name = "Mac10"
//! url = "https://results.example.org/Mac10/results.json"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::model::Builder;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchOptions,
    #[serde(default)]
    pub builders: Vec<Builder>,
}

/// Options for [`HttpHistorySource`](crate::source::HttpHistorySource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Name of the JSONP callback wrapping results files, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonp_callback: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    3
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            jsonp_callback: None,
        }
    }
}

impl FetchOptions {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let text = std::fs::read_to_string(path).map_err(|e| DashboardError::Config {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Parse `text`; `origin` names the source in error messages.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, DashboardError> {
        toml::from_str(text).map_err(|e| DashboardError::Config {
            path: origin.to_string(),
            detail: e.to_string(),
        })
    }

    /// Add `builder`, replacing any configured builder with the same name.
    pub fn add_builder(&mut self, builder: Builder) {
        match self.builders.iter_mut().find(|b| **b == builder) {
            Some(existing) => *existing = builder,
            None => self.builders.push(builder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("", "inline").unwrap();
        assert_eq!(config.fetch, FetchOptions::default());
        assert!(config.builders.is_empty());
        assert_eq!(config.fetch.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.fetch.connect_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn parses_builders_and_fetch_options() {
        let text = r#"
            [fetch]
            timeout_secs = 30
            jsonp_callback = "ADD_RESULTS"

            [[builders]]
            name = "Mac10"
            url = "http://results.test/Mac10.json"

            [[builders]]
            name = "Win7"
        "#;
        let config = Config::from_toml_str(text, "inline").unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.connect_timeout_secs, 3);
        assert_eq!(config.fetch.jsonp_callback.as_deref(), Some("ADD_RESULTS"));
        assert_eq!(config.builders.len(), 2);
        assert_eq!(
            config.builders[0].url.as_deref(),
            Some("http://results.test/Mac10.json")
        );
        assert!(config.builders[1].url.is_none());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[[builders]]\nname = 7", "bad.toml").unwrap_err();
        match err {
            DashboardError::Config { path, .. } => assert_eq!(path, "bad.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[builders]]\nname = \"Mac10\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.builders, vec![Builder::new("Mac10")]);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DashboardError::Config { .. }));
    }

    #[test]
    fn add_builder_replaces_same_name() {
        let mut config = Config::default();
        config.add_builder(Builder::new("Mac10"));
        config.add_builder(Builder::with_url("Mac10", "http://new.test"));
        config.add_builder(Builder::new("Win7"));
        assert_eq!(config.builders.len(), 2);
        assert_eq!(config.builders[0].url.as_deref(), Some("http://new.test"));
    }
}
