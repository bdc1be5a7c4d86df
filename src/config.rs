//! Run configuration: post-processing settings and JSON persistence helpers.

use crate::postprocessing::options::PostProcessingOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while loading or saving configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON document into a configuration struct
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a configuration struct as pretty-printed JSON
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Enumeration of supported concurrency modes for post-processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Stages run one after another on the calling thread
    #[default]
    Sequential,
    /// Independent stages run concurrently using Rayon
    Rayon,
}

/// Configuration for a post-processing dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostProcessingConfig {
    /// Directory receiving every artifact and the manifest
    pub result_directory: PathBuf,
    /// Stages selected for this run
    #[serde(default)]
    pub options: PostProcessingOptions,
    /// How independent stages are scheduled
    #[serde(default)]
    pub concurrency_mode: ConcurrencyMode,
    /// Thread pool size for parallel dispatch.
    /// Only relevant when concurrency_mode is Rayon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_pool_size: Option<usize>,
}

impl PostProcessingConfig {
    /// Sequential dispatch with no stages selected
    pub fn new(result_directory: impl Into<PathBuf>) -> Self {
        Self {
            result_directory: result_directory.into(),
            options: PostProcessingOptions::new(),
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_options(mut self, options: PostProcessingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel dispatch
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocessing::options::PostProcessingOption;

    #[test]
    fn test_default_config() {
        let config = PostProcessingConfig::new("results");
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Sequential);
        assert_eq!(config.thread_pool_size, None);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = PostProcessingConfig::new("results")
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(4);

        assert_eq!(config.concurrency_mode, ConcurrencyMode::Rayon);
        assert_eq!(config.thread_pool_size, Some(4));
    }

    #[test]
    fn test_options_persist_as_integers() {
        let config = PostProcessingConfig::new("results").with_options(
            [PostProcessingOption::ExportToCsv, PostProcessingOption::GeneratePdfReport]
                .into_iter()
                .collect(),
        );
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["options"], serde_json::json!([7, 9]));

        let restored: PostProcessingConfig = serde_json::from_value(json).unwrap();
        assert!(restored.options.is_enabled(PostProcessingOption::GeneratePdfReport));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = std::env::temp_dir().join(format!("hsim-missing-{}.json", uuid::Uuid::new_v4()));
        let err = load_json::<PostProcessingConfig>(&path).unwrap_err();
        assert!(err.to_string().contains("hsim-missing-"));
    }
}
