//! Application Configuration
//! Defaults for the explorer, optionally overridden by `paper_explorer.toml`.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "paper_explorer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Word cloud canvas and sizing parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub width: f32,
    pub height: f32,
    pub max_words: usize,
    pub max_font_size: f32,
    pub min_font_size: f32,
    /// 0.0 ranks words only by order, 1.0 scales font linearly with frequency.
    pub relative_scaling: f32,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            max_words: 200,
            max_font_size: 120.0,
            min_font_size: 4.0,
            relative_scaling: 0.5,
        }
    }
}

/// Explorer settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub export_file_name: String,
    pub report_file_name: String,
    pub top_journals: usize,
    pub sample_rows: usize,
    pub word_cloud: WordCloudConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("metadata.csv"),
            export_file_name: "filtered_covid_papers.csv".to_string(),
            report_file_name: "paper_explorer_report.png".to_string(),
            top_journals: 10,
            sample_rows: 10,
            word_cloud: WordCloudConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
