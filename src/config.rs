use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::EvaluateOptions;

/// Optional `--config` file. Every key may be omitted.
///
/// ```toml
/// [log]
/// filter = "probeq=debug"
/// format = "json"
///
/// [report]
/// preview_chars = 80
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log: LogConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub filter: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub preview_chars: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.report.preview_chars == Some(0) {
            return Err(ConfigError::Invalid(
                "report.preview_chars must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn evaluate_options(&self) -> EvaluateOptions {
        let mut options = EvaluateOptions::default();
        if let Some(preview_chars) = self.report.preview_chars {
            options.preview_chars = preview_chars;
        }
        options
    }
}
