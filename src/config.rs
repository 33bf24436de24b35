//! Quiz settings loaded from an optional TOML file.
//!
//! ```toml
//! questions_path = "questions.csv"
//! time_limit_seconds = 20
//! question_count = 10
//! pause_between_questions_ms = 1500
//! plain_input = false
//! ```
//!
//! Every key is optional. Command-line flags override whatever is loaded here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::session::DEFAULT_TIME_LIMIT_SECS;

pub const CONFIG_PATH_ENV: &str = "QUIZ_CONFIG_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}'")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
    pub questions_path: PathBuf,
    pub time_limit_seconds: u32,
    /// Skip the count prompt and ask this many questions.
    pub question_count: Option<usize>,
    pub pause_between_questions_ms: u64,
    /// Read whole lines from stdin instead of raw key presses.
    pub plain_input: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from("questions.csv"),
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECS,
            question_count: None,
            pause_between_questions_ms: 1000,
            plain_input: false,
        }
    }
}

impl QuizConfig {
    /// Load from `path`, or from `QUIZ_CONFIG_PATH` when no path is given.
    /// With neither, the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(path) => PathBuf::from(path),
                None => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Loaded quiz config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_between_questions_ms)
    }
}
