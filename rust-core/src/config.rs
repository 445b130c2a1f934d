use crate::badge::LOCAL_BADGE_IMAGE;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Storage partition; badges written under one origin are invisible to another.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Length of the mock scan animation.
    #[serde(default = "default_scan_delay_ms")]
    pub scan_delay_ms: u64,
    #[serde(default = "default_image")]
    pub default_image: String,
    /// When set, a scan only completes after the organiser's phrase is entered.
    #[serde(default)]
    pub organiser_phrase: Option<String>,
    #[serde(default)]
    pub allow_free_text_events: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_origin() -> String {
    "localhost".to_string()
}

fn default_scan_delay_ms() -> u64 {
    2_000
}

fn default_image() -> String {
    LOCAL_BADGE_IMAGE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            origin: default_origin(),
            scan_delay_ms: default_scan_delay_ms(),
            default_image: default_image(),
            organiser_phrase: None,
            allow_free_text_events: false,
        }
    }
}

/// Longest mock scan we are willing to sit through.
const MAX_SCAN_DELAY_MS: u64 = 60_000;

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: AppConfig = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin.trim().is_empty() {
            return Err(ConfigError::Invalid("origin must not be empty".into()));
        }
        if self.scan_delay_ms > MAX_SCAN_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "scan_delay_ms {} exceeds {}",
                self.scan_delay_ms, MAX_SCAN_DELAY_MS
            )));
        }
        if let Some(phrase) = &self.organiser_phrase {
            if phrase.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "organiser_phrase must not be blank when set".into(),
                ));
            }
        }
        Ok(())
    }
}
