// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-start configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {field}: {detail}")]
    InvalidValue { field: &'static str, detail: String },
}

/// Static configuration for the engine. All fields have defaults; nothing
/// here is mutable after process start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub max_concurrent_jobs: usize,
    pub max_concurrent_inspectors_per_job: usize,
    pub admission_queue_capacity: usize,
    pub target_fps: f64,
    pub max_duration_sec: f64,
    pub max_upload_bytes: u64,
    pub per_job_timeout_sec: u64,
    pub workspace_base_path: PathBuf,
    pub pipeline_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            max_concurrent_inspectors_per_job: 4,
            admission_queue_capacity: 64,
            target_fps: 8.0,
            max_duration_sec: 30.0,
            max_upload_bytes: 100 * 1024 * 1024,
            per_job_timeout_sec: 600,
            workspace_base_path: std::env::temp_dir(),
            pipeline_version: "v1".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads defaults, then an optional TOML file, then `VSCAN_*` environment
    /// overrides, mirroring the daemon's `OJ_STATE_DIR`-style precedence.
    pub fn load(toml_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let mut config = match toml_path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_toml_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_usize("VSCAN_MAX_CONCURRENT_JOBS") {
            self.max_concurrent_jobs = v;
        }
        if let Some(v) = env_usize("VSCAN_MAX_CONCURRENT_INSPECTORS_PER_JOB") {
            self.max_concurrent_inspectors_per_job = v;
        }
        if let Some(v) = env_usize("VSCAN_ADMISSION_QUEUE_CAPACITY") {
            self.admission_queue_capacity = v;
        }
        if let Some(v) = env_u64("VSCAN_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = v;
        }
        if let Some(v) = env_u64("VSCAN_PER_JOB_TIMEOUT_SEC") {
            self.per_job_timeout_sec = v;
        }
        if let Ok(dir) = std::env::var("VSCAN_STATE_DIR") {
            self.workspace_base_path = PathBuf::from(dir);
        }
        if let Ok(v) = std::env::var("VSCAN_PIPELINE_VERSION") {
            self.pipeline_version = v;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_jobs",
                detail: "must be at least 1".into(),
            });
        }
        if self.target_fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "target_fps",
                detail: "must be positive".into(),
            });
        }
        if self.max_duration_sec <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "max_duration_sec",
                detail: "must be positive".into(),
            });
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
