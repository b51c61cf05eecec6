// src/config/mod.rs
//! Pipeline configuration: TOML file + env-resolved credentials.

pub mod pipeline;

pub use pipeline::{MediaConfig, OutlineConfig, PipelineConfig, ReadingConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENV_CONFIG_PATH: &str = "COURSE_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.toml";

/// Load config from an explicit path.
pub fn load_from(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading pipeline config from {}", path.display()))?;
    PipelineConfig::from_toml_str(&content)
        .with_context(|| format!("parsing pipeline config {}", path.display()))
}

/// Load config using env var + fallbacks:
/// 1) $COURSE_CONFIG_PATH
/// 2) config/pipeline.toml
/// 3) built-in defaults (credentials still resolved from env)
///
/// Never fails: unreadable files are logged and replaced by defaults.
pub fn load_default() -> PipelineConfig {
    let candidate = std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let cfg = if candidate.exists() {
        match load_from(&candidate) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = ?e, path = %candidate.display(), "pipeline config unusable, using defaults");
                PipelineConfig::default().resolved()
            }
        }
    } else {
        PipelineConfig::default().resolved()
    };

    // Safe diagnostics: only key lengths.
    info!(
        outline_key_len = cfg.outline_key().map(str::len).unwrap_or(0),
        media_key_len = cfg.media.api_key.as_deref().map(str::len).unwrap_or(0),
        reading_key_len = cfg.reading.api_key.as_deref().map(str::len).unwrap_or(0),
        "pipeline config loaded"
    );
    cfg
}
