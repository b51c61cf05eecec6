// src/config/pipeline.rs
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

/// Marker meaning "read the credential from the provider's env var".
const ENV_MARKER: &str = "env";

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_TAVILY_API_KEY: &str = "TAVILY_API_KEY";

fn default_outline_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_outline_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_outline_timeout() -> u64 {
    30
}
fn default_env_key() -> Option<String> {
    Some("ENV".to_string())
}
fn default_media_max_results() -> usize {
    3
}
fn default_media_max_queries() -> usize {
    5
}
fn default_query_delay_ms() -> u64 {
    500
}
fn default_call_timeout() -> u64 {
    10
}
fn default_published_within_days() -> i64 {
    1825
}
fn default_duration_bucket() -> String {
    "medium".to_string()
}
fn default_order() -> String {
    "relevance".to_string()
}
fn default_backoff() -> String {
    "fixed".to_string()
}
fn default_backoff_max_ms() -> u64 {
    8_000
}
fn default_reading_max_results() -> usize {
    3
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// "ENV" means: read from OPENAI_API_KEY
    #[serde(default = "default_env_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_outline_model")]
    pub model: String,
    #[serde(default = "default_outline_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_outline_timeout")]
    pub timeout_secs: u64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: default_env_key(),
            model: default_outline_model(),
            endpoint: default_outline_endpoint(),
            timeout_secs: default_outline_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// "ENV" means: read from YOUTUBE_API_KEY
    #[serde(default = "default_env_key")]
    pub api_key: Option<String>,
    /// Upper bound on videos per lesson; `GenerateOptions::media_per_lesson` is capped by it.
    #[serde(default = "default_media_max_results")]
    pub max_results: usize,
    #[serde(default = "default_media_max_queries")]
    pub max_queries: usize,
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
    /// "none" | "fixed" | "exponential"
    #[serde(default = "default_backoff")]
    pub backoff: String,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    #[serde(default = "default_call_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_published_within_days")]
    pub published_within_days: i64,
    /// "any" | "short" | "medium" | "long"
    #[serde(default = "default_duration_bucket")]
    pub duration: String,
    /// "relevance" | "viewCount" | "rating" | "date"
    #[serde(default = "default_order")]
    pub order: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_key: default_env_key(),
            max_results: default_media_max_results(),
            max_queries: default_media_max_queries(),
            query_delay_ms: default_query_delay_ms(),
            backoff: default_backoff(),
            backoff_max_ms: default_backoff_max_ms(),
            timeout_secs: default_call_timeout(),
            published_within_days: default_published_within_days(),
            duration: default_duration_bucket(),
            order: default_order(),
        }
    }
}

impl MediaConfig {
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingConfig {
    /// "ENV" means: read from TAVILY_API_KEY
    #[serde(default = "default_env_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_reading_max_results")]
    pub max_results: usize,
    #[serde(default = "default_call_timeout")]
    pub timeout_secs: u64,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            api_key: default_env_key(),
            max_results: default_reading_max_results(),
            timeout_secs: default_call_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub outline: OutlineConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
}

impl PipelineConfig {
    /// Parse TOML, then resolve credentials and sanitize ranges.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: PipelineConfig = toml::from_str(s)?;
        Ok(cfg.resolved())
    }

    /// Config with every provider disabled (offline/demo mode).
    pub fn offline() -> Self {
        let mut cfg = Self::default();
        cfg.outline.api_key = None;
        cfg.media.api_key = None;
        cfg.reading.api_key = None;
        cfg
    }

    /// Resolve "ENV" markers and clamp out-of-range values.
    pub fn resolved(mut self) -> Self {
        self.outline.api_key = resolve_key(self.outline.api_key.take(), ENV_OPENAI_API_KEY);
        self.media.api_key = resolve_key(self.media.api_key.take(), ENV_YOUTUBE_API_KEY);
        self.reading.api_key = resolve_key(self.reading.api_key.take(), ENV_TAVILY_API_KEY);

        if self.outline.timeout_secs == 0 {
            self.outline.timeout_secs = default_outline_timeout();
        }
        if self.media.timeout_secs == 0 {
            self.media.timeout_secs = default_call_timeout();
        }
        if self.reading.timeout_secs == 0 {
            self.reading.timeout_secs = default_call_timeout();
        }
        self.media.max_results = self.media.max_results.clamp(1, 25);
        self.media.max_queries = self.media.max_queries.clamp(1, 5);
        self.reading.max_results = self.reading.max_results.clamp(1, 10);
        if self.media.published_within_days < 0 {
            self.media.published_within_days = default_published_within_days();
        }
        self.media.backoff = self.media.backoff.to_ascii_lowercase();
        if !matches!(self.media.backoff.as_str(), "none" | "fixed" | "exponential") {
            self.media.backoff = default_backoff();
        }
        self
    }

    /// Non-empty outline credential, if the provider is enabled.
    pub fn outline_key(&self) -> Option<&str> {
        if !self.outline.enabled {
            return None;
        }
        self.outline.api_key.as_deref()
    }
}

/// `None`/empty → `None`; "ENV" → value of `var` (empty counts as missing); otherwise literal.
fn resolve_key(raw: Option<String>, var: &str) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case(ENV_MARKER) {
        return env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_ranges_and_backoff() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
            [media]
            api_key = "literal-key"
            max_results = 0
            max_queries = 42
            timeout_secs = 0
            backoff = "Weird"

            [reading]
            api_key = ""
            "#,
        )
        .unwrap();
        assert_eq!(cfg.media.api_key.as_deref(), Some("literal-key"));
        assert_eq!(cfg.media.max_results, 1);
        assert_eq!(cfg.media.max_queries, 5);
        assert_eq!(cfg.media.timeout_secs, 10);
        assert_eq!(cfg.media.backoff, "fixed");
        assert!(cfg.reading.api_key.is_none());
    }

    #[test]
    fn offline_has_no_credentials() {
        let cfg = PipelineConfig::offline();
        assert!(cfg.outline_key().is_none());
        assert!(cfg.media.api_key.is_none());
        assert!(cfg.reading.api_key.is_none());
    }

    #[test]
    fn disabled_outline_hides_key() {
        let mut cfg = PipelineConfig::offline();
        cfg.outline.api_key = Some("k".into());
        cfg.outline.enabled = false;
        assert!(cfg.outline_key().is_none());
    }
}
