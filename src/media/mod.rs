// src/media/mod.rs
//! Media enrichment engine.
//!
//! For one subtopic: issue differently worded queries one at a time through the
//! run's `CallQueue`, stop once enough unique items are collected, then dedupe by
//! id (first occurrence wins), rank by engagement (stable, descending) and truncate.
//! Per-query failures are logged and skipped; they never abort the subtopic.

pub mod throttle;
pub mod youtube;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::classify::Category;
use crate::config::MediaConfig;
use crate::error::{Outcome, ProviderError};
use crate::model::{MediaResource, SubtopicSpec};

pub use throttle::{CallQueue, DelayPolicy};
pub use youtube::YouTubeProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationBucket {
    Any,
    Short,
    #[default]
    Medium,
    Long,
}

impl DurationBucket {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => DurationBucket::Short,
            "long" => DurationBucket::Long,
            "any" => DurationBucket::Any,
            _ => DurationBucket::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationBucket::Any => "any",
            DurationBucket::Short => "short",
            DurationBucket::Medium => "medium",
            DurationBucket::Long => "long",
        }
    }
}

/// One search request with provider-side constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    pub text: String,
    pub max_results: usize,
    pub order: String,
    pub duration: DurationBucket,
    pub published_after: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait MediaSearch: Send + Sync {
    /// Candidate items for one query; details (duration, stats) already filled in.
    async fn search(&self, query: &MediaQuery) -> Result<Vec<MediaResource>, ProviderError>;
    fn name(&self) -> &'static str;
}

/// Ordered query variants for a subtopic. The topic prefix is dropped when the
/// subtopic title already mentions it.
pub fn query_variants(topic: &str, subtopic_title: &str, vocabulary: Option<&str>) -> Vec<String> {
    let topic = topic.trim();
    let sub = subtopic_title.trim();
    let base = if sub.to_lowercase().contains(&topic.to_lowercase()) {
        sub.to_string()
    } else {
        format!("{topic} {sub}")
    };

    let mut out = vec![
        format!("{base} tutorial"),
        format!("{base} explained"),
        format!("{base} course"),
        format!("learn {base}"),
        format!("{base} basics"),
    ];
    if let Some(v) = vocabulary {
        if !base.to_lowercase().contains(v) {
            out[2] = format!("{base} {v} course");
        }
    }
    out
}

/// Dedupe by id (first wins), stable sort by engagement desc, truncate.
pub fn rank_media(items: Vec<MediaResource>, max_results: usize) -> Vec<MediaResource> {
    let mut seen = HashSet::new();
    let mut unique: Vec<MediaResource> = items
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect();
    unique.sort_by(|a, b| b.engagement_score().cmp(&a.engagement_score()));
    unique.truncate(max_results);
    unique
}

/// Placeholder resource used when no media provider is configured.
/// The id is derived from topic + subtopic so stubs stay unique across lessons.
pub fn stub_media(topic: &str, subtopic: &SubtopicSpec) -> Vec<MediaResource> {
    let mut hasher = Sha256::new();
    hasher.update(topic.trim().to_lowercase().as_bytes());
    hasher.update([0u8]);
    hasher.update(subtopic.title.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();
    let mut id = String::from("stub-");
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut id, "{:02x}", b);
    }

    let search = url::form_urlencoded::byte_serialize(format!("{topic} {}", subtopic.title).as_bytes())
        .collect::<String>();
    vec![MediaResource {
        title: format!("{}: video overview", subtopic.title),
        description: format!(
            "A video walkthrough of {} will appear here once a media provider is configured.",
            subtopic.title
        ),
        duration_seconds: 600,
        thumbnail_url: String::new(),
        source_channel: "Placeholder".to_string(),
        view_count: 0,
        like_count: None,
        embed_url: String::new(),
        watch_url: format!("https://www.youtube.com/results?search_query={search}"),
        id,
    }]
}

/// Per-run media enrichment state.
pub struct MediaEnricher {
    provider: Option<Arc<dyn MediaSearch>>,
    queue: Arc<CallQueue>,
    vocabulary: Option<&'static str>,
    max_queries: usize,
    order: String,
    duration: DurationBucket,
    published_after: Option<DateTime<Utc>>,
    call_timeout: Duration,
}

impl MediaEnricher {
    pub fn new(provider: Option<Arc<dyn MediaSearch>>, cfg: &MediaConfig) -> Self {
        let published_after = (cfg.published_within_days > 0)
            .then(|| Utc::now() - chrono::Duration::days(cfg.published_within_days));
        Self {
            provider,
            queue: Arc::new(CallQueue::new(DelayPolicy::from_config(cfg))),
            vocabulary: None,
            max_queries: cfg.max_queries.max(1),
            order: cfg.order.clone(),
            duration: DurationBucket::parse(&cfg.duration),
            published_after,
            call_timeout: cfg.call_timeout(),
        }
    }

    pub fn with_vocabulary(mut self, category: Category) -> Self {
        self.vocabulary = category.search_vocabulary();
        self
    }

    pub fn with_queue(mut self, queue: Arc<CallQueue>) -> Self {
        self.queue = queue;
        self
    }

    pub fn queue(&self) -> &CallQueue {
        &self.queue
    }

    pub async fn enrich_subtopic_media(
        &self,
        topic: &str,
        subtopic: &SubtopicSpec,
        max_results: usize,
    ) -> Outcome<Vec<MediaResource>> {
        let Some(provider) = &self.provider else {
            return Outcome::Degraded(
                stub_media(topic, subtopic)
                    .into_iter()
                    .take(max_results)
                    .collect(),
                ProviderError::NotConfigured,
            );
        };
        if max_results == 0 {
            return Outcome::Ok(Vec::new());
        }

        let mut accumulated: Vec<MediaResource> = Vec::new();
        let mut unique_ids: HashSet<String> = HashSet::new();
        let mut last_error: Option<ProviderError> = None;

        let variants = query_variants(topic, &subtopic.title, self.vocabulary);
        for text in variants.into_iter().take(self.max_queries) {
            if unique_ids.len() >= max_results {
                break;
            }
            let query = MediaQuery {
                text,
                max_results,
                order: self.order.clone(),
                duration: self.duration,
                published_after: self.published_after,
            };
            counter!("media_queries_total").increment(1);

            let result = self
                .queue
                .run(|| tokio::time::timeout(self.call_timeout, provider.search(&query)))
                .await;
            let result = match result {
                Ok(r) => r,
                Err(_) => Err(ProviderError::Unavailable(format!(
                    "timed out after {:?}",
                    self.call_timeout
                ))),
            };

            match result {
                Ok(items) if items.is_empty() => {
                    debug!(target: "media", query = %query.text, "no results");
                }
                Ok(items) => {
                    debug!(target: "media", query = %query.text, count = items.len(), "query results");
                    for m in items {
                        unique_ids.insert(m.id.clone());
                        accumulated.push(m);
                    }
                }
                Err(e) => {
                    counter!("media_query_errors_total").increment(1);
                    warn!(
                        target: "media",
                        provider = provider.name(),
                        query = %query.text,
                        error = %e,
                        "media query failed, continuing"
                    );
                    last_error = Some(e);
                }
            }
        }

        let ranked = rank_media(accumulated, max_results);
        match last_error {
            Some(e) => Outcome::Degraded(ranked, e),
            None => Outcome::Ok(ranked),
        }
    }
}
