// tests/media_enrichment.rs
//
// Media engine behaviour against a scripted in-memory provider (no network).
// Paused tokio time lets the 500ms inter-query delay auto-advance.

use async_trait::async_trait;
use course_forge::config::MediaConfig;
use course_forge::media::{rank_media, MediaEnricher, MediaQuery, MediaSearch};
use course_forge::{MediaResource, ProviderError, SubtopicSpec};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn item(id: &str, views: u64, likes: Option<u64>) -> MediaResource {
    MediaResource {
        id: id.to_string(),
        title: format!("Video {id}"),
        description: String::new(),
        duration_seconds: 300,
        thumbnail_url: String::new(),
        source_channel: "Channel".to_string(),
        view_count: views,
        like_count: likes,
        embed_url: format!("https://www.youtube.com/embed/{id}"),
        watch_url: format!("https://www.youtube.com/watch?v={id}"),
    }
}

fn subtopic() -> SubtopicSpec {
    SubtopicSpec {
        order: 1,
        title: "Components".to_string(),
        description: "Building blocks".to_string(),
        key_points: vec!["JSX".to_string()],
        estimated_duration_minutes: 30,
    }
}

/// Pops one scripted response per call; empty list once exhausted.
struct Scripted {
    script: Mutex<VecDeque<Result<Vec<MediaResource>, ProviderError>>>,
    queries: Mutex<Vec<String>>,
    stall: Option<Duration>,
}

impl Scripted {
    fn new(script: Vec<Result<Vec<MediaResource>, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            queries: Mutex::new(Vec::new()),
            stall: None,
        }
    }

    fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaSearch for Scripted {
    async fn search(&self, query: &MediaQuery) -> Result<Vec<MediaResource>, ProviderError> {
        self.queries.lock().unwrap().push(query.text.clone());
        if let Some(d) = self.stall {
            tokio::time::sleep(d).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn enricher(provider: Arc<Scripted>, cfg: &MediaConfig) -> MediaEnricher {
    MediaEnricher::new(Some(provider as Arc<dyn MediaSearch>), cfg)
}

#[tokio::test(start_paused = true)]
async fn duplicate_ids_across_queries_collapse_and_rank() {
    // 6 candidates over two queries; "x" appears three times.
    let provider = Arc::new(Scripted::new(vec![
        Ok(vec![item("a", 100, None), item("b", 40, Some(10)), item("x", 10, None)]),
        Ok(vec![item("x", 999, None), item("c", 60, Some(10)), item("x", 5, None)]),
    ]));
    let cfg = MediaConfig::default();
    let out = enricher(provider.clone(), &cfg)
        .enrich_subtopic_media("React", &subtopic(), 10)
        .await;

    assert!(!out.is_degraded());
    let media = out.into_value();
    let ids: Vec<_> = media.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["a", "c", "b", "x"]);
    // First occurrence of "x" wins.
    assert_eq!(media[3].view_count, 10);
    assert_eq!(provider.calls(), cfg.max_queries);
}

#[tokio::test(start_paused = true)]
async fn stops_querying_once_enough_unique_items() {
    let provider = Arc::new(Scripted::new(vec![
        Ok(vec![item("a", 1, None), item("b", 3, None), item("c", 2, None)]),
        Ok(vec![item("d", 1_000_000, None)]),
    ]));
    let out = enricher(provider.clone(), &MediaConfig::default())
        .enrich_subtopic_media("React", &subtopic(), 2)
        .await
        .into_value();

    assert_eq!(provider.calls(), 1);
    let ids: Vec<_> = out.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["b", "c"]);
}

#[tokio::test(start_paused = true)]
async fn failed_query_is_skipped_and_reported() {
    let provider = Arc::new(Scripted::new(vec![
        Err(ProviderError::Unavailable("quota exceeded".to_string())),
        Ok(vec![item("a", 5, None)]),
    ]));
    let out = enricher(provider.clone(), &MediaConfig::default())
        .enrich_subtopic_media("React", &subtopic(), 1)
        .await;

    assert_eq!(
        out.reason(),
        Some(&ProviderError::Unavailable("quota exceeded".to_string()))
    );
    assert_eq!(out.value().len(), 1);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn stalled_call_times_out_as_unavailable() {
    let mut scripted = Scripted::new(vec![Ok(vec![item("late", 1, None)])]);
    scripted.stall = Some(Duration::from_secs(3600));
    let provider = Arc::new(scripted);
    let mut cfg = MediaConfig::default();
    cfg.timeout_secs = 1;
    cfg.max_queries = 1;

    let out = enricher(provider, &cfg)
        .enrich_subtopic_media("React", &subtopic(), 3)
        .await;
    assert!(matches!(out.reason(), Some(ProviderError::Unavailable(m)) if m.contains("timed out")));
    assert!(out.value().is_empty());
}

#[tokio::test(start_paused = true)]
async fn queries_are_spaced_by_the_delay_policy() {
    let provider = Arc::new(Scripted::new(vec![]));
    let cfg = MediaConfig::default();
    let engine = enricher(provider.clone(), &cfg);

    let t0 = tokio::time::Instant::now();
    let _ = engine.enrich_subtopic_media("React", &subtopic(), 3).await;
    assert_eq!(provider.calls(), 5);
    assert!(t0.elapsed() >= Duration::from_millis(4 * 500));
    assert_eq!(engine.queue().issued(), 5);

    let queries = provider.queries.lock().unwrap().clone();
    assert_eq!(queries[0], "React Components tutorial");
    assert!(queries.iter().all(|q| q.contains("Components")));
}

#[tokio::test]
async fn unconfigured_provider_yields_single_stub() {
    let engine = MediaEnricher::new(None, &MediaConfig::default());
    let out = engine.enrich_subtopic_media("React", &subtopic(), 3).await;
    assert_eq!(out.reason(), Some(&ProviderError::NotConfigured));
    let media = out.into_value();
    assert_eq!(media.len(), 1);
    assert!(media[0].id.starts_with("stub-"));
    assert_eq!(engine.queue().issued(), 0);
}

#[test]
fn ranking_returns_top_k_by_engagement() {
    let candidates = vec![
        item("p", 50, None),
        item("q", 10, Some(45)),
        item("r", 70, None),
        item("s", 55, None),
        item("p", 9_999, None),
    ];
    for k in 0..=5 {
        let out = rank_media(candidates.clone(), k);
        assert!(out.len() <= k);
        let expected: Vec<&str> = ["r", "q", "s", "p"].into_iter().take(k).collect();
        let ids: Vec<_> = out.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, expected, "k={k}");
    }
}
