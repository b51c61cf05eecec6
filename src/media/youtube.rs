// src/media/youtube.rs
//! YouTube Data API v3 adapter: `search` for ids, then one batched `videos`
//! lookup for duration, statistics and snippet details.

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::{DurationBucket, MediaQuery, MediaSearch};
use crate::error::ProviderError;
use crate::model::MediaResource;
use crate::text::{normalize_text, truncate_chars};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeProvider {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent("course-forge/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let resp = self
            .http
            .get(format!("{}/{path}", self.base_url))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body)
            .with_context(|| format!("decoding youtube {path} response"))
            .map_err(|e| ProviderError::Malformed(format!("{e:#}")))
    }
}

/// Quota exhaustion is reported as 403 with reason `quotaExceeded`.
pub fn classify_api_error(status: u16, body: &str) -> ProviderError {
    let quota = body.contains("quotaExceeded") || body.contains("rateLimitExceeded");
    if status == 403 && quota {
        ProviderError::Unavailable("quota exceeded".to_string())
    } else {
        ProviderError::Unavailable(format!("status {status}: {}", truncate_chars(body, 200)))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    content_details: Option<ContentDetails>,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

/// The API returns counts as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default)]
    view_count: Option<String>,
    #[serde(default)]
    like_count: Option<String>,
}

/// Parse ISO-8601 durations as used by YouTube ("PT1H2M3S", "P1DT2H"). Unknown → 0.
pub fn parse_iso8601_duration(s: &str) -> u32 {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").expect("duration regex")
    });
    let Some(caps) = re.captures(s.trim()) else {
        return 0;
    };
    let part = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    part(1)
        .saturating_mul(86_400)
        .saturating_add(part(2).saturating_mul(3600))
        .saturating_add(part(3).saturating_mul(60))
        .saturating_add(part(4))
}

fn best_thumbnail(thumbs: &HashMap<String, Thumbnail>) -> String {
    ["high", "medium", "default"]
        .iter()
        .find_map(|k| thumbs.get(*k))
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

fn to_resource(v: VideoItem) -> MediaResource {
    let stats = v.statistics.as_ref();
    let parse_count = |s: Option<&String>| s.and_then(|c| c.parse::<u64>().ok());
    MediaResource {
        title: normalize_text(&v.snippet.title),
        description: truncate_chars(&normalize_text(&v.snippet.description), 500),
        duration_seconds: v
            .content_details
            .as_ref()
            .map(|c| parse_iso8601_duration(&c.duration))
            .unwrap_or(0),
        thumbnail_url: best_thumbnail(&v.snippet.thumbnails),
        source_channel: normalize_text(&v.snippet.channel_title),
        view_count: parse_count(stats.and_then(|s| s.view_count.as_ref())).unwrap_or(0),
        like_count: parse_count(stats.and_then(|s| s.like_count.as_ref())),
        embed_url: format!("https://www.youtube.com/embed/{}", v.id),
        watch_url: format!("https://www.youtube.com/watch?v={}", v.id),
        id: v.id,
    }
}

/// Map a `videos` response body, keeping the order of `ids`.
pub(crate) fn map_videos(resp: VideosResponse, ids: &[String]) -> Vec<MediaResource> {
    let mut by_id: HashMap<String, VideoItem> =
        resp.items.into_iter().map(|v| (v.id.clone(), v)).collect();
    ids.iter()
        .filter_map(|id| by_id.remove(id))
        .map(to_resource)
        .collect()
}

#[async_trait]
impl MediaSearch for YouTubeProvider {
    async fn search(&self, query: &MediaQuery) -> Result<Vec<MediaResource>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        let mut params: Vec<(&str, String)> = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", query.text.clone()),
            ("maxResults", query.max_results.clamp(1, 50).to_string()),
            ("order", query.order.clone()),
            ("videoEmbeddable", "true".to_string()),
            ("relevanceLanguage", "en".to_string()),
        ];
        if query.duration != DurationBucket::Any {
            params.push(("videoDuration", query.duration.as_str().to_string()));
        }
        if let Some(after) = query.published_after {
            params.push((
                "publishedAfter",
                after.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ));
        }

        let found: SearchResponse = self.get_json("search", &params).await?;
        let ids: Vec<String> = found
            .items
            .into_iter()
            .filter_map(|i| i.id.video_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let details: VideosResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "snippet,contentDetails,statistics".to_string()),
                    ("id", ids.join(",")),
                ],
            )
            .await?;
        Ok(map_videos(details, &ids))
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_durations() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration("PT15M"), 900);
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("P1DT1S"), 86_401);
        assert_eq!(parse_iso8601_duration("P0D"), 0);
        assert_eq!(parse_iso8601_duration("garbage"), 0);
    }

    #[test]
    fn maps_videos_in_search_order() {
        let body = r#"{"items": [
            {"id": "b", "snippet": {"title": "Hooks &amp; State", "description": "d",
              "channelTitle": "Chan", "thumbnails": {"default": {"url": "t-default"}, "high": {"url": "t-high"}}},
             "contentDetails": {"duration": "PT10M30S"},
             "statistics": {"viewCount": "1200", "likeCount": "34"}},
            {"id": "a", "snippet": {"title": "Intro"},
             "statistics": {"viewCount": "not-a-number"}}
        ]}"#;
        let resp: VideosResponse = serde_json::from_str(body).unwrap();
        let out = map_videos(resp, &["a".to_string(), "b".to_string(), "zzz".to_string()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[0].view_count, 0);
        assert_eq!(out[0].like_count, None);
        assert_eq!(out[1].title, "Hooks & State");
        assert_eq!(out[1].duration_seconds, 630);
        assert_eq!(out[1].thumbnail_url, "t-high");
        assert_eq!(out[1].like_count, Some(34));
        assert_eq!(out[1].engagement_score(), 1234);
        assert_eq!(out[1].watch_url, "https://www.youtube.com/watch?v=b");
    }

    #[test]
    fn quota_errors_are_recognized() {
        let body = r#"{"error": {"errors": [{"reason": "quotaExceeded"}]}}"#;
        assert_eq!(
            classify_api_error(403, body),
            ProviderError::Unavailable("quota exceeded".to_string())
        );
        assert!(matches!(
            classify_api_error(500, "boom"),
            ProviderError::Unavailable(m) if m.starts_with("status 500")
        ));
    }
}
