// src/reading/web_search.rs
//! Web/document search via the Tavily Search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{DocumentHit, DocumentSearch};
use crate::error::ProviderError;

const DEFAULT_ENDPOINT: &str = "https://api.tavily.com/search";

pub struct TavilySearch {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl TavilySearch {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent("course-forge/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client,
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    api_key: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// "https://www.medium.com/foo" → "medium.com"
pub fn extract_domain(u: &str) -> String {
    url::Url::parse(u)
        .ok()
        .and_then(|p| p.host_str().map(str::to_string))
        .map(|h| h.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

#[async_trait]
impl DocumentSearch for TavilySearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DocumentHit>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured);
        }
        let req = SearchRequest {
            query,
            max_results: limit,
            search_depth: "basic",
            api_key: &self.api_key,
        };
        let resp = self.client.post(&self.endpoint).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!("status {status}")));
        }
        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .map(|r| DocumentHit {
                source: extract_domain(&r.url),
                title: r.title,
                url: r.url,
                snippet: r.content,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}
