// src/outline/provider.rs
//! Structure provider: asks a chat-completions style endpoint for a course outline.
//! Returns the raw assistant text; parsing lives in `outline::parse_outline`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OutlineConfig;
use crate::error::ProviderError;

#[async_trait]
pub trait OutlineProvider: Send + Sync {
    /// Send the brief, return the provider's raw text answer.
    async fn propose(&self, brief: &str) -> Result<String, ProviderError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// OpenAI-compatible chat completions provider.
pub struct OpenAiOutlineProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiOutlineProvider {
    pub fn new(cfg: &OutlineConfig, api_key: &str) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent("course-forge/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: cfg.model.clone(),
            endpoint: cfg.endpoint.clone(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = "You are an expert instructional designer. \
Answer with a single JSON object only, no prose and no Markdown.";

#[async_trait]
impl OutlineProvider for OpenAiOutlineProvider {
    async fn propose(&self, brief: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: brief,
                },
            ],
            temperature: 0.4,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Unavailable(format!(
                "status {status}: {}",
                crate::text::truncate_chars(&body, 200)
            )));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::Malformed("empty completion".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
