// src/outline/mod.rs
//! Structure provider adapter with deterministic fallback.
//!
//! `OutlineSynthesizer::synthesize` never fails: a missing credential, a provider
//! error or an unparseable payload all route to `templates::deterministic_outline`,
//! reported as `Outcome::Degraded`.

pub mod provider;
pub mod templates;

use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::classify::Category;
use crate::error::{Outcome, ProviderError};
use crate::model::{CourseOutline, Difficulty, SubtopicSpec};

pub use provider::{OpenAiOutlineProvider, OutlineProvider};
pub use templates::deterministic_outline;

#[derive(Clone, Default)]
pub struct OutlineSynthesizer {
    provider: Option<Arc<dyn OutlineProvider>>,
}

impl OutlineSynthesizer {
    pub fn new(provider: Option<Arc<dyn OutlineProvider>>) -> Self {
        Self { provider }
    }

    pub fn offline() -> Self {
        Self { provider: None }
    }

    pub async fn synthesize(
        &self,
        topic: &str,
        category: Category,
        difficulty: Difficulty,
        target_duration_hours: f32,
    ) -> Outcome<CourseOutline> {
        let fallback =
            || deterministic_outline(topic, category, difficulty, target_duration_hours);

        let Some(provider) = &self.provider else {
            counter!("outline_fallback_total").increment(1);
            return Outcome::Degraded(fallback(), ProviderError::NotConfigured);
        };

        let brief = build_brief(topic, category, difficulty, target_duration_hours);
        let target_minutes = (target_duration_hours.max(0.0) * 60.0).round() as u32;
        let parsed = match provider.propose(&brief).await {
            Ok(raw) => parse_outline(&raw, target_minutes),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(outline) => {
                info!(
                    target: "outline",
                    provider = provider.name(),
                    subtopics = outline.subtopics.len(),
                    "outline from provider"
                );
                Outcome::Ok(outline)
            }
            Err(e) => {
                warn!(
                    target: "outline",
                    provider = provider.name(),
                    error = %e,
                    "outline provider failed, using template"
                );
                counter!("outline_fallback_total").increment(1);
                Outcome::Degraded(fallback(), e)
            }
        }
    }
}

/// Natural-language brief sent to the structure provider.
pub fn build_brief(
    topic: &str,
    category: Category,
    difficulty: Difficulty,
    target_duration_hours: f32,
) -> String {
    format!(
        "Design a {level} online course about \"{topic}\" (category: {category}).\n\
         Total length: about {hours:.1} hours.\n\
         Constraints:\n\
         - between {min} and {max} subtopics, ordered from fundamentals to advanced use\n\
         - each subtopic has a title, a two-sentence description, 3 to 5 key points and an estimated duration in minutes\n\
         - include prerequisites and 3 to 6 learning objectives\n\
         Respond with JSON of the form:\n\
         {{\"title\": string, \"description\": string, \"prerequisites\": [string], \"learningObjectives\": [string], \
         \"totalDurationMinutes\": number, \"subtopics\": [{{\"order\": number, \"title\": string, \"description\": string, \
         \"keyPoints\": [string], \"estimatedDurationMinutes\": number}}]}}",
        level = difficulty.label().to_lowercase(),
        hours = target_duration_hours,
        min = templates::MIN_SUBTOPICS,
        max = templates::MAX_SUBTOPICS,
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutline {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "lessons", alias = "modules")]
    subtopics: Vec<RawSubtopic>,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    learning_objectives: Vec<String>,
    #[serde(default)]
    total_duration_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubtopic {
    #[serde(default)]
    order: Option<f64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default, alias = "durationMinutes", alias = "duration")]
    estimated_duration_minutes: Option<f64>,
}

/// Slice out the outermost `{ ... }`, tolerating code fences and chatter.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parse and normalize provider text into a valid `CourseOutline`.
pub fn parse_outline(raw: &str, target_minutes: u32) -> Result<CourseOutline, ProviderError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| ProviderError::Malformed("no JSON object in response".to_string()))?;
    let parsed: RawOutline = serde_json::from_str(json)?;

    let mut subs: Vec<(f64, usize, RawSubtopic)> = parsed
        .subtopics
        .into_iter()
        .enumerate()
        .filter(|(_, s)| !s.title.trim().is_empty())
        .map(|(i, s)| (s.order.filter(|o| o.is_finite()).unwrap_or((i + 1) as f64), i, s))
        .collect();
    if subs.is_empty() {
        return Err(ProviderError::Malformed("outline has no subtopics".to_string()));
    }
    subs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let stated_total = parsed
        .total_duration_minutes
        .filter(|t| t.is_finite() && *t >= 1.0)
        .map(|t| t.round() as u32)
        .unwrap_or(target_minutes);
    let even_split = (stated_total / subs.len() as u32).max(1);

    let subtopics: Vec<SubtopicSpec> = subs
        .into_iter()
        .enumerate()
        .map(|(i, (_, _, s))| SubtopicSpec {
            order: i as u32 + 1,
            title: crate::text::normalize_text(&s.title),
            description: crate::text::normalize_text(&s.description),
            key_points: s
                .key_points
                .iter()
                .map(|k| crate::text::normalize_text(k))
                .filter(|k| !k.is_empty())
                .collect(),
            estimated_duration_minutes: s
                .estimated_duration_minutes
                .filter(|d| d.is_finite() && *d >= 1.0)
                .map(|d| d.round() as u32)
                .unwrap_or(even_split),
        })
        .collect();

    let title = crate::text::normalize_text(&parsed.title);
    if title.is_empty() {
        return Err(ProviderError::Malformed("outline has no title".to_string()));
    }

    let outline = CourseOutline {
        title,
        description: crate::text::normalize_text(&parsed.description),
        total_duration_minutes: subtopics.iter().map(|s| s.estimated_duration_minutes).sum(),
        subtopics,
        prerequisites: parsed.prerequisites,
        learning_objectives: parsed.learning_objectives,
    };
    validate_outline(&outline).map_err(ProviderError::Malformed)?;
    Ok(outline)
}

/// Shape check shared by both producers: non-empty, contiguous 1..N order, positive durations.
pub fn validate_outline(outline: &CourseOutline) -> Result<(), String> {
    if outline.title.trim().is_empty() {
        return Err("empty title".to_string());
    }
    if outline.subtopics.is_empty() {
        return Err("no subtopics".to_string());
    }
    for (i, s) in outline.subtopics.iter().enumerate() {
        if s.order != i as u32 + 1 {
            return Err(format!("subtopic {} has order {}", i + 1, s.order));
        }
        if s.title.trim().is_empty() {
            return Err(format!("subtopic {} has no title", s.order));
        }
        if s.estimated_duration_minutes == 0 {
            return Err(format!("subtopic {} has zero duration", s.order));
        }
    }
    Ok(())
}
