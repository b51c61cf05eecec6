// src/aggregate.rs
//! # Course Aggregator
//! Runs the pipeline end to end for one topic:
//! `Classifying → OutlineReady → EnrichingSubtopic(1..N) → Assembling → Done`.
//!
//! Subtopics are enriched one after another (media calls share one rate-limited
//! queue per run). Provider trouble only ever degrades content; the single hard
//! failure is an unusable input, rejected before any provider is called.

use metrics::{counter, histogram};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::classify::{classify_topic, Category};
use crate::config::PipelineConfig;
use crate::error::{Outcome, PipelineError, ProviderError, Result};
use crate::media::{MediaEnricher, MediaSearch, YouTubeProvider};
use crate::model::{
    CourseBlueprint, CourseMetadata, CourseOutline, Difficulty, GenerateOptions, Lesson,
    MediaResource, QuizQuestion, ReadingResource, SubtopicSpec,
};
use crate::outline::{OpenAiOutlineProvider, OutlineProvider, OutlineSynthesizer};
use crate::quiz::synthesize_quiz;
use crate::reading::{DocumentSearch, ReadingResolver, TavilySearch};
use crate::text::slugify;

pub const MAX_TAGS: usize = 10;
const GENERIC_TAGS: &[&str] = &[
    "online-course",
    "self-paced",
    "video-lessons",
    "quizzes",
    "further-reading",
    "e-learning",
];

/// States visited by one run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Classifying,
    OutlineReady,
    EnrichingSubtopic(u32),
    Assembling,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Outline,
    Media,
    Reading,
}

/// One degraded component result, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    pub component: Component,
    pub subtopic: Option<u32>,
    pub reason: ProviderError,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub blueprint: CourseBlueprint,
    pub degradations: Vec<Degradation>,
    pub phases: Vec<Phase>,
}

/// Subtopic plus everything fetched for it; input to assembly.
#[derive(Debug, Clone)]
pub struct EnrichedSubtopic {
    pub spec: SubtopicSpec,
    pub media: Vec<MediaResource>,
    pub reading: Vec<ReadingResource>,
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Clone)]
pub struct CourseGenerator {
    config: PipelineConfig,
    outline: OutlineSynthesizer,
    media: Option<Arc<dyn MediaSearch>>,
    documents: Option<Arc<dyn DocumentSearch>>,
}

impl CourseGenerator {
    /// Build providers for every credential present in `config`.
    pub fn from_config(config: PipelineConfig) -> Self {
        let outline_provider: Option<Arc<dyn OutlineProvider>> = config
            .outline_key()
            .and_then(|key| match OpenAiOutlineProvider::new(&config.outline, key) {
                Ok(p) => Some(Arc::new(p) as Arc<dyn OutlineProvider>),
                Err(e) => {
                    warn!(target: "pipeline", error = %e, "outline provider unavailable");
                    None
                }
            });

        let media: Option<Arc<dyn MediaSearch>> = config.media.api_key.as_deref().and_then(|key| {
            match YouTubeProvider::new(key, config.media.call_timeout()) {
                Ok(p) => Some(Arc::new(p) as Arc<dyn MediaSearch>),
                Err(e) => {
                    warn!(target: "pipeline", error = %e, "media provider unavailable");
                    None
                }
            }
        });

        let documents: Option<Arc<dyn DocumentSearch>> =
            config.reading.api_key.as_deref().and_then(|key| {
                match TavilySearch::new(key, Duration::from_secs(config.reading.timeout_secs)) {
                    Ok(p) => Some(Arc::new(p) as Arc<dyn DocumentSearch>),
                    Err(e) => {
                        warn!(target: "pipeline", error = %e, "document search unavailable");
                        None
                    }
                }
            });

        Self {
            config,
            outline: OutlineSynthesizer::new(outline_provider),
            media,
            documents,
        }
    }

    /// No external providers: every component takes its deterministic path.
    pub fn offline() -> Self {
        Self::from_config(PipelineConfig::offline())
    }

    pub fn with_outline_provider(mut self, provider: Arc<dyn OutlineProvider>) -> Self {
        self.outline = OutlineSynthesizer::new(Some(provider));
        self
    }

    pub fn with_media_provider(mut self, provider: Arc<dyn MediaSearch>) -> Self {
        self.media = Some(provider);
        self
    }

    pub fn with_document_search(mut self, provider: Arc<dyn DocumentSearch>) -> Self {
        self.documents = Some(provider);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn generate(&self, topic: &str, options: &GenerateOptions) -> Result<CourseBlueprint> {
        self.generate_with_report(topic, options)
            .await
            .map(|r| r.blueprint)
    }

    pub async fn generate_with_report(
        &self,
        topic: &str,
        options: &GenerateOptions,
    ) -> Result<GenerationReport> {
        crate::telemetry::ensure_metrics_described();
        counter!("course_generation_runs_total").increment(1);
        let t0 = Instant::now();

        if let Err(e) = validate_input(topic, options) {
            counter!("course_generation_failures_total").increment(1);
            warn!(target: "pipeline", phase = ?Phase::Failed, error = %e, "generation rejected");
            return Err(e);
        }
        let topic = topic.trim();

        let mut phases = vec![Phase::Classifying];
        let mut degradations = Vec::new();
        let category = classify_topic(topic);
        info!(target: "pipeline", topic, %category, difficulty = %options.difficulty, "generation started");

        let outline = self
            .outline
            .synthesize(topic, category, options.difficulty, options.target_duration_hours)
            .await;
        let outline = take_value(outline, Component::Outline, None, &mut degradations);
        phases.push(Phase::OutlineReady);

        let media = MediaEnricher::new(self.media.clone(), &self.config.media).with_vocabulary(category);
        let reading =
            ReadingResolver::new(self.documents.clone(), category, self.config.reading.max_results);

        let per_lesson = options.media_per_lesson.min(self.config.media.max_results.max(1));
        let mut enriched = Vec::with_capacity(outline.subtopics.len());
        for spec in &outline.subtopics {
            phases.push(Phase::EnrichingSubtopic(spec.order));
            let (media_out, reading_out) = tokio::join!(
                media.enrich_subtopic_media(topic, spec, per_lesson),
                reading.resolve_reading_resources(topic, spec),
            );
            enriched.push(EnrichedSubtopic {
                media: take_value(media_out, Component::Media, Some(spec.order), &mut degradations),
                reading: take_value(reading_out, Component::Reading, Some(spec.order), &mut degradations),
                quiz: synthesize_quiz(topic, spec, category),
                spec: spec.clone(),
            });
        }

        phases.push(Phase::Assembling);
        let blueprint = build_blueprint(topic, category, options.difficulty, &outline, enriched);
        phases.push(Phase::Done);

        if !degradations.is_empty() {
            counter!("pipeline_degradations_total").increment(degradations.len() as u64);
            warn!(
                target: "pipeline",
                count = degradations.len(),
                kinds = ?degradations.iter().map(|d| (d.component, d.reason.kind())).collect::<Vec<_>>(),
                "generation completed with degraded components"
            );
        }
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("course_generation_ms").record(ms);
        info!(
            target: "pipeline",
            lessons = blueprint.lessons.len(),
            media = blueprint.metadata.media_count,
            minutes = blueprint.metadata.total_duration_minutes,
            elapsed_ms = ms as u64,
            "generation finished"
        );

        Ok(GenerationReport {
            blueprint,
            degradations,
            phases,
        })
    }
}

fn validate_input(topic: &str, options: &GenerateOptions) -> Result<()> {
    if topic.trim().is_empty() {
        return Err(PipelineError::InvalidInput("topic must not be empty".to_string()));
    }
    let hours = options.target_duration_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(PipelineError::InvalidInput(format!(
            "target duration must be a positive number of hours, got {hours}"
        )));
    }
    if options.media_per_lesson == 0 {
        return Err(PipelineError::InvalidInput(
            "media_per_lesson must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn take_value<T>(
    outcome: Outcome<T>,
    component: Component,
    subtopic: Option<u32>,
    sink: &mut Vec<Degradation>,
) -> T {
    let (value, reason) = outcome.into_parts();
    if let Some(reason) = reason {
        sink.push(Degradation {
            component,
            subtopic,
            reason,
        });
    }
    value
}

/// Drop media already used by an earlier lesson, then assemble in order.
pub fn assemble_lessons(enriched: Vec<EnrichedSubtopic>) -> Vec<Lesson> {
    let (lessons, _) = enriched.into_iter().fold(
        (Vec::new(), HashSet::<String>::new()),
        |(mut lessons, mut used), e| {
            let media: Vec<MediaResource> = e
                .media
                .into_iter()
                .filter(|m| used.insert(m.id.clone()))
                .collect();
            lessons.push(crate::assemble::assemble_lesson(&e.spec, media, e.reading, e.quiz));
            (lessons, used)
        },
    );
    lessons
}

pub fn compute_metadata(lessons: &[Lesson]) -> CourseMetadata {
    CourseMetadata {
        total_duration_minutes: lessons.iter().map(|l| l.estimated_duration_minutes).sum(),
        media_count: lessons.iter().map(|l| l.media.len()).sum(),
        reading_count: lessons.iter().map(|l| l.reading.len()).sum(),
        quiz_count: lessons.iter().map(|l| l.quiz.len()).sum(),
    }
}

/// Topic slug, category, difficulty, then generic tags; deduped, capped at `MAX_TAGS`.
pub fn build_tags(topic: &str, category: Category, difficulty: Difficulty) -> Vec<String> {
    let candidates = [
        slugify(topic),
        category.as_str().to_string(),
        difficulty.label().to_lowercase(),
    ]
    .into_iter()
    .chain(GENERIC_TAGS.iter().map(|t| t.to_string()));

    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
    for t in candidates {
        if tags.len() == MAX_TAGS {
            break;
        }
        if !t.is_empty() && !tags.contains(&t) {
            tags.push(t);
        }
    }
    tags
}

fn build_blueprint(
    topic: &str,
    category: Category,
    difficulty: Difficulty,
    outline: &CourseOutline,
    enriched: Vec<EnrichedSubtopic>,
) -> CourseBlueprint {
    let lessons = assemble_lessons(enriched);
    CourseBlueprint {
        title: outline.title.clone(),
        description: outline.description.clone(),
        category,
        difficulty_label: difficulty.label().to_string(),
        tags: build_tags(topic, category, difficulty),
        prerequisites: outline.prerequisites.clone(),
        learning_objectives: outline.learning_objectives.clone(),
        metadata: compute_metadata(&lessons),
        lessons,
    }
}
