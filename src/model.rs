// src/model.rs
//! Value types flowing through the pipeline: outline → enriched subtopic → lesson → blueprint.
//! Only `CourseBlueprint` leaves a run; everything else is transient working state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::Category;

/// Fixed reading allowance added to every lesson that carries media.
pub const FIXED_READING_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Lenient parse used by the demo binary; unknown → `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" | "basic" | "easy" => Some(Difficulty::Beginner),
            "intermediate" | "medium" => Some(Difficulty::Intermediate),
            "advanced" | "expert" | "hard" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller-supplied knobs for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub difficulty: Difficulty,
    pub target_duration_hours: f32,
    pub media_per_lesson: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Beginner,
            target_duration_hours: 4.0,
            media_per_lesson: 3,
        }
    }
}

impl GenerateOptions {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_hours(mut self, hours: f32) -> Self {
        self.target_duration_hours = hours;
        self
    }

    pub fn with_media_per_lesson(mut self, n: usize) -> Self {
        self.media_per_lesson = n;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtopicSpec {
    pub order: u32,
    pub title: String,
    pub description: String,
    pub key_points: Vec<String>,
    pub estimated_duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub description: String,
    pub subtopics: Vec<SubtopicSpec>,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub total_duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_seconds: u32,
    pub thumbnail_url: String,
    pub source_channel: String,
    pub view_count: u64,
    pub like_count: Option<u64>,
    pub embed_url: String,
    pub watch_url: String,
}

impl MediaResource {
    /// Engagement score used for ranking: views + likes (likes default to 0).
    pub fn engagement_score(&self) -> u64 {
        self.view_count
            .saturating_add(self.like_count.unwrap_or(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingResource {
    pub title: String,
    pub url: String,
    pub source: String,
    pub description: String,
    pub reading_time_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// At least two options, all distinct, and a correct index inside the list.
    pub fn is_well_formed(&self) -> bool {
        if self.options.len() < 2 || self.correct_option_index >= self.options.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.options.iter().all(|o| seen.insert(o.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Quiz,
    Article,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub order: u32,
    pub title: String,
    pub kind: LessonKind,
    pub body_text: String,
    pub media: Vec<MediaResource>,
    pub reading: Vec<ReadingResource>,
    pub quiz: Vec<QuizQuestion>,
    pub estimated_duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CourseMetadata {
    pub total_duration_minutes: u32,
    pub media_count: usize,
    pub reading_count: usize,
    pub quiz_count: usize,
}

/// The pipeline's sole output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseBlueprint {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty_label: String,
    /// Ordered set: insertion order kept, no duplicates, at most 10 entries.
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub lessons: Vec<Lesson>,
    pub metadata: CourseMetadata,
}
