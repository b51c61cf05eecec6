// src/lib.rs
// Public library surface for integration tests and the embedding application.

pub mod aggregate;
pub mod assemble;
pub mod classify;
pub mod config;
pub mod error;
pub mod media;
pub mod model;
pub mod outline;
pub mod quiz;
pub mod reading;
pub mod telemetry;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{CourseGenerator, Degradation, GenerationReport, Phase};
pub use crate::classify::{classify_topic, Category};
pub use crate::config::PipelineConfig;
pub use crate::error::{Outcome, PipelineError, ProviderError};
pub use crate::model::{
    CourseBlueprint, CourseOutline, Difficulty, GenerateOptions, Lesson, LessonKind,
    MediaResource, QuizQuestion, ReadingResource, SubtopicSpec,
};

/// Generate a course using configuration from `config::load_default()`.
///
/// Example:
/// ```ignore
/// let course = course_forge::generate("React.js", &GenerateOptions::default()).await?;
/// println!("{} lessons", course.lessons.len());
/// ```
pub async fn generate(topic: &str, options: &GenerateOptions) -> error::Result<CourseBlueprint> {
    CourseGenerator::from_config(config::load_default())
        .generate(topic, options)
        .await
}
