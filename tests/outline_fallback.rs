// tests/outline_fallback.rs
//
// Structure provider outcomes: valid payload, malformed payload, provider error.
// Both producers must satisfy the same outline shape check.

use async_trait::async_trait;
use course_forge::aggregate::Component;
use course_forge::outline::{validate_outline, OutlineProvider, OutlineSynthesizer};
use course_forge::{Category, CourseGenerator, Difficulty, GenerateOptions, ProviderError};
use std::sync::{Arc, Mutex};

struct Canned {
    reply: Result<String, ProviderError>,
    briefs: Mutex<Vec<String>>,
}

impl Canned {
    fn new(reply: Result<&str, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(str::to_string),
            briefs: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl OutlineProvider for Canned {
    async fn propose(&self, brief: &str) -> Result<String, ProviderError> {
        self.briefs.lock().unwrap().push(brief.to_string());
        self.reply.clone()
    }
    fn name(&self) -> &'static str {
        "canned"
    }
}

const GOOD: &str = r#"```json
{
  "title": "Rust for Busy Engineers",
  "description": "Ownership, traits and async in one weekend.",
  "prerequisites": ["Some programming experience"],
  "learningObjectives": ["Write safe concurrent code"],
  "totalDurationMinutes": 180,
  "subtopics": [
    {"order": 2, "title": "Borrowing", "description": "References.", "keyPoints": ["&T", "&mut T"], "estimatedDurationMinutes": 60},
    {"order": 1, "title": "Ownership", "description": "Moves.", "keyPoints": ["move semantics"], "estimatedDurationMinutes": 60},
    {"order": 3, "title": "Async", "description": "Futures.", "keyPoints": ["tokio"]}
  ]
}
```"#;

#[tokio::test]
async fn provider_outline_is_used_when_valid() {
    let provider = Canned::new(Ok(GOOD));
    let synth = OutlineSynthesizer::new(Some(provider.clone()));
    let out = synth
        .synthesize("Rust", Category::Programming, Difficulty::Intermediate, 3.0)
        .await;

    assert!(!out.is_degraded());
    let outline = out.into_value();
    validate_outline(&outline).unwrap();
    assert_eq!(outline.title, "Rust for Busy Engineers");
    let titles: Vec<_> = outline.subtopics.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Ownership", "Borrowing", "Async"]);
    // Missing duration takes the even split of the stated total.
    assert_eq!(outline.subtopics[2].estimated_duration_minutes, 60);

    let briefs = provider.briefs.lock().unwrap();
    assert_eq!(briefs.len(), 1);
    assert!(briefs[0].contains("\"Rust\""));
    assert!(briefs[0].contains("intermediate"));
}

#[tokio::test]
async fn malformed_payload_falls_back_to_template() {
    let synth = OutlineSynthesizer::new(Some(Canned::new(Ok("I cannot help with that."))));
    let out = synth
        .synthesize("Rust", Category::Programming, Difficulty::Beginner, 4.0)
        .await;

    assert!(matches!(out.reason(), Some(ProviderError::Malformed(_))));
    let outline = out.into_value();
    validate_outline(&outline).unwrap();
    assert_eq!(outline.subtopics.len(), 6);
}

#[tokio::test]
async fn provider_error_falls_back_to_template() {
    let synth = OutlineSynthesizer::new(Some(Canned::new(Err(ProviderError::Unavailable(
        "HTTP 500".into(),
    )))));
    let out = synth
        .synthesize("Figma", Category::Design, Difficulty::Advanced, 7.0)
        .await;
    assert_eq!(out.reason(), Some(&ProviderError::Unavailable("HTTP 500".into())));
    let outline = out.into_value();
    validate_outline(&outline).unwrap();
    assert_eq!(outline.subtopics.len(), 10);
}

#[tokio::test]
async fn template_outlines_are_valid_for_every_category() {
    let synth = OutlineSynthesizer::offline();
    for category in Category::ALL {
        for hours in [0.5_f32, 4.0, 12.0] {
            let out = synth
                .synthesize("Topic", category, Difficulty::Beginner, hours)
                .await;
            assert_eq!(out.reason(), Some(&ProviderError::NotConfigured));
            let outline = out.into_value();
            validate_outline(&outline).unwrap_or_else(|e| panic!("{category} {hours}: {e}"));
            assert!((6..=10).contains(&outline.subtopics.len()));
        }
    }
}

#[tokio::test]
async fn generator_reports_outline_degradation() {
    let gen = CourseGenerator::offline().with_outline_provider(Canned::new(Ok("{}")));
    let report = gen
        .generate_with_report("Rust", &GenerateOptions::default())
        .await
        .unwrap();
    let outline_issues: Vec<_> = report
        .degradations
        .iter()
        .filter(|d| d.component == Component::Outline)
        .collect();
    assert_eq!(outline_issues.len(), 1);
    assert!(matches!(outline_issues[0].reason, ProviderError::Malformed(_)));
    assert!(!report.blueprint.lessons.is_empty());
}

#[tokio::test]
async fn generator_uses_provider_outline_for_lessons() {
    let gen = CourseGenerator::offline().with_outline_provider(Canned::new(Ok(GOOD)));
    let bp = gen
        .generate("Rust", &GenerateOptions::default().with_hours(3.0))
        .await
        .unwrap();
    assert_eq!(bp.title, "Rust for Busy Engineers");
    assert_eq!(bp.lessons.len(), 3);
    assert_eq!(bp.lessons[0].title, "Ownership");
    assert_eq!(bp.prerequisites, vec!["Some programming experience".to_string()]);
}
