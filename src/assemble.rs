// src/assemble.rs
//! Content assembler: one subtopic + its enrichment → one `Lesson`.
//!
//! Body order is fixed: overview, key points, media, reading, summary.

use std::fmt::Write as _;

use crate::model::{
    Lesson, LessonKind, MediaResource, QuizQuestion, ReadingResource, SubtopicSpec,
    FIXED_READING_MINUTES,
};
use crate::text::{format_duration, truncate_chars};

const MEDIA_DESCRIPTION_CHARS: usize = 200;

/// Σ media minutes (rounded) + reading allowance; subtopic estimate when no media.
pub fn lesson_duration_minutes(subtopic: &SubtopicSpec, media: &[MediaResource]) -> u32 {
    if media.is_empty() {
        return subtopic.estimated_duration_minutes;
    }
    let total_secs: u64 = media.iter().map(|m| u64::from(m.duration_seconds)).sum();
    let minutes = (total_secs as f64 / 60.0).round() as u32;
    minutes + FIXED_READING_MINUTES
}

pub fn compose_body(
    subtopic: &SubtopicSpec,
    media: &[MediaResource],
    reading: &[ReadingResource],
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Overview\n");
    let overview = if subtopic.description.trim().is_empty() {
        format!("This lesson introduces {}.", subtopic.title)
    } else {
        subtopic.description.clone()
    };
    let _ = writeln!(out, "{overview}\n");

    if !subtopic.key_points.is_empty() {
        let _ = writeln!(out, "## Key Points\n");
        for kp in &subtopic.key_points {
            let _ = writeln!(out, "- {kp}");
        }
        out.push('\n');
    }

    if !media.is_empty() {
        let _ = writeln!(out, "## Videos\n");
        for m in media {
            let _ = writeln!(out, "### {}\n", m.title);
            let _ = writeln!(
                out,
                "Source: {} | Duration: {}",
                m.source_channel,
                format_duration(m.duration_seconds)
            );
            if !m.description.is_empty() {
                let _ = writeln!(out, "\n{}", truncate_chars(&m.description, MEDIA_DESCRIPTION_CHARS));
            }
            let _ = writeln!(out, "\n[Watch]({})\n", m.watch_url);
        }
    }

    if !reading.is_empty() {
        let _ = writeln!(out, "## Further Reading\n");
        for r in reading {
            let _ = write!(out, "- [{}]({}) ({}", r.title, r.url, r.source);
            if let Some(label) = &r.reading_time_label {
                let _ = write!(out, ", {label}");
            }
            let _ = writeln!(out, ")");
            if !r.description.is_empty() {
                let _ = writeln!(out, "  {}", r.description);
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Summary\n");
    let _ = write!(
        out,
        "In this lesson you worked through {}. Review the key points, then check your understanding before moving on.",
        subtopic.title
    );
    out
}

pub fn assemble_lesson(
    subtopic: &SubtopicSpec,
    media: Vec<MediaResource>,
    reading: Vec<ReadingResource>,
    quiz: Vec<QuizQuestion>,
) -> Lesson {
    let body_text = compose_body(subtopic, &media, &reading);
    let estimated_duration_minutes = lesson_duration_minutes(subtopic, &media);
    let kind = if quiz.is_empty() {
        LessonKind::Article
    } else {
        LessonKind::Quiz
    };
    Lesson {
        order: subtopic.order,
        title: subtopic.title.clone(),
        kind,
        body_text,
        media,
        reading,
        quiz,
        estimated_duration_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub() -> SubtopicSpec {
        SubtopicSpec {
            order: 2,
            title: "Hooks".into(),
            description: "Using hooks for state.".into(),
            key_points: vec!["useState".into(), "useEffect".into()],
            estimated_duration_minutes: 33,
        }
    }

    fn media(id: &str, secs: u32) -> MediaResource {
        MediaResource {
            id: id.into(),
            title: format!("Video {id}"),
            description: "x".repeat(400),
            duration_seconds: secs,
            thumbnail_url: String::new(),
            source_channel: "Chan".into(),
            view_count: 1,
            like_count: None,
            embed_url: String::new(),
            watch_url: format!("https://w/{id}"),
        }
    }

    #[test]
    fn duration_rounds_media_total_plus_reading() {
        // 610 + 200 = 810s = 13.5 min → 14
        let d = lesson_duration_minutes(&sub(), &[media("a", 610), media("b", 200)]);
        assert_eq!(d, 14 + FIXED_READING_MINUTES);
        assert_eq!(lesson_duration_minutes(&sub(), &[]), 33);
    }

    #[test]
    fn body_sections_in_order() {
        let reading = vec![ReadingResource {
            title: "Docs".into(),
            url: "https://d".into(),
            source: "MDN".into(),
            description: "Ref".into(),
            reading_time_label: Some("5 min read".into()),
        }];
        let body = compose_body(&sub(), &[media("a", 90)], &reading);
        let idx = |needle: &str| body.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(idx("## Overview") < idx("## Key Points"));
        assert!(idx("## Key Points") < idx("## Videos"));
        assert!(idx("## Videos") < idx("## Further Reading"));
        assert!(idx("## Further Reading") < idx("## Summary"));
        assert!(body.contains("Duration: 1:30"));
        assert!(body.contains("- [Docs](https://d) (MDN, 5 min read)"));
        assert!(body.trim_end().ends_with("before moving on."));
        assert!(body.contains("Hooks"));
        assert!(!body.contains(&"x".repeat(250)));
    }

    #[test]
    fn kind_follows_quiz_presence() {
        let l = assemble_lesson(&sub(), vec![], vec![], vec![]);
        assert_eq!(l.kind, LessonKind::Article);
        assert_eq!(l.order, 2);
        assert_eq!(l.estimated_duration_minutes, 33);
    }
}
