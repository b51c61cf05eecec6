// tests/classify_topics.rs
//
// Topic → category table, including overlapping keyword cases.

use course_forge::{classify_topic, Category};

#[test]
fn handpicked_topics() {
    let cases = [
        ("React.js", Category::Web),
        ("Intro to TypeScript", Category::Web),
        ("Node backend APIs", Category::Web),
        ("Deep Learning with PyTorch", Category::DataScience),
        ("SQL for analysts", Category::DataScience),
        ("Rust Programming", Category::Programming),
        ("Kotlin coroutines", Category::Programming),
        ("Typography basics", Category::Design),
        ("Figma", Category::Design),
        ("Sales leadership", Category::Business),
        ("Accounting 101", Category::Business),
        ("Medieval history", Category::Default),
        ("", Category::Default),
    ];
    for (topic, expected) in cases {
        assert_eq!(classify_topic(topic), expected, "topic {topic:?}");
    }
}

#[test]
fn earlier_category_wins_on_overlap() {
    // "javascript" contains "java"; web is checked first.
    assert_eq!(classify_topic("JavaScript"), Category::Web);
    // "data" beats "python" because data science precedes programming.
    assert_eq!(classify_topic("Python data pipelines"), Category::DataScience);
    // "web design": web precedes design.
    assert_eq!(classify_topic("Web Design"), Category::Web);
}

#[test]
fn classification_ignores_case_and_padding() {
    assert_eq!(classify_topic("  MACHINE LEARNING  "), Category::DataScience);
    assert_eq!(classify_topic("figma"), classify_topic("FIGMA"));
}

#[test]
fn category_serializes_kebab_case() {
    let json = serde_json::to_string(&Category::DataScience).unwrap();
    assert_eq!(json, "\"data-science\"");
    assert_eq!(Category::DataScience.as_str(), "data-science");
}
