// src/classify.rs
//! Topic classifier: free-text topic → closed `Category`.
//!
//! Case-insensitive substring match against ordered keyword lists; the first
//! category (in `Category::MATCH_ORDER`) with a hit wins, otherwise `Default`.
//! Web is checked before Programming so "JavaScript" does not land on "java".

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Programming,
    Web,
    DataScience,
    Design,
    Business,
    Default,
}

impl Category {
    /// Every variant, for exhaustive template/bank checks.
    pub const ALL: [Category; 6] = [
        Category::Programming,
        Category::Web,
        Category::DataScience,
        Category::Design,
        Category::Business,
        Category::Default,
    ];

    /// Classification order (first match wins).
    pub const MATCH_ORDER: [Category; 5] = [
        Category::Web,
        Category::DataScience,
        Category::Programming,
        Category::Design,
        Category::Business,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Web => "web",
            Category::DataScience => "data-science",
            Category::Design => "design",
            Category::Business => "business",
            Category::Default => "default",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Web => &[
                "react",
                "javascript",
                "typescript",
                "html",
                "css",
                "web development",
                "frontend",
                "front-end",
                "backend",
                "node",
                "vue",
                "angular",
                "svelte",
                "next.js",
                "tailwind",
                "web",
            ],
            Category::DataScience => &[
                "data science",
                "machine learning",
                "deep learning",
                "data analysis",
                "statistics",
                "pandas",
                "numpy",
                "tensorflow",
                "pytorch",
                "neural network",
                "artificial intelligence",
                "sql",
                "data",
            ],
            Category::Programming => &[
                "programming",
                "python",
                "java",
                "rust",
                "golang",
                "c++",
                "c#",
                "kotlin",
                "swift",
                "algorithm",
                "data structure",
                "coding",
                "software",
            ],
            Category::Design => &[
                "design",
                "figma",
                "photoshop",
                "illustrator",
                "typography",
                "user experience",
                "user interface",
                "branding",
                "color theory",
            ],
            Category::Business => &[
                "business",
                "marketing",
                "management",
                "entrepreneur",
                "startup",
                "finance",
                "sales",
                "leadership",
                "accounting",
                "strategy",
            ],
            Category::Default => &[],
        }
    }

    /// Extra search vocabulary appended to one media query variant.
    pub fn search_vocabulary(self) -> Option<&'static str> {
        match self {
            Category::Programming => Some("programming"),
            Category::Web => Some("web development"),
            Category::DataScience => Some("data science"),
            Category::Design => Some("design"),
            Category::Business => Some("business"),
            Category::Default => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a topic to its category. Pure, never fails.
pub fn classify_topic(topic: &str) -> Category {
    let t = topic.to_lowercase();
    Category::MATCH_ORDER
        .into_iter()
        .find(|c| c.keywords().iter().any(|k| t.contains(k)))
        .unwrap_or(Category::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn react_is_web_not_programming() {
        assert_eq!(classify_topic("React.js"), Category::Web);
        assert_eq!(classify_topic("Modern JavaScript"), Category::Web);
    }

    #[test]
    fn case_insensitive_and_ordered() {
        assert_eq!(classify_topic("PYTHON for Data Science"), Category::DataScience);
        assert_eq!(classify_topic("Rust ownership"), Category::Programming);
        assert_eq!(classify_topic("Figma prototyping"), Category::Design);
        assert_eq!(classify_topic("Startup Finance 101"), Category::Business);
    }

    #[test]
    fn no_match_is_default() {
        assert_eq!(classify_topic("Medieval pottery"), Category::Default);
    }

    #[test]
    fn match_order_covers_every_non_default_category() {
        for c in Category::ALL {
            let listed = Category::MATCH_ORDER.contains(&c);
            assert_eq!(listed, c != Category::Default, "{c}");
            assert_eq!(c.keywords().is_empty(), c == Category::Default, "{c}");
        }
    }
}
