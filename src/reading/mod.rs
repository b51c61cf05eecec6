// src/reading/mod.rs
//! Reading resource resolver. Always returns at least one resource: provider hits
//! when available, otherwise category-specific templated links.

pub mod web_search;

use async_trait::async_trait;
use metrics::counter;
use std::collections::HashSet;
use std::sync::Arc;
use strsim::normalized_levenshtein;
use tracing::warn;

use crate::classify::Category;
use crate::error::{Outcome, ProviderError};
use crate::model::{ReadingResource, SubtopicSpec};
use crate::text::{normalize_text, reading_time_label, truncate_chars};

pub use web_search::TavilySearch;

/// Titles at least this similar are treated as the same article.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHit {
    pub title: String,
    pub url: String,
    pub source: String,
    pub snippet: String,
}

#[async_trait]
pub trait DocumentSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DocumentHit>, ProviderError>;
    fn name(&self) -> &'static str;
}

struct SourceTemplate {
    source: &'static str,
    /// `{q}` is replaced by the URL-encoded query.
    url: &'static str,
    blurb: &'static str,
}

const fn src(source: &'static str, url: &'static str, blurb: &'static str) -> SourceTemplate {
    SourceTemplate { source, url, blurb }
}

const WEB_SOURCES: &[SourceTemplate] = &[
    src("MDN Web Docs", "https://developer.mozilla.org/en-US/search?q={q}", "Reference documentation and guides"),
    src("web.dev", "https://web.dev/s/results?q={q}", "Modern web best practices"),
    src("freeCodeCamp", "https://www.freecodecamp.org/news/search/?query={q}", "Hands-on tutorials"),
];

const PROGRAMMING_SOURCES: &[SourceTemplate] = &[
    src("Official documentation", "https://devdocs.io/#q={q}", "Language and library reference"),
    src("GeeksforGeeks", "https://www.geeksforgeeks.org/search/?gq={q}", "Worked examples and exercises"),
    src("Stack Overflow", "https://stackoverflow.com/search?q={q}", "Common questions and answers"),
];

const DATA_SCIENCE_SOURCES: &[SourceTemplate] = &[
    src("Towards Data Science", "https://towardsdatascience.com/search?q={q}", "Practitioner articles"),
    src("Kaggle Learn", "https://www.kaggle.com/search?q={q}", "Notebooks and datasets"),
    src("scikit-learn User Guide", "https://scikit-learn.org/stable/search.html?q={q}", "Algorithms explained"),
];

const DESIGN_SOURCES: &[SourceTemplate] = &[
    src("Nielsen Norman Group", "https://www.nngroup.com/search/?q={q}", "Research-backed UX articles"),
    src("Smashing Magazine", "https://www.smashingmagazine.com/search/?q={q}", "Design and UX guides"),
];

const BUSINESS_SOURCES: &[SourceTemplate] = &[
    src("Harvard Business Review", "https://hbr.org/search?term={q}", "Management and strategy articles"),
    src("Investopedia", "https://www.investopedia.com/search?q={q}", "Definitions and explainers"),
];

const GENERIC_SOURCES: &[SourceTemplate] = &[
    src("Wikipedia", "https://en.wikipedia.org/w/index.php?search={q}", "Encyclopedic overview"),
    src("Google Scholar", "https://scholar.google.com/scholar?q={q}", "Academic sources"),
];

fn templates_for(category: Category) -> &'static [SourceTemplate] {
    match category {
        Category::Web => WEB_SOURCES,
        Category::Programming => PROGRAMMING_SOURCES,
        Category::DataScience => DATA_SCIENCE_SOURCES,
        Category::Design => DESIGN_SOURCES,
        Category::Business => BUSINESS_SOURCES,
        Category::Default => GENERIC_SOURCES,
    }
}

/// Templated stubs; never empty.
pub fn template_resources(
    topic: &str,
    subtopic: &SubtopicSpec,
    category: Category,
    limit: usize,
) -> Vec<ReadingResource> {
    let query = format!("{topic} {}", subtopic.title);
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    templates_for(category)
        .iter()
        .take(limit.max(1))
        .map(|t| ReadingResource {
            title: format!("{}: {}", t.source, subtopic.title),
            url: t.url.replace("{q}", &encoded),
            source: t.source.to_string(),
            description: format!("{} on {} in the context of {topic}.", t.blurb, subtopic.title.to_lowercase()),
            reading_time_label: Some("10 min read".to_string()),
        })
        .collect()
}

/// Drop hits with a repeated URL or a near-duplicate title.
pub fn dedupe_hits(hits: Vec<DocumentHit>) -> Vec<DocumentHit> {
    let mut urls = HashSet::new();
    let mut kept: Vec<DocumentHit> = Vec::with_capacity(hits.len());
    for h in hits {
        if !urls.insert(h.url.trim_end_matches('/').to_string()) {
            continue;
        }
        let title = h.title.to_lowercase();
        let dup = kept
            .iter()
            .any(|k| normalized_levenshtein(&k.title.to_lowercase(), &title) >= TITLE_SIMILARITY_THRESHOLD);
        if !dup {
            kept.push(h);
        }
    }
    kept
}

fn to_resource(hit: DocumentHit) -> ReadingResource {
    let snippet = normalize_text(&hit.snippet);
    // Snippets are excerpts; assume the full article is ~4x longer.
    let words = snippet.split_whitespace().count() * 4;
    ReadingResource {
        title: normalize_text(&hit.title),
        url: hit.url,
        source: if hit.source.is_empty() { "Web".to_string() } else { hit.source },
        description: truncate_chars(&snippet, 240),
        reading_time_label: Some(reading_time_label(words, 3)),
    }
}

#[derive(Clone)]
pub struct ReadingResolver {
    provider: Option<Arc<dyn DocumentSearch>>,
    category: Category,
    max_results: usize,
}

impl ReadingResolver {
    pub fn new(provider: Option<Arc<dyn DocumentSearch>>, category: Category, max_results: usize) -> Self {
        Self {
            provider,
            category,
            max_results: max_results.max(1),
        }
    }

    pub async fn resolve_reading_resources(
        &self,
        topic: &str,
        subtopic: &SubtopicSpec,
    ) -> Outcome<Vec<ReadingResource>> {
        let fallback = || template_resources(topic, subtopic, self.category, self.max_results);

        let Some(provider) = &self.provider else {
            return Outcome::Degraded(fallback(), ProviderError::NotConfigured);
        };

        let query = format!("{topic} {} guide", subtopic.title);
        match provider.search(&query, self.max_results * 2).await {
            Ok(hits) => {
                let resources: Vec<ReadingResource> = dedupe_hits(hits)
                    .into_iter()
                    .take(self.max_results)
                    .map(to_resource)
                    .collect();
                if resources.is_empty() {
                    counter!("reading_fallback_total").increment(1);
                    Outcome::Degraded(
                        fallback(),
                        ProviderError::Unavailable("no documents found".to_string()),
                    )
                } else {
                    Outcome::Ok(resources)
                }
            }
            Err(e) => {
                warn!(target: "reading", provider = provider.name(), error = %e, "document search failed, using templates");
                counter!("reading_fallback_total").increment(1);
                Outcome::Degraded(fallback(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, url: &str) -> DocumentHit {
        DocumentHit {
            title: title.into(),
            url: url.into(),
            source: String::new(),
            snippet: "word ".repeat(300),
        }
    }

    #[test]
    fn every_category_has_templates() {
        let sub = SubtopicSpec {
            order: 1,
            title: "State & Props".into(),
            description: String::new(),
            key_points: vec![],
            estimated_duration_minutes: 20,
        };
        for c in Category::ALL {
            let r = template_resources("React", &sub, c, 3);
            assert!(!r.is_empty(), "{c}");
            assert!(r.iter().all(|x| !x.url.contains("{q}") && !x.url.contains(' ')));
        }
        let web = template_resources("React", &sub, Category::Web, 3);
        assert!(web[0].url.ends_with("React+State+%26+Props"));
    }

    #[test]
    fn dedupes_urls_and_similar_titles() {
        let out = dedupe_hits(vec![
            hit("Understanding React Hooks", "https://a.com/x"),
            hit("Other", "https://a.com/x/"),
            hit("Understanding React Hooks!", "https://b.com/y"),
            hit("Something different", "https://c.com/z"),
        ]);
        let titles: Vec<_> = out.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["Understanding React Hooks", "Something different"]);
    }

    #[test]
    fn hit_becomes_resource_with_label() {
        let r = to_resource(hit("T", "https://x.org/a"));
        assert_eq!(r.source, "Web");
        assert_eq!(r.reading_time_label.as_deref(), Some("6 min read"));
        assert!(r.description.ends_with("..."));
    }
}
