// src/telemetry.rs
//! Tracing bootstrap and one-time metrics registration.

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_JSON: &str = "COURSE_LOG_JSON";

/// Install a global subscriber. Honors `RUST_LOG`; `COURSE_LOG_JSON=1` switches to JSON lines.
/// Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("course_forge=info,warn"));
    let json = std::env::var(ENV_LOG_JSON).ok().as_deref() == Some("1");

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// One-time metrics registration (so series carry descriptions once a recorder exists).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("course_generation_runs_total", "Generation runs started.");
        describe_counter!(
            "course_generation_failures_total",
            "Generation runs rejected (invalid input)."
        );
        describe_histogram!("course_generation_ms", "End-to-end generation time in milliseconds.");
        describe_counter!("outline_fallback_total", "Outlines produced by the template path.");
        describe_counter!("media_queries_total", "Media search queries issued.");
        describe_counter!("media_query_errors_total", "Media search queries that failed.");
        describe_counter!("reading_fallback_total", "Reading lists produced by templates after a provider miss.");
        describe_counter!(
            "pipeline_degradations_total",
            "Component results that fell back to a degraded path."
        );
    });
}
