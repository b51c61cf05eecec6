// src/error.rs
//! Error taxonomy for the generation pipeline.
//!
//! - `PipelineError` is the only error a caller of `generate` can observe.
//! - `ProviderError` is what provider adapters return; it never escapes a component.
//! - `Outcome<T>` carries a usable value together with an optional degradation reason,
//!   so the aggregator can report fallbacks uniformly.

use thiserror::Error;

/// Result type for top-level pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a generation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Empty/blank topic or nonsensical options.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failure of an external collaborator (structure, media or document provider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No credential configured for an optional provider.
    #[error("provider not configured")]
    NotConfigured,

    /// Network failure, non-2xx status, quota exhaustion or timeout.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Payload could not be parsed into the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured => "not_configured",
            ProviderError::Unavailable(_) => "unavailable",
            ProviderError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else {
            ProviderError::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::Malformed(e.to_string())
    }
}

/// A value produced either by the primary path or by a fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded(T, ProviderError),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok(v) | Outcome::Degraded(v, _) => v,
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (T, Option<ProviderError>) {
        match self {
            Outcome::Ok(v) => (v, None),
            Outcome::Degraded(v, reason) => (v, Some(reason)),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(..))
    }

    pub fn reason(&self) -> Option<&ProviderError> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded(_, r) => Some(r),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::Degraded(v, r) => Outcome::Degraded(f(v), r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_parts_and_map() {
        let ok: Outcome<u32> = Outcome::Ok(2);
        assert!(!ok.is_degraded());
        assert_eq!(ok.map(|v| v * 2).into_parts(), (4, None));

        let d = Outcome::Degraded(1u32, ProviderError::NotConfigured);
        assert!(d.is_degraded());
        assert_eq!(d.reason().map(ProviderError::kind), Some("not_configured"));
        assert_eq!(d.into_value(), 1);
    }
}
