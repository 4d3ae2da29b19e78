//! Error taxonomy for the build pipeline.
//!
//! Only unusable input and missing models abort a build. Everything else
//! (odd parse shapes, unclassifiable mentions) degrades the graph and is
//! reported through `_metadata.warnings`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    /// Empty or whitespace-only input text.
    #[error("input text is empty")]
    EmptyInput,

    /// A required model (tagger, parser) was not supplied.
    #[error("required model is missing: {0}")]
    MissingModel(&'static str),

    /// The assembled graph could not be serialized. The builder constructs
    /// acyclic node sets, so this indicates a bug rather than bad input.
    #[error("graph serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BuildError {
    /// Stable machine-readable kind for callers that match on failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::EmptyInput => "input",
            BuildError::MissingModel(_) => "model",
            BuildError::Serialization(_) => "serialization",
        }
    }
}

/// A non-fatal condition attached to `_metadata.warnings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// The parser returned an unusual tree (no root, cycle); the build
    /// downgraded to a provenance-only graph.
    ParseShape { detail: String },
    /// An extractor skipped a node it could not complete (entity with no
    /// classifiable head, role with no bearer).
    Extraction { detail: String },
}

impl BuildWarning {
    pub fn parse_shape(detail: impl Into<String>) -> Self {
        BuildWarning::ParseShape {
            detail: detail.into(),
        }
    }

    pub fn extraction(detail: impl Into<String>) -> Self {
        BuildWarning::Extraction {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BuildWarning::ParseShape { .. } => "parse_shape",
            BuildWarning::Extraction { .. } => "extraction",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            BuildWarning::ParseShape { detail } => detail,
            BuildWarning::Extraction { detail } => detail,
        }
    }
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.detail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(BuildError::EmptyInput.kind(), "input");
        assert_eq!(BuildError::MissingModel("tagger").kind(), "model");
    }

    #[test]
    fn warning_display_includes_kind() {
        let w = BuildWarning::extraction("role without bearer skipped");
        assert_eq!(w.to_string(), "extraction: role without bearer skipped");
    }
}
