//! Structured diagnostics for recoverable degradation.
//!
//! Out-of-vocabulary words never abort an evaluation; they lower the score
//! and produce one of these records. Records are returned to the caller so
//! tests and reports can inspect them directly, and each one is also surfaced
//! through `tracing::warn!`.

use serde::Serialize;
use tracing::warn;

/// Which endpoint(s) of a relation triple were missing from the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingEndpoint {
    First,
    Second,
    Both,
}

/// A recoverable warning produced while loading relations or computing MAP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A relation triple was dropped because an endpoint is outside the
    /// target vocabulary.
    RelationExcluded {
        word1: String,
        word2: String,
        missing: MissingEndpoint,
    },
    /// A query word has no identifier; its Average Precision is 0.
    QueryOutOfVocabulary { query: String },
    /// A related word has no identifier; it contributes no rank but still
    /// counts toward the query's denominator.
    RelatedOutOfVocabulary { query: String, related: String },
}

impl Diagnostic {
    /// Logs the diagnostic at WARN level.
    pub(crate) fn log(&self) {
        match self {
            Diagnostic::RelationExcluded {
                word1,
                word2,
                missing,
            } => {
                let which = match missing {
                    MissingEndpoint::First => "first word is not a target word",
                    MissingEndpoint::Second => "second word is not a target word",
                    MissingEndpoint::Both => "both words are not target words",
                };
                warn!(word1 = %word1, word2 = %word2, "relation excluded: {}", which);
            }
            Diagnostic::QueryOutOfVocabulary { query } => {
                warn!(query = %query, "query not in vocabulary, AP treated as 0");
            }
            Diagnostic::RelatedOutOfVocabulary { query, related } => {
                warn!(
                    query = %query,
                    related = %related,
                    "related word not in vocabulary, dropped from ranking"
                );
            }
        }
    }
}
