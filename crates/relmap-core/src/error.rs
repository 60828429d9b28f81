//! Error types for relmap-core.
//!
//! Fatal conditions only: anything recoverable (out-of-vocabulary queries or
//! related terms) is reported through [`crate::diagnostics`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the semantic-relation ground-truth file.
#[derive(Debug, Error)]
pub enum RelationFileError {
    /// File missing or unreadable.
    #[error("failed to read relation file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A data row did not have exactly 5 comma-separated fields.
    #[error("relation file line {line}: expected 5 comma-separated fields, got {fields}")]
    MalformedRow { line: usize, fields: usize },
    /// Relation label outside the fixed QSYN/ANTI/HYP/DRV alphabet.
    #[error("relation file line {line}: unknown relation label '{label}'")]
    UnknownLabel { line: usize, label: String },
}

/// Errors raised while constructing a vocabulary mapping.
#[derive(Debug, Clone, Error)]
pub enum VocabularyError {
    /// The word list contained the same word twice; the mapping must be a bijection.
    #[error("duplicate word '{word}' in vocabulary")]
    DuplicateWord { word: String },
}

/// Errors raised by the ranking engine.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The grouping contained no query words; a mean over zero queries is undefined.
    #[error("no queries to evaluate")]
    NoQueries,
    /// The score matrix is not square.
    #[error("score matrix is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },
    /// Matrix dimension does not match the vocabulary cardinality.
    #[error("score matrix has dimension {matrix} but the vocabulary holds {vocabulary} words")]
    DimensionMismatch { matrix: usize, vocabulary: usize },
}
