//! # Relmap Core
//!
//! Library for scoring distributional word-representation models against
//! curated semantic relations.
//!
//! A model under evaluation is reduced to two artifacts: a [`Vocabulary`]
//! mapping each word to a dense identifier, and a square word-word
//! [`ScoreMatrix`] of distances or similarities indexed by those identifiers.
//! Ground-truth relations are loaded into a [`RelationIndex`], and
//! [`evaluation::mean_average_precision`] ranks every related word against
//! the full candidate set to produce one MAP value per relation kind.
//!
//! ## Modules
//!
//! - [`vocab`] - Word to identifier mapping
//! - [`relations`] - Semantic-relation ground truth (loading, filtering, grouping)
//! - [`matrix`] - Distance/similarity matrix with rank derivation
//! - [`evaluation`] - Average Precision, MAP, and comparison statistics
//! - [`diagnostics`] - Structured warnings for out-of-vocabulary degradation
//! - [`error`] - Error types

pub mod diagnostics;
pub mod error;
pub mod evaluation;
pub mod matrix;
pub mod relations;
pub mod vocab;

pub use diagnostics::Diagnostic;
pub use error::{EvalError, RelationFileError, VocabularyError};
pub use matrix::{ScoreKind, ScoreMatrix};
pub use relations::{Grouping, RelationIndex, RelationKind, RelationRecord};
pub use vocab::Vocabulary;
