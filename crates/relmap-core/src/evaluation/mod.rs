//! Evaluation of a model against grouped semantic relations.
//!
//! [`mean_average_precision`] is the scoring entry point: one call per
//! relation kind, returning the kind's MAP together with per-query Average
//! Precision values and the diagnostics collected along the way. The
//! [`stats`] module compares two configurations on those per-query scores.
//!
//! # Example
//!
//! ```ignore
//! let (index, _) = RelationIndex::load(path, Some(&vocab))?;
//! let mut matrix = ScoreMatrix::new(distances, ScoreKind::Distance)?;
//! let outcome = mean_average_precision(&mut matrix, index.all(), &vocab)?;
//! println!("MAP = {:.4}", outcome.map);
//! ```

pub mod metrics;
pub mod stats;

pub use metrics::{mean_average_precision, KindEvaluation, QueryAp};
pub use stats::{bootstrap_ci, cohens_d, paired_ttest, BootstrapResult, TTestResult};
