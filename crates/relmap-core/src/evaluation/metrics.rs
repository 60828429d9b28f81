//! Mean Average Precision over a ranked candidate set.
//!
//! For each query word, every vocabulary word is ranked by its score against
//! the query, and the ranks of the listed related words determine the query's
//! Average Precision. MAP for a relation kind is the arithmetic mean of AP
//! over its queries.
//!
//! Out-of-vocabulary words degrade the score instead of aborting: a missing
//! query contributes AP = 0, and a missing related word contributes no rank
//! while still counting toward the query's denominator. The denominator is
//! deliberately the *listed* related-term count, not the found count — see
//! [`average_precision`].

use crate::diagnostics::Diagnostic;
use crate::error::EvalError;
use crate::matrix::ScoreMatrix;
use crate::relations::Grouping;
use crate::vocab::Vocabulary;
use serde::Serialize;

/// Average Precision for one query word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAp {
    pub query: String,
    pub ap: f64,
}

/// Result of evaluating one relation kind.
#[derive(Debug, Clone, Serialize)]
pub struct KindEvaluation {
    /// Mean of `per_query` AP values.
    pub map: f64,
    /// One entry per query word in the grouping, zeros included.
    pub per_query: Vec<QueryAp>,
    /// Out-of-vocabulary warnings collected during the pass.
    pub diagnostics: Vec<Diagnostic>,
}

impl KindEvaluation {
    /// Per-query AP values as a bare slice-friendly vector, for statistics.
    pub fn ap_values(&self) -> Vec<f64> {
        self.per_query.iter().map(|q| q.ap).collect()
    }
}

/// Computes Mean Average Precision for one relation kind.
///
/// Neutralizes the matrix diagonal first (idempotent, so reusing one matrix
/// across kinds is fine), then scores each query in the grouping. The
/// computation is fully deterministic given its inputs.
///
/// # Errors
///
/// - [`EvalError::DimensionMismatch`] if the matrix dimension differs from
///   the vocabulary cardinality.
/// - [`EvalError::NoQueries`] if the grouping is empty; a mean over zero
///   queries would be undefined, never a silent NaN.
pub fn mean_average_precision(
    matrix: &mut ScoreMatrix,
    grouping: &Grouping,
    vocab: &Vocabulary,
) -> Result<KindEvaluation, EvalError> {
    if matrix.n() != vocab.len() {
        return Err(EvalError::DimensionMismatch {
            matrix: matrix.n(),
            vocabulary: vocab.len(),
        });
    }
    if grouping.is_empty() {
        return Err(EvalError::NoQueries);
    }

    matrix.neutralize_diagonal();

    let mut per_query = Vec::with_capacity(grouping.num_queries());
    let mut diagnostics = Vec::new();

    for (query, related) in grouping.iter() {
        let Some(query_id) = vocab.id(query) else {
            let diag = Diagnostic::QueryOutOfVocabulary {
                query: query.to_string(),
            };
            diag.log();
            diagnostics.push(diag);
            per_query.push(QueryAp {
                query: query.to_string(),
                ap: 0.0,
            });
            continue;
        };

        let ranks = matrix.candidate_ranks(query_id);

        let mut found_ranks = Vec::with_capacity(related.len());
        for term in related {
            match vocab.id(term) {
                Some(term_id) => found_ranks.push(ranks[term_id]),
                None => {
                    let diag = Diagnostic::RelatedOutOfVocabulary {
                        query: query.to_string(),
                        related: term.clone(),
                    };
                    diag.log();
                    diagnostics.push(diag);
                }
            }
        }

        per_query.push(QueryAp {
            query: query.to_string(),
            ap: average_precision(&mut found_ranks, related.len()),
        });
    }

    let map = per_query.iter().map(|q| q.ap).sum::<f64>() / per_query.len() as f64;

    Ok(KindEvaluation {
        map,
        per_query,
        diagnostics,
    })
}

/// Average Precision from the ranks of found related terms.
///
/// `found_ranks` is sorted ascending in place; the k-th smallest rank
/// contributes `k / rank_k`. The sum is divided by `listed`, the number of
/// related terms originally listed for the query, so a related term that was
/// dropped as out-of-vocabulary lowers the score rather than leaving the
/// normalization. Returns 0 when no rank was found.
fn average_precision(found_ranks: &mut [usize], listed: usize) -> f64 {
    if found_ranks.is_empty() || listed == 0 {
        return 0.0;
    }
    found_ranks.sort_unstable();
    let precision_sum: f64 = found_ranks
        .iter()
        .enumerate()
        .map(|(i, &rank)| (i + 1) as f64 / rank as f64)
        .sum();
    precision_sum / listed as f64
}
