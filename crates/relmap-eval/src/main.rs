//! Relmap evaluation tool.
//!
//! Scores one model configuration's word-word distance (or similarity)
//! matrix against semantic-relation reference data, reporting Mean Average
//! Precision per relation kind plus the all-kinds aggregate.
//!
//! # Usage
//!
//! ```bash
//! # Distance matrix
//! relmap-eval ref_FR.csv vocab.txt model.mat
//!
//! # Similarity matrix, JSON report
//! relmap-eval ref_FR.csv vocab.txt model.mat --similarity --json
//!
//! # Compare two configurations on the aggregate relation set
//! relmap-eval ref_FR.csv vocab.txt model_a.mat --compare model_b.mat
//! ```

mod inputs;

use anyhow::{bail, Result};
use clap::Parser;
use relmap_core::evaluation::{
    bootstrap_ci, cohens_d, mean_average_precision, paired_ttest, KindEvaluation, QueryAp,
};
use relmap_core::{RelationIndex, RelationKind, ScoreKind, ScoreMatrix, Vocabulary};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const BOOTSTRAP_RESAMPLES: usize = 1000;
const BOOTSTRAP_SEED: u64 = 42;

/// Evaluate a word-representation model against semantic-relation data.
#[derive(Parser, Debug)]
#[command(name = "relmap-eval", version, about)]
struct Args {
    /// Relation reference file (CSV: word1,pos1,word2,pos2,relation)
    reference: PathBuf,

    /// Vocabulary file (one word per line, id = line index)
    vocabulary: PathBuf,

    /// Score matrix file (binary: u64 dimension + n*n little-endian f64)
    matrix: PathBuf,

    /// Treat matrix entries as similarities (larger = closer) instead of distances
    #[arg(long)]
    similarity: bool,

    /// Second matrix to compare against, on the aggregate relation set
    #[arg(long)]
    compare: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,

    /// Include per-query Average Precision values in the report
    #[arg(long)]
    per_query: bool,

    /// Enable verbose logging (shows out-of-vocabulary warnings)
    #[arg(short, long)]
    verbose: bool,
}

// =============================================================================
// Report types
// =============================================================================

#[derive(Debug, Serialize)]
struct EvalReport {
    reference: ReferenceInfo,
    kinds: Vec<KindResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Comparison>,
}

#[derive(Debug, Serialize)]
struct ReferenceInfo {
    path: String,
    vocabulary_size: usize,
    relations_kept: usize,
    relations_excluded: usize,
}

#[derive(Debug, Serialize)]
struct KindResult {
    kind: String,
    queries: usize,
    pairs: usize,
    map: f64,
    ci_lower: f64,
    ci_upper: f64,
    oov_queries: usize,
    oov_related: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_query: Option<Vec<QueryAp>>,
}

#[derive(Debug, Serialize)]
struct Comparison {
    matrix_a: String,
    matrix_b: String,
    map_a: f64,
    map_b: f64,
    t_statistic: f64,
    p_value: f64,
    effect_size: f64,
    significant: bool,
}

// =============================================================================
// Evaluation
// =============================================================================

fn kind_result(
    name: &str,
    outcome: &KindEvaluation,
    queries: usize,
    pairs: usize,
    include_per_query: bool,
) -> KindResult {
    use relmap_core::Diagnostic;

    let ap = outcome.ap_values();
    let ci = bootstrap_ci(&ap, BOOTSTRAP_RESAMPLES, BOOTSTRAP_SEED);
    let oov_queries = outcome
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::QueryOutOfVocabulary { .. }))
        .count();
    let oov_related = outcome
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::RelatedOutOfVocabulary { .. }))
        .count();

    KindResult {
        kind: name.to_string(),
        queries,
        pairs,
        map: outcome.map,
        ci_lower: ci.lower,
        ci_upper: ci.upper,
        oov_queries,
        oov_related,
        per_query: include_per_query.then(|| outcome.per_query.clone()),
    }
}

fn evaluate_all_kinds(
    matrix: &mut ScoreMatrix,
    index: &RelationIndex,
    vocab: &Vocabulary,
    include_per_query: bool,
) -> Result<Vec<KindResult>> {
    let mut kinds = Vec::new();

    // Aggregate first; the same matrix instance then backs every per-kind
    // pass with its diagonal already neutralized.
    let all = index.all();
    let outcome = mean_average_precision(matrix, all, vocab)?;
    kinds.push(kind_result(
        "ALL",
        &outcome,
        all.num_queries(),
        all.num_pairs(),
        include_per_query,
    ));

    for kind in RelationKind::ALL {
        let grouping = index.grouping(kind);
        if grouping.is_empty() {
            continue;
        }
        let outcome = mean_average_precision(matrix, grouping, vocab)?;
        kinds.push(kind_result(
            kind.label(),
            &outcome,
            grouping.num_queries(),
            grouping.num_pairs(),
            include_per_query,
        ));
    }

    Ok(kinds)
}

fn compare_matrices(
    args: &Args,
    second_path: &PathBuf,
    index: &RelationIndex,
    vocab: &Vocabulary,
    kind: ScoreKind,
) -> Result<Comparison> {
    let mut matrix_a = inputs::load_matrix(&args.matrix, kind)?;
    let mut matrix_b = inputs::load_matrix(second_path, kind)?;

    let all = index.all();
    let outcome_a = mean_average_precision(&mut matrix_a, all, vocab)?;
    let outcome_b = mean_average_precision(&mut matrix_b, all, vocab)?;

    // Groupings iterate in a fixed order, so the two AP slices are paired
    // query by query.
    let ap_a = outcome_a.ap_values();
    let ap_b = outcome_b.ap_values();
    let ttest = paired_ttest(&ap_a, &ap_b);

    Ok(Comparison {
        matrix_a: args.matrix.display().to_string(),
        matrix_b: second_path.display().to_string(),
        map_a: outcome_a.map,
        map_b: outcome_b.map,
        t_statistic: ttest.t_statistic,
        p_value: ttest.p_value,
        effect_size: cohens_d(&ap_a, &ap_b),
        significant: ttest.is_significant(0.05),
    })
}

// =============================================================================
// Output
// =============================================================================

fn print_report(report: &EvalReport) {
    println!("\n{}", "=".repeat(72));
    println!("RELATION-BASED MODEL EVALUATION");
    println!("{}", "=".repeat(72));
    println!(
        "\nReference: {} ({} relations kept, {} excluded, vocabulary of {})",
        report.reference.path,
        report.reference.relations_kept,
        report.reference.relations_excluded,
        report.reference.vocabulary_size
    );

    println!(
        "\n{:<6} {:>8} {:>8} {:>8}  {:>19} {:>6} {:>6}",
        "Kind", "Queries", "Pairs", "MAP", "95% CI", "OOVq", "OOVr"
    );
    for kind in &report.kinds {
        println!(
            "{:<6} {:>8} {:>8} {:>8.4}  [{:>7.4}, {:>7.4}] {:>6} {:>6}",
            kind.kind,
            kind.queries,
            kind.pairs,
            kind.map,
            kind.ci_lower,
            kind.ci_upper,
            kind.oov_queries,
            kind.oov_related
        );
    }

    for kind in &report.kinds {
        if let Some(per_query) = &kind.per_query {
            println!("\n{}", "-".repeat(72));
            println!("PER-QUERY AP ({})", kind.kind);
            for entry in per_query {
                println!("  {:<24} {:.4}", entry.query, entry.ap);
            }
        }
    }

    if let Some(cmp) = &report.comparison {
        let sig = if cmp.significant { "*" } else { "" };
        println!("\n{}", "-".repeat(72));
        println!("COMPARISON ON AGGREGATE RELATIONS (* = p < 0.05)");
        println!("  A: {} (MAP {:.4})", cmp.matrix_a, cmp.map_a);
        println!("  B: {} (MAP {:.4})", cmp.matrix_b, cmp.map_b);
        println!(
            "  t={:.3}, p={:.4}{}, effect={:.3}",
            cmp.t_statistic, cmp.p_value, sig, cmp.effect_size
        );
    }

    println!("{}\n", "=".repeat(72));
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("error")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let kind = if args.similarity {
        ScoreKind::Similarity
    } else {
        ScoreKind::Distance
    };

    let vocab = inputs::load_vocabulary(&args.vocabulary)?;
    let mut matrix = inputs::load_matrix(&args.matrix, kind)?;

    let (index, load_diagnostics) = RelationIndex::load(&args.reference, Some(&vocab))?;
    if index.total_pairs() == 0 {
        bail!(
            "no relations extracted from {} (all filtered out or file empty)",
            args.reference.display()
        );
    }

    let kinds = evaluate_all_kinds(&mut matrix, &index, &vocab, args.per_query)?;

    let comparison = match &args.compare {
        Some(second) => Some(compare_matrices(&args, second, &index, &vocab, kind)?),
        None => None,
    };

    let report = EvalReport {
        reference: ReferenceInfo {
            path: args.reference.display().to_string(),
            vocabulary_size: vocab.len(),
            relations_kept: index.total_pairs(),
            relations_excluded: load_diagnostics.len(),
        },
        kinds,
        comparison,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
