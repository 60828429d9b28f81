//! Loaders for the model artifacts the evaluator consumes.
//!
//! Two files describe a model configuration:
//!
//! - a vocabulary file: UTF-8 text, one word per line, identifier = line
//!   index;
//! - a score matrix file: little-endian binary, a `u64` dimension header
//!   followed by `n * n` row-major `f64` values.

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use relmap_core::{ScoreKind, ScoreMatrix, Vocabulary};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Loads a vocabulary from a one-word-per-line text file.
///
/// Blank lines are rejected: they would silently shift every later
/// identifier.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let file = File::open(path)
        .with_context(|| format!("failed to open vocabulary file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut words = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let word = line.trim();
        if word.is_empty() {
            bail!(
                "vocabulary file {}: blank line at line {}",
                path.display(),
                idx + 1
            );
        }
        words.push(word.to_string());
    }

    Vocabulary::from_words(words)
        .with_context(|| format!("invalid vocabulary in {}", path.display()))
}

/// Loads a score matrix from the binary artifact format.
pub fn load_matrix(path: &Path, kind: ScoreKind) -> Result<ScoreMatrix> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open matrix file {}", path.display()))?;

    let mut header = [0u8; 8];
    file.read_exact(&mut header)
        .with_context(|| format!("matrix file {}: truncated header", path.display()))?;
    let n = u64::from_le_bytes(header) as usize;

    let mut values = Vec::with_capacity(n * n);
    let mut buf = [0u8; 8];
    for _ in 0..n * n {
        file.read_exact(&mut buf)
            .with_context(|| format!("matrix file {}: truncated data", path.display()))?;
        values.push(f64::from_le_bytes(buf));
    }

    // Trailing bytes mean the header and payload disagree.
    let mut rest = [0u8; 1];
    if file.read(&mut rest)? != 0 {
        bail!(
            "matrix file {}: trailing bytes after {}x{} values",
            path.display(),
            n,
            n
        );
    }

    let array = Array2::from_shape_vec((n, n), values)
        .with_context(|| format!("matrix file {}: shape error", path.display()))?;
    ScoreMatrix::new(array, kind).map_err(Into::into)
}
