//! Semantic-relation ground truth.
//!
//! The reference file lists word pairs connected by one of four linguistic
//! relations. [`RelationIndex::load`] parses it, optionally restricts it to a
//! target vocabulary, and groups related terms by relation kind and by query
//! word. The index is built once per run and is immutable afterwards.
//!
//! # File format
//!
//! UTF-8 text, comma-delimited, five columns:
//!
//! ```text
//! word1,pos1,word2,pos2,relation
//! chat,NN,chaton,NN,QSYN
//! ```
//!
//! The first line is a header and is always skipped. Part-of-speech columns
//! are read but not retained. A row with the wrong field count or an unknown
//! relation label is a fatal parse error.

use crate::diagnostics::{Diagnostic, MissingEndpoint};
use crate::error::RelationFileError;
use crate::vocab::Vocabulary;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One of the four linguistic relation kinds in the reference data.
///
/// The label alphabet is fixed; buckets for all four kinds (plus the
/// aggregate) are allocated up front rather than on first sight of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationKind {
    /// Near-synonymy (`QSYN`).
    Qsyn,
    /// Antonymy (`ANTI`).
    Anti,
    /// Hypernymy (`HYP`).
    Hyp,
    /// Morphological derivation (`DRV`).
    Drv,
}

impl RelationKind {
    /// All four kinds, in file-label order.
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Qsyn,
        RelationKind::Anti,
        RelationKind::Hyp,
        RelationKind::Drv,
    ];

    /// The label used in the reference file.
    pub fn label(self) -> &'static str {
        match self {
            RelationKind::Qsyn => "QSYN",
            RelationKind::Anti => "ANTI",
            RelationKind::Hyp => "HYP",
            RelationKind::Drv => "DRV",
        }
    }

    /// Parses a file label. Returns `None` for anything outside the alphabet.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "QSYN" => Some(RelationKind::Qsyn),
            "ANTI" => Some(RelationKind::Anti),
            "HYP" => Some(RelationKind::Hyp),
            "DRV" => Some(RelationKind::Drv),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed relation triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRecord {
    pub word1: String,
    pub word2: String,
    pub kind: RelationKind,
}

/// Query word → related terms, for a single relation kind.
///
/// Related terms keep file order and duplicates: a pair listed twice counts
/// twice during evaluation. Queries iterate in sorted order, which keeps
/// per-query report output deterministic; MAP itself is order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    queries: BTreeMap<String, Vec<String>>,
}

impl Grouping {
    fn add(&mut self, query: &str, related: &str) {
        self.queries
            .entry(query.to_string())
            .or_default()
            .push(related.to_string());
    }

    /// Related terms listed for `query`, in insertion order.
    pub fn related(&self, query: &str) -> Option<&[String]> {
        self.queries.get(query).map(Vec::as_slice)
    }

    /// Iterates over `(query, related terms)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.queries
            .iter()
            .map(|(q, rs)| (q.as_str(), rs.as_slice()))
    }

    /// Number of distinct query words.
    pub fn num_queries(&self) -> usize {
        self.queries.len()
    }

    /// Total number of `(query, related)` pairs, duplicates included.
    pub fn num_pairs(&self) -> usize {
        self.queries.values().map(Vec::len).sum()
    }

    /// Returns true if the grouping holds no queries.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Ground-truth relations grouped by kind and by query word.
///
/// Holds one [`Grouping`] per [`RelationKind`] plus an aggregate grouping
/// covering every kept triple regardless of kind.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    by_kind: BTreeMap<RelationKind, Grouping>,
    all: Grouping,
}

impl RelationIndex {
    /// Loads and groups the reference file.
    ///
    /// When `target` is supplied, a triple is kept only if both endpoints are
    /// vocabulary members; each exclusion yields a
    /// [`Diagnostic::RelationExcluded`] naming the missing endpoint(s).
    /// Exclusion is not an error, and neither is an index that ends up empty:
    /// callers decide whether zero surviving relations is fatal.
    ///
    /// # Errors
    ///
    /// [`RelationFileError`] on an unreadable file, a row without exactly
    /// five fields, or a relation label outside the fixed alphabet.
    pub fn load(
        path: &Path,
        target: Option<&Vocabulary>,
    ) -> Result<(Self, Vec<Diagnostic>), RelationFileError> {
        let records = parse_relation_file(path)?;
        Ok(Self::from_records(&records, target))
    }

    /// Groups already-parsed records, applying the optional vocabulary filter.
    pub fn from_records(
        records: &[RelationRecord],
        target: Option<&Vocabulary>,
    ) -> (Self, Vec<Diagnostic>) {
        let mut index = Self::with_empty_buckets();
        let mut diagnostics = Vec::new();

        for record in records {
            if let Some(vocab) = target {
                let missing = match (vocab.contains(&record.word1), vocab.contains(&record.word2)) {
                    (true, true) => None,
                    (false, true) => Some(MissingEndpoint::First),
                    (true, false) => Some(MissingEndpoint::Second),
                    (false, false) => Some(MissingEndpoint::Both),
                };
                if let Some(missing) = missing {
                    let diag = Diagnostic::RelationExcluded {
                        word1: record.word1.clone(),
                        word2: record.word2.clone(),
                        missing,
                    };
                    diag.log();
                    diagnostics.push(diag);
                    continue;
                }
            }
            index.insert(record);
        }

        (index, diagnostics)
    }

    fn with_empty_buckets() -> Self {
        let mut by_kind = BTreeMap::new();
        for kind in RelationKind::ALL {
            by_kind.insert(kind, Grouping::default());
        }
        Self {
            by_kind,
            all: Grouping::default(),
        }
    }

    fn insert(&mut self, record: &RelationRecord) {
        // No self-relation guard: word1 == word2 is grouped like any triple.
        if let Some(bucket) = self.by_kind.get_mut(&record.kind) {
            bucket.add(&record.word1, &record.word2);
        }
        self.all.add(&record.word1, &record.word2);
    }

    /// The grouping for one relation kind.
    pub fn grouping(&self, kind: RelationKind) -> &Grouping {
        // Buckets for every kind exist from construction.
        &self.by_kind[&kind]
    }

    /// The aggregate grouping across all four kinds.
    pub fn all(&self) -> &Grouping {
        &self.all
    }

    /// Total `(query, related)` pairs kept, across all kinds.
    pub fn total_pairs(&self) -> usize {
        self.all.num_pairs()
    }
}

/// Parses the reference file into records, skipping the header line.
fn parse_relation_file(path: &Path) -> Result<Vec<RelationRecord>, RelationFileError> {
    let file = File::open(path).map_err(|source| RelationFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| RelationFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line_num = idx + 1;
        if line_num == 1 {
            // Header, skipped unconditionally.
            continue;
        }

        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() != 5 {
            return Err(RelationFileError::MalformedRow {
                line: line_num,
                fields: fields.len(),
            });
        }

        let kind = RelationKind::from_label(fields[4]).ok_or_else(|| {
            RelationFileError::UnknownLabel {
                line: line_num,
                label: fields[4].to_string(),
            }
        })?;

        records.push(RelationRecord {
            word1: fields[0].to_string(),
            word2: fields[2].to_string(),
            kind,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_relation_file(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "word1,pos1,word2,pos2,relation").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    fn vocab(words: &[&str]) -> Vocabulary {
        Vocabulary::from_words(words.iter().copied()).unwrap()
    }

    #[test]
    fn test_load_without_filter_keeps_everything() {
        let file = write_relation_file(&[
            "cat,NN,dog,NN,QSYN",
            "cat,NN,kitten,NN,DRV",
            "hot,JJ,cold,JJ,ANTI",
        ]);
        let (index, diagnostics) = RelationIndex::load(file.path(), None).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(index.total_pairs(), 3);
        assert_eq!(
            index.grouping(RelationKind::Qsyn).related("cat"),
            Some(&["dog".to_string()][..])
        );
        assert_eq!(
            index.grouping(RelationKind::Drv).related("cat"),
            Some(&["kitten".to_string()][..])
        );
        assert_eq!(
            index.all().related("cat"),
            Some(&["dog".to_string(), "kitten".to_string()][..])
        );
    }

    #[test]
    fn test_aggregate_is_union_of_kind_buckets() {
        let file = write_relation_file(&[
            "cat,NN,dog,NN,QSYN",
            "cat,NN,animal,NN,HYP",
            "dog,NN,wolf,NN,HYP",
        ]);
        let (index, _) = RelationIndex::load(file.path(), None).unwrap();

        for (query, related) in index.all().iter() {
            let mut from_kinds: Vec<&String> = Vec::new();
            for kind in RelationKind::ALL {
                if let Some(rs) = index.grouping(kind).related(query) {
                    from_kinds.extend(rs);
                }
            }
            let mut expected: Vec<&String> = related.iter().collect();
            from_kinds.sort();
            expected.sort();
            assert_eq!(from_kinds, expected, "aggregate mismatch for '{}'", query);
        }
    }

    #[test]
    fn test_filter_drops_relations_with_missing_endpoints() {
        // Scenario A: kitten is outside the vocabulary.
        let file = write_relation_file(&["cat,NN,dog,NN,QSYN", "cat,NN,kitten,NN,QSYN"]);
        let target = vocab(&["cat", "dog"]);
        let (index, diagnostics) = RelationIndex::load(file.path(), Some(&target)).unwrap();

        assert_eq!(index.total_pairs(), 1);
        assert_eq!(
            index.grouping(RelationKind::Qsyn).related("cat"),
            Some(&["dog".to_string()][..])
        );
        assert_eq!(index.all().related("cat"), Some(&["dog".to_string()][..]));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::RelationExcluded {
                word1: "cat".to_string(),
                word2: "kitten".to_string(),
                missing: MissingEndpoint::Second,
            }]
        );
    }

    #[test]
    fn test_filter_reports_which_endpoints_are_missing() {
        let file = write_relation_file(&[
            "ghost,NN,dog,NN,QSYN",
            "cat,NN,ghost,NN,QSYN",
            "ghost,NN,phantom,NN,QSYN",
        ]);
        let target = vocab(&["cat", "dog"]);
        let (index, diagnostics) = RelationIndex::load(file.path(), Some(&target)).unwrap();

        assert_eq!(index.total_pairs(), 0);
        let missing: Vec<MissingEndpoint> = diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::RelationExcluded { missing, .. } => *missing,
                other => panic!("unexpected diagnostic {:?}", other),
            })
            .collect();
        assert_eq!(
            missing,
            vec![
                MissingEndpoint::First,
                MissingEndpoint::Second,
                MissingEndpoint::Both
            ]
        );
    }

    #[test]
    fn test_duplicate_pairs_are_preserved() {
        let file = write_relation_file(&["cat,NN,dog,NN,QSYN", "cat,NN,dog,NN,QSYN"]);
        let target = vocab(&["cat", "dog"]);
        let (index, _) = RelationIndex::load(file.path(), Some(&target)).unwrap();

        assert_eq!(
            index.all().related("cat"),
            Some(&["dog".to_string(), "dog".to_string()][..])
        );
        assert_eq!(index.total_pairs(), 2);
    }

    #[test]
    fn test_self_relation_is_kept() {
        let file = write_relation_file(&["cat,NN,cat,NN,DRV"]);
        let (index, _) = RelationIndex::load(file.path(), None).unwrap();
        assert_eq!(
            index.grouping(RelationKind::Drv).related("cat"),
            Some(&["cat".to_string()][..])
        );
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let file = write_relation_file(&["cat,NN,dog,NN,QSYN", "cat,dog,QSYN"]);
        let err = RelationIndex::load(file.path(), None).unwrap_err();
        assert!(
            matches!(err, RelationFileError::MalformedRow { line: 3, fields: 3 }),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn test_unknown_label_is_fatal() {
        let file = write_relation_file(&["cat,NN,dog,NN,SYN2"]);
        let err = RelationIndex::load(file.path(), None).unwrap_err();
        assert!(matches!(err, RelationFileError::UnknownLabel { line: 2, ref label } if label == "SYN2"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = RelationIndex::load(Path::new("does/not/exist.csv"), None).unwrap_err();
        assert!(matches!(err, RelationFileError::Io { .. }));
    }

    #[test]
    fn test_header_only_file_yields_empty_index() {
        let file = write_relation_file(&[]);
        let (index, diagnostics) = RelationIndex::load(file.path(), None).unwrap();
        assert_eq!(index.total_pairs(), 0);
        assert!(diagnostics.is_empty());
        assert!(index.all().is_empty());
    }

    #[test]
    fn test_relation_kind_labels_round_trip() {
        for kind in RelationKind::ALL {
            assert_eq!(RelationKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(RelationKind::from_label("TOUTES"), None);
    }
}
