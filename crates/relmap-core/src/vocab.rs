//! Word to identifier mapping.
//!
//! The vocabulary is produced by whatever built the model (cooccurrence
//! pipeline, embedding trainer) and is read-only here. Identifiers are dense
//! and contiguous so they can index rows and columns of a
//! [`crate::matrix::ScoreMatrix`] directly.

use crate::error::VocabularyError;
use std::collections::HashMap;

/// Bijection from word to a dense identifier in `[0, N)`.
///
/// Word order in the source list determines identifiers: the first word gets
/// id 0, the second id 1, and so on. A repeated word is rejected because the
/// reverse direction of the mapping would be ambiguous.
///
/// # Examples
///
/// ```
/// use relmap_core::Vocabulary;
///
/// let vocab = Vocabulary::from_words(["cat", "dog"]).unwrap();
/// assert_eq!(vocab.id("dog"), Some(1));
/// assert_eq!(vocab.word(0), Some("cat"));
/// assert_eq!(vocab.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    word_to_id: HashMap<String, usize>,
    words: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from an ordered word list.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::DuplicateWord`] if a word appears twice.
    pub fn from_words<I, S>(words: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for word in words {
            let word = word.into();
            if vocab.word_to_id.contains_key(&word) {
                return Err(VocabularyError::DuplicateWord { word });
            }
            vocab.word_to_id.insert(word.clone(), vocab.words.len());
            vocab.words.push(word);
        }
        Ok(vocab)
    }

    /// Returns the identifier of `word`, if present.
    pub fn id(&self, word: &str) -> Option<usize> {
        self.word_to_id.get(word).copied()
    }

    /// Returns the word carrying identifier `id`, if in range.
    pub fn word(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    /// Returns true if `word` is part of the vocabulary.
    pub fn contains(&self, word: &str) -> bool {
        self.word_to_id.contains_key(word)
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over words in identifier order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
