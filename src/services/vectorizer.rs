use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};
use crate::services::stopwords::StopWords;

/// Tokens are runs of two or more word characters
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex")
});

/// Bag-of-words vectors for a corpus of tag strings
///
/// Rows are stored sparsely as `(column, count)` pairs sorted by column.
/// Columns index into `vocabulary`, which is sorted alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub struct TagVectors {
    vocabulary: Vec<String>,
    rows: Vec<Vec<(usize, u32)>>,
}

impl TagVectors {
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-zero entries of a row
    pub fn sparse_row(&self, index: usize) -> Option<&[(usize, u32)]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Fixed-length count vector over the whole vocabulary
    pub fn dense_row(&self, index: usize) -> Option<Vec<u32>> {
        let row = self.rows.get(index)?;
        let mut dense = vec![0; self.vocabulary.len()];
        for &(column, count) in row {
            dense[column] = count;
        }
        Some(dense)
    }
}

/// Counts vocabulary tokens per document
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    stop_words: StopWords,
    max_features: Option<usize>,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountVectorizer {
    /// English stop words, no vocabulary cap
    pub fn new() -> Self {
        Self {
            stop_words: StopWords::english(),
            max_features: None,
        }
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Keep only the `max_features` tokens with the highest corpus count
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Lowercased tokens of a document with stop words removed
    pub fn tokenize(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    /// Learns the vocabulary from `documents` and returns their count vectors
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> AppResult<TagVectors> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.tokenize(doc.as_ref()))
            .collect();

        let vocabulary = self.build_vocabulary(&tokenized);
        if vocabulary.is_empty() {
            return Err(AppError::EmptyVocabulary);
        }

        let columns: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(column, token)| (token.as_str(), column))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in tokens {
                    if let Some(&column) = columns.get(token.as_str()) {
                        *counts.entry(column).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "Vectorized tag strings"
        );

        Ok(TagVectors { vocabulary, rows })
    }

    fn build_vocabulary(&self, tokenized: &[Vec<String>]) -> Vec<String> {
        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        for token in tokenized.iter().flatten() {
            *term_counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut terms: Vec<(&str, usize)> = term_counts.into_iter().collect();
        // Highest count first, ties alphabetical
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        if let Some(max_features) = self.max_features {
            terms.truncate(max_features);
        }

        let mut vocabulary: Vec<String> = terms.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();
        vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_genre_separators() {
        let vectorizer = CountVectorizer::new();
        assert_eq!(
            vectorizer.tokenize("Action|Sci-Fi|Film-Noir"),
            vec!["action", "sci", "fi", "film", "noir"]
        );
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_single_chars() {
        let vectorizer = CountVectorizer::new();
        assert_eq!(
            vectorizer.tokenize("(no genres listed) a"),
            vec!["genres", "listed"]
        );
    }

    #[test]
    fn test_fit_transform_counts_tokens() {
        let docs = ["Comedy|Romance", "Comedy", "Drama|Comedy|Drama"];
        let vectors = CountVectorizer::new().fit_transform(&docs).unwrap();

        assert_eq!(vectors.vocabulary(), &["comedy", "drama", "romance"]);
        assert_eq!(vectors.dense_row(0).unwrap(), vec![1, 0, 1]);
        assert_eq!(vectors.dense_row(1).unwrap(), vec![1, 0, 0]);
        assert_eq!(vectors.dense_row(2).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_missing_tags_give_zero_vector() {
        let docs = ["Comedy", ""];
        let vectors = CountVectorizer::new().fit_transform(&docs).unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.sparse_row(1).unwrap().is_empty());
        assert_eq!(vectors.dense_row(1).unwrap(), vec![0]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let docs = ["Drama|Comedy", "Drama|Thriller", "Drama|Comedy|Horror"];
        let vectors = CountVectorizer::new()
            .with_max_features(Some(2))
            .fit_transform(&docs)
            .unwrap();

        assert_eq!(vectors.vocabulary(), &["comedy", "drama"]);
        assert_eq!(vectors.dense_row(1).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_max_features_ties_break_alphabetically() {
        let docs = ["Western", "Horror", "Animation"];
        let vectors = CountVectorizer::new()
            .with_max_features(Some(2))
            .fit_transform(&docs)
            .unwrap();
        assert_eq!(vectors.vocabulary(), &["animation", "horror"]);
    }

    #[test]
    fn test_only_stop_words_is_empty_vocabulary() {
        let docs = ["the", "", "and of"];
        let result = CountVectorizer::new().fit_transform(&docs);
        assert!(matches!(result, Err(AppError::EmptyVocabulary)));
    }

    #[test]
    fn test_no_documents_is_empty_vocabulary() {
        let docs: [&str; 0] = [];
        let result = CountVectorizer::new().fit_transform(&docs);
        assert!(matches!(result, Err(AppError::EmptyVocabulary)));
    }

    #[test]
    fn test_fit_transform_is_deterministic() {
        let docs = ["Adventure|Animation|Children", "Adventure|Fantasy", "Comedy|Romance"];
        let vectorizer = CountVectorizer::new();
        assert_eq!(
            vectorizer.fit_transform(&docs).unwrap(),
            vectorizer.fit_transform(&docs).unwrap()
        );
    }
}
