use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::vectorizer::TagVectors;

/// Storage precision of similarity scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// 32-bit floats, half the memory of the default
    #[serde(rename = "f32")]
    Single,
    #[default]
    #[serde(rename = "f64")]
    Double,
}

#[derive(Debug, Clone, PartialEq)]
enum Scores {
    Single(Vec<f32>),
    Double(Vec<f64>),
}

/// Dense all-pairs cosine similarity matrix, indexed by catalog row position
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Scores,
}

impl SimilarityMatrix {
    /// Cosine similarity of every pair of tag vectors
    ///
    /// Rows with an all-zero vector score 0 against everything, themselves included.
    /// Every other diagonal entry is exactly 1.
    pub fn from_vectors(vectors: &TagVectors, precision: Precision) -> Self {
        let size = vectors.len();
        let normalized: Vec<Vec<(usize, f64)>> = (0..size)
            .map(|i| normalize(vectors.sparse_row(i).unwrap_or_default()))
            .collect();

        let mut matrix = Self::zeros(size, precision);
        for i in 0..size {
            if normalized[i].is_empty() {
                continue;
            }
            matrix.set(i, i, 1.0);
            for j in (i + 1)..size {
                let score = sparse_dot(&normalized[i], &normalized[j]).clamp(-1.0, 1.0);
                matrix.set(i, j, score);
                matrix.set(j, i, score);
            }
        }
        matrix
    }

    /// Builds a matrix from row-major scores, validating its shape
    pub fn from_rows(rows: &[Vec<f64>], precision: Precision) -> AppResult<Self> {
        let size = rows.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(AppError::ArtifactMismatch(format!(
                "row {} has {} scores, expected {}",
                index,
                row.len(),
                size
            )));
        }

        let mut matrix = Self::zeros(size, precision);
        for (i, row) in rows.iter().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                matrix.set(i, j, score);
            }
        }
        Ok(matrix)
    }

    fn zeros(size: usize, precision: Precision) -> Self {
        let scores = match precision {
            Precision::Single => Scores::Single(vec![0.0; size * size]),
            Precision::Double => Scores::Double(vec![0.0; size * size]),
        };
        Self { size, scores }
    }

    fn set(&mut self, row: usize, column: usize, score: f64) {
        let offset = row * self.size + column;
        match &mut self.scores {
            Scores::Single(data) => data[offset] = score as f32,
            Scores::Double(data) => data[offset] = score,
        }
    }

    /// Number of movies (rows and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn precision(&self) -> Precision {
        match self.scores {
            Scores::Single(_) => Precision::Single,
            Scores::Double(_) => Precision::Double,
        }
    }

    /// Score between two movies, `None` when either index is out of range
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.size || column >= self.size {
            return None;
        }
        let offset = row * self.size + column;
        Some(match &self.scores {
            Scores::Single(data) => f64::from(data[offset]),
            Scores::Double(data) => data[offset],
        })
    }

    /// `(column, score)` pairs of one row in column order
    pub fn row(&self, row: usize) -> Option<Vec<(usize, f64)>> {
        if row >= self.size {
            return None;
        }
        let start = row * self.size;
        let range = start..start + self.size;
        let scores = match &self.scores {
            Scores::Single(data) => data[range].iter().map(|&s| f64::from(s)).collect::<Vec<_>>(),
            Scores::Double(data) => data[range].to_vec(),
        };
        Some(scores.into_iter().enumerate().collect())
    }

    /// Row-major copy of every score
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size)
            .map(|i| {
                self.row(i)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(_, score)| score)
                    .collect()
            })
            .collect()
    }
}

fn normalize(row: &[(usize, u32)]) -> Vec<(usize, f64)> {
    let norm = row
        .iter()
        .map(|&(_, count)| f64::from(count) * f64::from(count))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return Vec::new();
    }
    row.iter()
        .map(|&(column, count)| (column, f64::from(count) / norm))
        .collect()
}

/// Dot product of two rows sorted by column
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vectorizer::CountVectorizer;

    fn matrix_for(docs: &[&str], precision: Precision) -> SimilarityMatrix {
        let vectors = CountVectorizer::new().fit_transform(docs).unwrap();
        SimilarityMatrix::from_vectors(&vectors, precision)
    }

    #[test]
    fn test_cosine_of_partial_overlap() {
        let matrix = matrix_for(&["Comedy|Romance", "Comedy", "Horror"], Precision::Double);
        let expected = 1.0 / 2f64.sqrt();
        assert!((matrix.get(0, 1).unwrap() - expected).abs() < 1e-12);
        assert_eq!(matrix.get(0, 2), Some(0.0));
        assert_eq!(matrix.get(1, 2), Some(0.0));
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let docs = ["Adventure|Animation|Children", "Adventure|Children|Fantasy", "Comedy|Romance", "Drama"];
        let matrix = matrix_for(&docs, Precision::Double);
        for i in 0..docs.len() {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in 0..docs.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_self_similarity_is_row_maximum() {
        let docs = ["Action|Crime|Thriller", "Action|Crime|Thriller", "Crime", "Drama|Crime"];
        let matrix = matrix_for(&docs, Precision::Single);
        for i in 0..docs.len() {
            let diagonal = matrix.get(i, i).unwrap();
            for (_, score) in matrix.row(i).unwrap() {
                assert!(score <= diagonal);
            }
        }
    }

    #[test]
    fn test_zero_vector_row_is_all_zero() {
        let matrix = matrix_for(&["Comedy", "", "Comedy|Drama"], Precision::Double);
        let row = matrix.row(1).unwrap();
        assert!(row.iter().all(|&(_, score)| score == 0.0));
    }

    #[test]
    fn test_single_precision_storage() {
        let matrix = matrix_for(&["Comedy|Romance", "Comedy"], Precision::Single);
        assert_eq!(matrix.precision(), Precision::Single);
        let expected = 1.0 / 2f64.sqrt();
        assert!((matrix.get(0, 1).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_lookups() {
        let matrix = matrix_for(&["Comedy", "Drama"], Precision::Double);
        assert_eq!(matrix.get(2, 0), None);
        assert!(matrix.row(5).is_none());
    }

    #[test]
    fn test_from_rows_round_trips_scores() {
        let matrix = matrix_for(&["Comedy|Romance", "Comedy", "Romance"], Precision::Double);
        let rebuilt = SimilarityMatrix::from_rows(&matrix.to_rows(), Precision::Double).unwrap();
        assert_eq!(rebuilt, matrix);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![vec![1.0, 0.5], vec![0.5]];
        let result = SimilarityMatrix::from_rows(&rows, Precision::Double);
        assert!(matches!(result, Err(AppError::ArtifactMismatch(_))));
    }

    #[test]
    fn test_build_is_deterministic() {
        let docs = ["Adventure|Animation", "Adventure|Fantasy", "Animation|Fantasy|Musical"];
        assert_eq!(
            matrix_for(&docs, Precision::Double),
            matrix_for(&docs, Precision::Double)
        );
    }

    #[test]
    fn test_precision_serde_names() {
        assert_eq!(serde_json::to_string(&Precision::Single).unwrap(), "\"f32\"");
        let parsed: Precision = serde_json::from_str("\"f64\"").unwrap();
        assert_eq!(parsed, Precision::Double);
    }
}
