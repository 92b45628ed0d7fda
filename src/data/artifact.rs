use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::data::Catalog;
use crate::error::{AppError, AppResult};
use crate::services::similarity::{Precision, SimilarityMatrix};

/// Precomputed similarity matrix keyed by movie identifier
///
/// `scores[a][b]` is the similarity between `movie_ids[a]` and `movie_ids[b]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityArtifact {
    pub created_at: DateTime<Utc>,
    pub precision: Precision,
    pub movie_ids: Vec<u64>,
    pub scores: Vec<Vec<f64>>,
}

impl SimilarityArtifact {
    /// Captures a matrix built for `catalog`; every movie needs an identifier
    pub fn from_matrix(catalog: &Catalog, matrix: &SimilarityMatrix) -> AppResult<Self> {
        if catalog.len() != matrix.size() {
            return Err(AppError::ArtifactMismatch(format!(
                "catalog has {} movies but matrix has {} rows",
                catalog.len(),
                matrix.size()
            )));
        }

        let movie_ids = catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(index, movie)| {
                movie.id.ok_or_else(|| {
                    AppError::ArtifactMismatch(format!("movie at row {} has no movieId", index))
                })
            })
            .collect::<AppResult<Vec<u64>>>()?;
        ensure_unique(&movie_ids)?;

        Ok(Self {
            created_at: Utc::now(),
            precision: matrix.precision(),
            movie_ids,
            scores: matrix.to_rows(),
        })
    }

    pub fn read_from<R: Read>(reader: R) -> AppResult<Self> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> AppResult<()> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_from(file)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_to(file)
    }

    /// Re-keys the stored scores onto the catalog's row positions
    ///
    /// Fails when a catalog movie has no identifier or is missing from the artifact.
    pub fn into_matrix(self, catalog: &Catalog) -> AppResult<SimilarityMatrix> {
        let size = self.movie_ids.len();
        if self.scores.len() != size || self.scores.iter().any(|row| row.len() != size) {
            return Err(AppError::ArtifactMismatch(format!(
                "score table is not {}x{}",
                size, size
            )));
        }

        ensure_unique(&self.movie_ids)?;
        let positions: HashMap<u64, usize> = self
            .movie_ids
            .iter()
            .enumerate()
            .map(|(position, &id)| (id, position))
            .collect();

        let rows_in_artifact = catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(index, movie)| {
                let id = movie.id.ok_or_else(|| {
                    AppError::ArtifactMismatch(format!("movie at row {} has no movieId", index))
                })?;
                positions.get(&id).copied().ok_or_else(|| {
                    AppError::ArtifactMismatch(format!("movieId {} is not in the artifact", id))
                })
            })
            .collect::<AppResult<Vec<usize>>>()?;

        let rows: Vec<Vec<f64>> = rows_in_artifact
            .iter()
            .map(|&a| rows_in_artifact.iter().map(|&b| self.scores[a][b]).collect())
            .collect();

        SimilarityMatrix::from_rows(&rows, self.precision)
    }
}

/// Each id must key exactly one row
fn ensure_unique(movie_ids: &[u64]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(movie_ids.len());
    match movie_ids.iter().find(|&&id| !seen.insert(id)) {
        Some(id) => Err(AppError::ArtifactMismatch(format!(
            "movieId {} appears more than once",
            id
        ))),
        None => Ok(()),
    }
}
