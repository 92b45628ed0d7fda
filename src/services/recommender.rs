use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::{
    config::Config,
    data::{Catalog, SimilarityArtifact},
    error::{AppError, AppResult},
    models::Recommendation,
    services::{
        similarity::{Precision, SimilarityMatrix},
        vectorizer::CountVectorizer,
    },
};

/// Where the similarity matrix came from
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimilaritySource {
    /// Vectorized and scored at startup
    Computed { vocabulary_size: usize },
    /// Loaded from a precomputed artifact file
    Artifact { path: String },
}

/// Snapshot of what the engine was built from
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub movies: usize,
    pub unique_titles: usize,
    pub precision: Precision,
    pub source: SimilaritySource,
}

/// Content-based recommender over a fixed catalog
///
/// Built once and never mutated, so it can be shared across requests.
#[derive(Debug)]
pub struct RecommendationEngine {
    catalog: Catalog,
    matrix: SimilarityMatrix,
    source: SimilaritySource,
}

impl RecommendationEngine {
    /// Vectorizes the catalog's tags and computes pairwise similarity
    pub fn build(
        catalog: Catalog,
        vectorizer: &CountVectorizer,
        precision: Precision,
    ) -> AppResult<Self> {
        let start = Instant::now();
        let vectors = vectorizer.fit_transform(&catalog.tags())?;
        let matrix = SimilarityMatrix::from_vectors(&vectors, precision);

        tracing::info!(
            movies = catalog.len(),
            vocabulary = vectors.vocabulary().len(),
            precision = ?precision,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Similarity matrix computed"
        );

        Ok(Self {
            catalog,
            matrix,
            source: SimilaritySource::Computed {
                vocabulary_size: vectors.vocabulary().len(),
            },
        })
    }

    /// Uses a precomputed artifact instead of vectorizing
    pub fn from_artifact(
        catalog: Catalog,
        artifact: SimilarityArtifact,
        path: impl Into<String>,
    ) -> AppResult<Self> {
        let matrix = artifact.into_matrix(&catalog)?;
        let path = path.into();

        tracing::info!(
            movies = catalog.len(),
            path = %path,
            "Similarity matrix loaded from artifact"
        );

        Ok(Self {
            catalog,
            matrix,
            source: SimilaritySource::Artifact { path },
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            movies: self.catalog.len(),
            unique_titles: self.catalog.unique_titles().len(),
            precision: self.matrix.precision(),
            source: self.source.clone(),
        }
    }

    /// Row indices and scores of the `n` movies most similar to `index`
    ///
    /// Neither the movie itself nor any movie sharing its cleaned title is included.
    /// Equal scores keep column order.
    pub fn top_n(&self, index: usize, n: usize) -> Vec<(usize, f64)> {
        let (Some(row), Some(query)) = (self.matrix.row(index), self.catalog.get(index)) else {
            return Vec::new();
        };

        let mut candidates: Vec<(usize, f64)> = row
            .into_iter()
            .filter(|&(column, _)| {
                column != index
                    && self
                        .catalog
                        .get(column)
                        .is_some_and(|movie| movie.clean_title != query.clean_title)
            })
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.truncate(n);
        candidates
    }

    pub fn recommend_by_index(&self, index: usize, n: usize) -> Vec<Recommendation> {
        self.top_n(index, n)
            .into_iter()
            .filter_map(|(column, score)| {
                self.catalog.get(column).map(|movie| Recommendation {
                    id: movie.id,
                    title: movie.clean_title.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Recommendations for the first movie with this cleaned title, empty if unknown
    pub fn recommend_by_title(&self, clean_title: &str, n: usize) -> Vec<Recommendation> {
        match self.catalog.index_of_title(clean_title) {
            Some(index) => self.recommend_by_index(index, n),
            None => {
                tracing::debug!(title = %clean_title, "Title not in catalog");
                Vec::new()
            }
        }
    }

    /// Recommendations for the movie with this identifier, empty if unknown
    pub fn recommend_by_id(&self, id: u64, n: usize) -> Vec<Recommendation> {
        match self.catalog.index_of_id(id) {
            Some(index) => self.recommend_by_index(index, n),
            None => {
                tracing::debug!(movie_id = id, "Movie id not in catalog");
                Vec::new()
            }
        }
    }
}

/// Loads the catalog and prepares the engine according to `config`
///
/// A configured artifact that exists on disk is loaded; otherwise the matrix is
/// computed on a blocking thread.
pub async fn initialize(config: &Config) -> AppResult<RecommendationEngine> {
    let data_path = config.data_path.clone();
    let max_movies = config.max_movies;
    let catalog = tokio::task::spawn_blocking(move || Catalog::from_path(data_path, max_movies))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if let Some(path) = config.similarity_artifact.clone() {
        if Path::new(&path).exists() {
            return tokio::task::spawn_blocking(move || {
                let artifact = SimilarityArtifact::load(&path)?;
                RecommendationEngine::from_artifact(catalog, artifact, path)
            })
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        }
        tracing::warn!(path = %path, "Similarity artifact not found, computing live");
    }

    let vectorizer = CountVectorizer::new().with_max_features(config.max_features);
    let precision = config.score_precision;
    tokio::task::spawn_blocking(move || {
        RecommendationEngine::build(catalog, &vectorizer, precision)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}
