//! Precomputes the similarity matrix and writes it to `SIMILARITY_ARTIFACT`.

use anyhow::Context;
use movie_recommender::{
    config::Config,
    data::{Catalog, SimilarityArtifact},
    init_tracing,
    services::{CountVectorizer, RecommendationEngine},
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let output = config
        .similarity_artifact
        .clone()
        .context("SIMILARITY_ARTIFACT must name the output file")?;

    let catalog = Catalog::from_path(&config.data_path, config.max_movies)?;
    let vectorizer = CountVectorizer::new().with_max_features(config.max_features);
    let engine = RecommendationEngine::build(catalog, &vectorizer, config.score_precision)?;

    let artifact = SimilarityArtifact::from_matrix(engine.catalog(), engine.matrix())?;
    artifact
        .save(&output)
        .with_context(|| format!("Failed to write artifact to {}", output))?;

    tracing::info!(
        path = %output,
        movies = artifact.movie_ids.len(),
        "Similarity artifact written"
    );
    Ok(())
}
