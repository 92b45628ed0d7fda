pub mod recommender;
pub mod similarity;
pub mod stopwords;
pub mod vectorizer;

pub use recommender::{initialize, EngineStats, RecommendationEngine, SimilaritySource};
pub use similarity::{Precision, SimilarityMatrix};
pub use vectorizer::{CountVectorizer, TagVectors};
