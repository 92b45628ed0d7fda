pub mod artifact;
pub mod catalog;

pub use artifact::SimilarityArtifact;
pub use catalog::Catalog;
