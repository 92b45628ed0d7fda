pub mod movie;

pub use movie::{clean_title, Movie, MovieRecord};

use serde::Serialize;

/// A single recommended movie returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub id: Option<u64>,
    pub title: String,
    pub score: f64,
}

/// Response body of the recommendation endpoints
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<Recommendation>,
}

/// Catalog entry as listed by the API
#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub id: Option<u64>,
    pub title: String,
    pub clean_title: String,
    pub genres: String,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            clean_title: movie.clean_title.clone(),
            genres: movie.tags.clone(),
        }
    }
}
