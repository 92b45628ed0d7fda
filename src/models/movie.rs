use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\d{4}\)").expect("year pattern is a valid regex")
});

/// Raw row of the movies CSV
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "movieId", default)]
    pub movie_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub genres: Option<String>,
}

/// A movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// External identifier, when the dataset carries a `movieId` column
    pub id: Option<u64>,
    /// Title as it appears in the dataset, e.g. "Toy Story (1995)"
    pub title: String,
    /// Display title with the release year removed, e.g. "Toy Story"
    pub clean_title: String,
    /// Genre tag string used as the similarity signal
    pub tags: String,
}

impl Movie {
    pub fn new(id: Option<u64>, title: impl Into<String>, tags: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            clean_title: clean_title(&title),
            title,
            tags: tags.into(),
        }
    }
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie::new(record.movie_id, record.title, record.genres.unwrap_or_default())
    }
}

/// Strips every four-digit year in parentheses and trims surrounding whitespace
pub fn clean_title(title: &str) -> String {
    YEAR_PATTERN.replace_all(title, "").trim().to_string()
}
