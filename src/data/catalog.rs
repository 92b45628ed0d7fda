use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::{Movie, MovieRecord};

/// Ordered, read-only movie table
///
/// Row positions are the indices used by the similarity matrix.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_title: HashMap<String, usize>,
    by_id: HashMap<u64, usize>,
    unique_titles: Vec<String>,
}

impl Catalog {
    /// Indexes movies by cleaned title and identifier (first occurrence wins)
    pub fn new(movies: Vec<Movie>) -> AppResult<Self> {
        if movies.is_empty() {
            return Err(AppError::EmptyCatalog("dataset has no movie rows".to_string()));
        }

        let mut by_title = HashMap::new();
        let mut by_id = HashMap::new();
        let mut unique_titles = Vec::new();

        for (index, movie) in movies.iter().enumerate() {
            if !by_title.contains_key(&movie.clean_title) {
                by_title.insert(movie.clean_title.clone(), index);
                unique_titles.push(movie.clean_title.clone());
            }
            if let Some(id) = movie.id {
                by_id.entry(id).or_insert(index);
            }
        }

        Ok(Self {
            movies,
            by_title,
            by_id,
            unique_titles,
        })
    }

    /// Loads the movies CSV, keeping at most `limit` rows from the top
    pub fn from_path(path: impl AsRef<Path>, limit: Option<usize>) -> AppResult<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), limit = ?limit, "Loading movie catalog");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, limit)
    }

    /// Parses CSV with a header row containing `title` and `genres`, and optionally `movieId`
    pub fn from_reader<R: Read>(reader: R, limit: Option<usize>) -> AppResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut movies = Vec::new();

        for result in reader.deserialize().take(limit.unwrap_or(usize::MAX)) {
            let record: MovieRecord = result?;
            movies.push(Movie::from(record));
        }

        let catalog = Self::new(movies)?;
        tracing::info!(
            movies = catalog.len(),
            unique_titles = catalog.unique_titles.len(),
            "Movie catalog loaded"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Row of the first movie with this cleaned title
    pub fn index_of_title(&self, clean_title: &str) -> Option<usize> {
        self.by_title.get(clean_title).copied()
    }

    /// Row of the first movie with this identifier
    pub fn index_of_id(&self, id: u64) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Cleaned titles without duplicates, in dataset order
    pub fn unique_titles(&self) -> &[String] {
        &self.unique_titles
    }

    /// Tag strings in row order
    pub fn tags(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.tags.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "movieId,title,genres\n\
        1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
        2,Jumanji (1995),Adventure|Children|Fantasy\n\
        3,Hamlet (1948),Drama\n\
        4,Hamlet (1996),Crime|Drama|Romance\n\
        5,Unlisted (2003),\n";

    #[test]
    fn test_from_reader_parses_rows() {
        let catalog = Catalog::from_reader(CSV.as_bytes(), None).unwrap();
        assert_eq!(catalog.len(), 5);

        let toy_story = catalog.get(0).unwrap();
        assert_eq!(toy_story.id, Some(1));
        assert_eq!(toy_story.clean_title, "Toy Story");
        assert_eq!(toy_story.tags, "Adventure|Animation|Children|Comedy|Fantasy");
    }

    #[test]
    fn test_missing_genres_become_empty_tags() {
        let catalog = Catalog::from_reader(CSV.as_bytes(), None).unwrap();
        assert_eq!(catalog.get(4).unwrap().tags, "");
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let catalog = Catalog::from_reader(CSV.as_bytes(), None).unwrap();
        assert_eq!(catalog.index_of_title("Hamlet"), Some(2));
        assert_eq!(
            catalog.unique_titles(),
            &["Toy Story", "Jumanji", "Hamlet", "Unlisted"]
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::from_reader(CSV.as_bytes(), None).unwrap();
        assert_eq!(catalog.index_of_id(4), Some(3));
        assert_eq!(catalog.index_of_id(99), None);
        assert_eq!(catalog.index_of_title("Nope"), None);
    }

    #[test]
    fn test_limit_keeps_head_rows() {
        let catalog = Catalog::from_reader(CSV.as_bytes(), Some(2)).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tags(), vec![
            "Adventure|Animation|Children|Comedy|Fantasy",
            "Adventure|Children|Fantasy",
        ]);
    }

    #[test]
    fn test_dataset_without_id_column() {
        let csv = "title,genres\nHeat (1995),Action|Crime|Thriller\n";
        let catalog = Catalog::from_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(catalog.get(0).unwrap().id, None);
        assert_eq!(catalog.index_of_title("Heat"), Some(0));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let result = Catalog::from_reader("movieId,title,genres\n".as_bytes(), None);
        assert!(matches!(result, Err(AppError::EmptyCatalog(_))));
    }

    #[test]
    fn test_malformed_row_is_csv_error() {
        let csv = "movieId,title,genres\nnot-a-number,Heat (1995),Action\n";
        let result = Catalog::from_reader(csv.as_bytes(), None);
        assert!(matches!(result, Err(AppError::Csv(_))));
    }
}
