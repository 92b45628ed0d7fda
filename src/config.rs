use serde::Deserialize;

use crate::services::similarity::Precision;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movies CSV file
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Keep only the first N rows of the dataset
    #[serde(default)]
    pub max_movies: Option<usize>,

    /// Cap the vectorizer vocabulary to the N most frequent tokens
    #[serde(default)]
    pub max_features: Option<usize>,

    /// Storage precision of similarity scores
    #[serde(default)]
    pub score_precision: Precision,

    /// Precomputed similarity matrix, loaded instead of computing live when present
    #[serde(default)]
    pub similarity_artifact: Option<String>,

    /// Number of recommendations returned when a request doesn't specify one
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound for a requested recommendation count
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_path() -> String {
    "data/movies.csv".to_string()
}

fn default_recommendations() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    20
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            max_movies: None,
            max_features: None,
            score_precision: Precision::default(),
            similarity_artifact: None,
            default_recommendations: default_recommendations(),
            max_recommendations: default_max_recommendations(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_recommendations == 0 {
            anyhow::bail!("MAX_RECOMMENDATIONS must be at least 1");
        }
        if self.default_recommendations == 0
            || self.default_recommendations > self.max_recommendations
        {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS must be between 1 and {}",
                self.max_recommendations
            );
        }
        if self.max_movies == Some(0) {
            anyhow::bail!("MAX_MOVIES must be at least 1 when set");
        }
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
