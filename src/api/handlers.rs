use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MovieSummary, RecommendationResponse},
    services::EngineStats,
};

use super::page::{self, PageOutcome};
use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub movie: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommender page
pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let selection = query.movie.as_deref();
    let recommendations = match selection {
        Some(title) if !title.trim().is_empty() => state
            .engine
            .recommend_by_title(title, state.config.default_recommendations),
        _ => Vec::new(),
    };

    let outcome = PageOutcome::from_submission(selection, recommendations);
    Html(page::render(
        state.engine.catalog().unique_titles(),
        selection,
        &outcome,
    ))
}

/// All movies in catalog order
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    let movies = state
        .engine
        .catalog()
        .movies()
        .iter()
        .map(MovieSummary::from)
        .collect();
    Json(movies)
}

/// Engine statistics
pub async fn stats(State(state): State<AppState>) -> Json<EngineStats> {
    Json(state.engine.stats())
}

/// Recommendations for a cleaned title
pub async fn recommend_by_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let title = query
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Please select a movie first".to_string()))?;
    let n = state.recommendation_count(query.n)?;

    tracing::info!(request_id = %request_id, title = %title, n, "Processing recommendation request");

    if state.engine.catalog().index_of_title(&title).is_none() {
        return Err(AppError::NotFound(format!("Movie '{}' not found", title)));
    }

    let recommendations = state.engine.recommend_by_title(&title, n);

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations computed"
    );

    Ok(Json(RecommendationResponse {
        query: title,
        recommendations,
    }))
}

/// Recommendations for a movie identifier
pub async fn recommend_by_id(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<u64>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let n = state.recommendation_count(query.n)?;

    tracing::info!(request_id = %request_id, movie_id = id, n, "Processing recommendation request");

    let movie = state
        .engine
        .catalog()
        .index_of_id(id)
        .and_then(|index| state.engine.catalog().get(index))
        .ok_or_else(|| AppError::NotFound(format!("Movie id {} not found", id)))?;

    Ok(Json(RecommendationResponse {
        query: movie.clean_title.clone(),
        recommendations: state.engine.recommend_by_id(id, n),
    }))
}
