use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    init_tracing, services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        data_path = %config.data_path,
        max_movies = ?config.max_movies,
        max_features = ?config.max_features,
        precision = ?config.score_precision,
        "Starting movie recommender"
    );

    // Build the similarity matrix once; every request reads it
    let engine = services::initialize(&config).await?;
    let addr = config.bind_addr();
    let state = AppState::new(engine, config);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
