use stylist_gallery::{
    api::{create_router, AppState},
    config::Config,
    models::Query,
    services::gallery,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config);

    tracing::info!(
        recommendation_api_url = %config.recommendation_api_url,
        provider = state.provider.name(),
        top_k = config.top_k,
        categories = state.categories.len(),
        failure_policy = ?config.failure_policy,
        "Configuration loaded"
    );

    if config.warm_gallery {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = gallery::refresh(
                state.gallery.clone(),
                state.provider.clone(),
                Query::initial(),
                state.categories.clone(),
                state.failure_policy,
            )
            .await
            {
                tracing::warn!(error = %e, "Initial gallery fetch failed");
            }
        });
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
