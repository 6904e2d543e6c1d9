use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::request_id::RequestId;
use crate::models::{AggregateResult, CategoryDescriptor, ItemList, Query};
use crate::services::{gallery, stylist, GalleryView};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub categories: AggregateResult,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the configured style categories
pub async fn get_categories(State(state): State<AppState>) -> Json<Vec<CategoryDescriptor>> {
    Json(state.categories.to_vec())
}

/// Chat flow: recommendations for the user's own query
///
/// Always answers 200; upstream failures turn into the empty fallback list.
pub async fn ask_stylist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(query): Json<Query>,
) -> Json<ItemList> {
    tracing::info!(request_id = %request_id, "Processing stylist request");

    let items = stylist::recommend(state.provider.as_ref(), &query).await;

    tracing::info!(
        request_id = %request_id,
        items = items.items.len(),
        "Stylist request completed"
    );

    Json(items)
}

/// Gallery flow: one request per style category, joined
pub async fn run_gallery(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(query): Json<Query>,
) -> AppResult<Json<GalleryResponse>> {
    tracing::info!(
        request_id = %request_id,
        categories = state.categories.len(),
        "Processing gallery request"
    );

    let categories = gallery::refresh(
        state.gallery.clone(),
        state.provider.clone(),
        query,
        state.categories.clone(),
        state.failure_policy,
    )
    .await?;

    tracing::info!(request_id = %request_id, "Gallery request completed");

    Ok(Json(GalleryResponse { categories }))
}

/// Current gallery view: idle, loading, ready, empty or failed
pub async fn get_gallery(State(state): State<AppState>) -> Json<GalleryView> {
    Json(state.gallery.snapshot().await)
}
