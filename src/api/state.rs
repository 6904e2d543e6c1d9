use std::sync::Arc;

use crate::config::Config;
use crate::models::{default_categories, CategoryDescriptor};
use crate::services::{FailurePolicy, GalleryStore, HttpRecommendationProvider, RecommendationProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RecommendationProvider>,
    pub categories: Arc<[CategoryDescriptor]>,
    pub failure_policy: FailurePolicy,
    pub gallery: Arc<GalleryStore>,
}

impl AppState {
    /// Creates state around an arbitrary provider and category list
    pub fn new(
        provider: Arc<dyn RecommendationProvider>,
        categories: Vec<CategoryDescriptor>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            provider,
            categories: categories.into(),
            failure_policy,
            gallery: Arc::new(GalleryStore::new()),
        }
    }

    /// Creates state that talks to the configured recommendation service
    pub fn from_config(config: &Config) -> Self {
        let provider =
            HttpRecommendationProvider::new(config.recommendation_api_url.clone(), config.top_k);
        Self::new(
            Arc::new(provider),
            default_categories(),
            config.failure_policy,
        )
    }
}
