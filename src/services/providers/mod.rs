/// Recommendation provider abstraction
///
/// A provider turns one search text (plus an optional image) into a list of ranked
/// items. The HTTP provider talks to the remote recommendation service; tests swap
/// in mocks or stubs through the same trait.
use crate::{
    error::AppResult,
    models::{EncodedImage, ItemList},
};

pub mod http;

pub use http::HttpRecommendationProvider;

/// Trait for recommendation sources
///
/// Implementations perform exactly one upstream call per invocation and surface
/// every failure to the caller. Retries and fallback data are the caller's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Fetch ranked items for a search text
    ///
    /// Items come back in whatever order the service sent them; sorting by rank is
    /// left to the caller.
    async fn fetch_items(
        &self,
        search_text: &str,
        image: Option<EncodedImage>,
    ) -> AppResult<ItemList>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
