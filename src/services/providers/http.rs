/// HTTP recommendation provider
///
/// Sends `POST {api_url}/search` with `{queryText, top_k, image?}` and expects
/// `{description, items: [...]}` back.
use crate::{
    error::{AppError, AppResult},
    models::{ApiSearchRequest, ApiSearchResponse, EncodedImage, ItemList},
    services::providers::RecommendationProvider,
};
use reqwest::Client as HttpClient;
use tracing::instrument;

#[derive(Clone)]
pub struct HttpRecommendationProvider {
    http_client: HttpClient,
    api_url: String,
    top_k: u32,
}

impl HttpRecommendationProvider {
    pub fn new(api_url: impl Into<String>, top_k: u32) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            top_k,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.api_url)
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for HttpRecommendationProvider {
    #[instrument(skip(self, image), fields(provider = "http", has_image = image.is_some()))]
    async fn fetch_items(
        &self,
        search_text: &str,
        image: Option<EncodedImage>,
    ) -> AppResult<ItemList> {
        if search_text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search text cannot be empty".to_string(),
            ));
        }

        let request = ApiSearchRequest {
            query_text: search_text,
            top_k: self.top_k,
            image: image.as_ref().map(EncodedImage::as_str),
        };

        let response = self
            .http_client
            .post(self.search_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Recommendation request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let search: ApiSearchResponse = response.json().await?;
        let items = ItemList::try_from(search)?;

        tracing::info!(
            results = items.items.len(),
            "Recommendations fetched"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
