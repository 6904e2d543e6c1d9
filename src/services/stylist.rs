use crate::{
    models::{EncodedImage, ItemList, Query},
    services::providers::RecommendationProvider,
};

/// Single-query recommendations for the chat flow
///
/// Sends the user's own text and image, sorts the items by rank, and falls back
/// to [`ItemList::empty`] if the provider fails for any reason.
pub async fn recommend(provider: &dyn RecommendationProvider, query: &Query) -> ItemList {
    tracing::info!(
        query = %query.text,
        image_bytes = query.image.as_ref().map_or(0, EncodedImage::len),
        "Processing stylist query"
    );

    match provider.fetch_items(&query.text, query.image.clone()).await {
        Ok(list) => {
            let list = list.sort_by_rank();
            for item in &list.items {
                tracing::debug!(image_url = %item.image_url, rank = item.rank, "Ranked item");
            }
            list
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                transport = e.is_transport(),
                "Falling back to empty recommendations"
            );
            ItemList::empty()
        }
    }
}
