use crate::{
    error::{AppError, AppResult},
    models::{AggregateResult, CategoryDescriptor, CategoryResult, Query, RecommendedItem},
    services::providers::RecommendationProvider,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// What to do when one category's request fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Any failed category fails the whole aggregate
    #[default]
    Strict,
    /// Failed categories come back with no items; the rest are kept
    Degrade,
}

/// Fetches recommendations for every category concurrently
///
/// One provider call is spawned per category, using the category's search text and
/// the query's image. All calls are awaited before anything is returned, even when
/// one has already failed. Results are slotted back into configuration order, so
/// the output never depends on which call finished first.
///
/// Each category's items are sorted ascending by rank. Under
/// [`FailurePolicy::Strict`] the first failure to settle is returned and no
/// category results are exposed.
pub async fn aggregate(
    provider: Arc<dyn RecommendationProvider>,
    query: &Query,
    categories: &[CategoryDescriptor],
    policy: FailurePolicy,
) -> AppResult<AggregateResult> {
    let start = Instant::now();

    tracing::info!(
        query = %query.text,
        has_image = query.image.is_some(),
        categories = categories.len(),
        policy = ?policy,
        "Starting category aggregation"
    );

    let mut tasks = JoinSet::new();

    for (index, category) in categories.iter().enumerate() {
        let provider = provider.clone();
        let search_text = category.search_text.clone();
        let image = query.image.clone();
        tasks.spawn(async move { (index, provider.fetch_items(&search_text, image).await) });
    }

    let mut slots: Vec<Option<Vec<RecommendedItem>>> = vec![None; categories.len()];
    let mut first_error: Option<AppError> = None;
    let mut failed = 0usize;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(list))) => {
                let label = &categories[index].label;
                let list = list.sort_by_rank();

                tracing::info!(
                    category = %label,
                    items = list.items.len(),
                    "Category completed"
                );
                for item in &list.items {
                    tracing::debug!(
                        category = %label,
                        image_url = %item.image_url,
                        rank = item.rank,
                        "Ranked item"
                    );
                }

                slots[index] = Some(list.items);
            }
            Ok((index, Err(e))) => {
                tracing::error!(
                    category = %categories[index].label,
                    error = %e,
                    "Category fetch failed"
                );
                failed += 1;
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                failed += 1;
                if first_error.is_none() {
                    first_error = Some(AppError::Internal(e.to_string()));
                }
            }
        }
    }

    if let Some(error) = first_error {
        match policy {
            FailurePolicy::Strict => {
                tracing::warn!(
                    failed,
                    succeeded = categories.len() - failed,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Aggregation rejected"
                );
                return Err(error);
            }
            FailurePolicy::Degrade => {
                tracing::warn!(
                    failed,
                    succeeded = categories.len() - failed,
                    "Partial aggregation, failed categories left empty"
                );
            }
        }
    }

    let results: AggregateResult = categories
        .iter()
        .zip(slots)
        .map(|(descriptor, items)| CategoryResult {
            descriptor: descriptor.clone(),
            items: items.unwrap_or_default(),
        })
        .collect();

    tracing::info!(
        categories = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Aggregation completed"
    );

    Ok(results)
}
