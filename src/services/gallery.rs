use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{AggregateResult, CategoryDescriptor, Query},
    services::{
        aggregator::{aggregate, FailurePolicy},
        providers::RecommendationProvider,
    },
};

/// What the gallery view should currently render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GalleryView {
    /// No gallery request has been made yet
    Idle,
    /// A request is in flight
    Loading { generation: u64 },
    /// Every category came back; at least one has items
    Ready {
        generation: u64,
        categories: AggregateResult,
        updated_at: DateTime<Utc>,
    },
    /// The request succeeded but produced no items at all
    Empty {
        generation: u64,
        updated_at: DateTime<Utc>,
    },
    /// The request failed; nothing from it is shown
    Failed {
        generation: u64,
        error: String,
        updated_at: DateTime<Utc>,
    },
}

/// Handed out by [`GalleryStore::begin`]; only the newest ticket may commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct StoreInner {
    generation: u64,
    view: GalleryView,
}

/// Holds the gallery view and guards it against out-of-order commits
///
/// Each request takes a ticket with a strictly increasing generation. A result is
/// committed only if no newer request has started since its ticket was issued, so
/// a slow response to an older query can never overwrite a newer one.
pub struct GalleryStore {
    inner: RwLock<StoreInner>,
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                generation: 0,
                view: GalleryView::Idle,
            }),
        }
    }

    /// Starts a new request and switches the view to loading
    pub async fn begin(&self) -> RequestTicket {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.view = GalleryView::Loading {
            generation: inner.generation,
        };
        RequestTicket {
            generation: inner.generation,
        }
    }

    /// Replaces the whole view with the outcome of `ticket`'s request.
    ///
    /// Returns false (and changes nothing) if a newer request has begun.
    pub async fn commit(&self, ticket: RequestTicket, result: &AppResult<AggregateResult>) -> bool {
        let mut inner = self.inner.write().await;

        if ticket.generation != inner.generation {
            tracing::info!(
                stale = ticket.generation,
                current = inner.generation,
                "Discarding superseded gallery result"
            );
            return false;
        }

        let generation = ticket.generation;
        let updated_at = Utc::now();

        inner.view = match result {
            Ok(categories) if categories.iter().all(|c| c.items.is_empty()) => {
                GalleryView::Empty {
                    generation,
                    updated_at,
                }
            }
            Ok(categories) => GalleryView::Ready {
                generation,
                categories: categories.clone(),
                updated_at,
            },
            Err(e) => GalleryView::Failed {
                generation,
                error: e.to_string(),
                updated_at,
            },
        };

        true
    }

    pub async fn snapshot(&self) -> GalleryView {
        self.inner.read().await.view.clone()
    }
}

/// Runs one gallery request end to end: begin, aggregate, commit
///
/// The work runs on its own task, so the view still leaves `loading` when the
/// caller stops waiting (e.g. the HTTP client disconnects). The aggregate outcome
/// is returned to the caller whether or not it was committed.
pub async fn refresh(
    store: Arc<GalleryStore>,
    provider: Arc<dyn RecommendationProvider>,
    query: Query,
    categories: Arc<[CategoryDescriptor]>,
    policy: FailurePolicy,
) -> AppResult<AggregateResult> {
    let task = tokio::spawn(async move {
        let ticket = store.begin().await;
        let result = aggregate(provider, &query, &categories, policy).await;
        let committed = store.commit(ticket, &result).await;

        tracing::debug!(
            generation = ticket.generation(),
            committed,
            "Gallery refresh finished"
        );

        result
    });

    task.await
        .map_err(|e| AppError::Internal(format!("Gallery refresh task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_categories, fixtures, CategoryResult, EncodedImage, ItemList};
    use crate::services::providers::MockRecommendationProvider;
    use std::time::Duration;

    /// Provider that takes far longer than any caller in these tests will wait
    struct SlowProvider;

    #[async_trait::async_trait]
    impl RecommendationProvider for SlowProvider {
        async fn fetch_items(
            &self,
            _search_text: &str,
            _image: Option<EncodedImage>,
        ) -> AppResult<ItemList> {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(fixtures::list(&[2, 1]))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn aggregate_with(ranks: &[i64]) -> AggregateResult {
        default_categories()
            .into_iter()
            .map(|descriptor| CategoryResult {
                descriptor,
                items: fixtures::list(ranks).items,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_starts_idle_then_loading() {
        let store = GalleryStore::new();
        assert_eq!(store.snapshot().await, GalleryView::Idle);

        let ticket = store.begin().await;
        assert_eq!(ticket.generation(), 1);
        assert_eq!(
            store.snapshot().await,
            GalleryView::Loading { generation: 1 }
        );
    }

    #[tokio::test]
    async fn test_commit_ready_empty_and_failed_are_distinct() {
        let store = GalleryStore::new();

        let ticket = store.begin().await;
        assert!(store.commit(ticket, &Ok(aggregate_with(&[1, 2]))).await);
        match store.snapshot().await {
            GalleryView::Ready { categories, .. } => assert_eq!(categories.len(), 6),
            other => panic!("expected ready, got {:?}", other),
        }

        let ticket = store.begin().await;
        assert!(store.commit(ticket, &Ok(aggregate_with(&[]))).await);
        assert!(matches!(
            store.snapshot().await,
            GalleryView::Empty { generation: 2, .. }
        ));

        let ticket = store.begin().await;
        let failed: AppResult<AggregateResult> = Err(AppError::ExternalApi("down".into()));
        assert!(store.commit(ticket, &failed).await);
        match store.snapshot().await {
            GalleryView::Failed { error, generation, .. } => {
                assert_eq!(generation, 3);
                assert!(error.contains("down"));
            }
            other => panic!("expected failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let store = GalleryStore::new();
        let older = store.begin().await;
        let newer = store.begin().await;

        // Older response lands while the newer one is still in flight
        assert!(!store.commit(older, &Ok(aggregate_with(&[1]))).await);
        assert_eq!(
            store.snapshot().await,
            GalleryView::Loading { generation: 2 }
        );

        assert!(store.commit(newer, &Ok(aggregate_with(&[3]))).await);
        // And once more after the newer one has committed
        assert!(!store.commit(older, &Err(AppError::Internal("late".into()))).await);

        match store.snapshot().await {
            GalleryView::Ready {
                generation,
                categories,
                ..
            } => {
                assert_eq!(generation, 2);
                assert_eq!(categories[0].items[0].rank, 3);
            }
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_commits_failure_without_partial_data() {
        let mut mock = MockRecommendationProvider::new();
        mock.expect_fetch_items().times(6).returning(|text, _| {
            if text.starts_with("streetwear") {
                Err(AppError::ExternalApi("status 500".to_string()))
            } else {
                Ok(fixtures::list(&[2, 1]))
            }
        });

        let store = Arc::new(GalleryStore::new());
        let result = refresh(
            store.clone(),
            Arc::new(mock),
            Query::initial(),
            default_categories().into(),
            FailurePolicy::Strict,
        )
        .await;

        assert!(result.is_err());
        assert!(matches!(
            store.snapshot().await,
            GalleryView::Failed { generation: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_refresh_commits_after_caller_gives_up() {
        let store = Arc::new(GalleryStore::new());

        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            refresh(
                store.clone(),
                Arc::new(SlowProvider),
                Query::initial(),
                default_categories().into(),
                FailurePolicy::Strict,
            ),
        )
        .await;
        assert!(waited.is_err());

        let mut view = store.snapshot().await;
        for _ in 0..100 {
            if !matches!(view, GalleryView::Loading { .. }) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            view = store.snapshot().await;
        }

        match view {
            GalleryView::Ready {
                generation,
                categories,
                ..
            } => {
                assert_eq!(generation, 1);
                assert_eq!(categories.len(), 6);
                assert_eq!(categories[0].items[0].rank, 1);
            }
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[test]
    fn test_view_serializes_with_status_tag() {
        let json = serde_json::to_value(GalleryView::Loading { generation: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "loading", "generation": 4 }));

        let json = serde_json::to_value(GalleryView::Idle).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "idle" }));
    }
}
