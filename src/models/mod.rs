use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, sync::Arc};

use crate::error::{AppError, AppResult};

pub mod category;

pub use category::{default_categories, CategoryDescriptor};

/// Description returned when no recommendations could be produced
pub const EMPTY_DESCRIPTION: &str = "No items available.";

/// Base64 (or otherwise transport-encoded) image attached to a query.
///
/// Cloning shares the underlying buffer, so the same payload can ride along with
/// every fan-out call without copying it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(Arc<str>);

impl EncodedImage {
    pub fn new(data: impl Into<Arc<str>>) -> Self {
        Self(data.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Image payloads can be megabytes of base64; keep them out of logs.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedImage({} bytes)", self.0.len())
    }
}

/// A user-submitted query: free text plus an optional image
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Query {
    pub text: String,
    #[serde(default)]
    pub image: Option<EncodedImage>,
}

impl Query {
    pub fn new(text: impl Into<String>, image: Option<EncodedImage>) -> Self {
        Self {
            text: text.into(),
            image,
        }
    }

    /// Query the gallery issues on first load
    pub fn initial() -> Self {
        Self::new("Show me fashion items", None)
    }
}

/// A single recommended fashion item, ranked upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub name: String,
    pub brand_name: String,
    pub caption: String,
    pub source_url: String,
    pub image_url: String,
    pub item_type: String,
    /// Lower is more relevant
    pub rank: i64,
    pub score: Option<f64>,
}

/// Items returned by one recommendation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    pub description: String,
    pub items: Vec<RecommendedItem>,
}

impl ItemList {
    /// Fallback shown when the recommendation service is unavailable
    pub fn empty() -> Self {
        Self {
            description: EMPTY_DESCRIPTION.to_string(),
            items: Vec::new(),
        }
    }

    /// Stable ascending sort by rank; ties keep the order the service sent.
    pub fn sort_by_rank(mut self) -> Self {
        sort_by_rank(&mut self.items);
        self
    }
}

pub fn sort_by_rank(items: &mut [RecommendedItem]) {
    items.sort_by_key(|item| item.rank);
}

/// Ranked items for one style category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    #[serde(flatten)]
    pub descriptor: CategoryDescriptor,
    pub items: Vec<RecommendedItem>,
}

/// One entry per configured category, in configuration order
pub type AggregateResult = Vec<CategoryResult>;

// ============================================================================
// Recommendation Service API Types
// ============================================================================

/// Request body for POST /search
#[derive(Debug, Clone, Serialize)]
pub struct ApiSearchRequest<'a> {
    #[serde(rename = "queryText")]
    pub query_text: &'a str,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
}

/// Raw response from POST /search
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchResponse {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<ApiItem>>,
}

/// Raw item as sent by the recommendation service.
///
/// The service fills unknown metadata with placeholder strings and may send
/// `"N/A"` for rank or score, so those two stay untyped until conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiItem {
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_url: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub item_caption: Option<String>,
    #[serde(default)]
    pub item_brand: Option<String>,
    #[serde(default)]
    pub rank: Value,
    #[serde(default)]
    pub score: Value,
}

fn parse_rank(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl TryFrom<ApiItem> for RecommendedItem {
    type Error = AppError;

    fn try_from(item: ApiItem) -> AppResult<Self> {
        let rank = parse_rank(&item.rank).ok_or_else(|| {
            AppError::DegradedData(format!(
                "item {:?} has no integer rank (got {})",
                item.item_name.as_deref().unwrap_or_default(),
                item.rank
            ))
        })?;

        Ok(RecommendedItem {
            name: item.item_name.unwrap_or_default(),
            brand_name: item.item_brand.unwrap_or_default(),
            caption: item.item_caption.unwrap_or_default(),
            source_url: item.item_url.unwrap_or_default(),
            image_url: item.image_url.unwrap_or_default(),
            item_type: item.item_type.unwrap_or_default(),
            rank,
            score: parse_score(&item.score),
        })
    }
}

impl TryFrom<ApiSearchResponse> for ItemList {
    type Error = AppError;

    fn try_from(response: ApiSearchResponse) -> AppResult<Self> {
        let items = response
            .items
            .ok_or_else(|| AppError::DegradedData("response missing items".to_string()))?
            .into_iter()
            .map(RecommendedItem::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ItemList {
            description: response.description.unwrap_or_default(),
            items,
        })
    }
}
