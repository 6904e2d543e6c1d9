pub mod aggregator;
pub mod gallery;
pub mod providers;
pub mod stylist;

pub use aggregator::{aggregate, FailurePolicy};
pub use gallery::{GalleryStore, GalleryView};
pub use providers::{HttpRecommendationProvider, RecommendationProvider};
