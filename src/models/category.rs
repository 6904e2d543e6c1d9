use serde::{Deserialize, Serialize};

/// A fixed style category shown in the gallery.
///
/// `search_text` is what gets sent to the recommendation service on the
/// category's behalf; the user's own text is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub label: String,
    pub description: String,
    pub search_text: String,
}

impl CategoryDescriptor {
    pub fn new(label: &str, description: &str, search_text: &str) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            search_text: search_text.to_string(),
        }
    }
}

/// The gallery's style categories, in display order
pub fn default_categories() -> Vec<CategoryDescriptor> {
    vec![
        CategoryDescriptor::new(
            "Casual Chic",
            "Effortlessly stylish everyday wear combining comfort and fashion",
            "casual chic everyday comfortable stylish fashion items",
        ),
        CategoryDescriptor::new(
            "Business Professional",
            "Sophisticated and polished looks for the modern workplace",
            "business professional formal office work attire fashion",
        ),
        CategoryDescriptor::new(
            "Bohemian",
            "Free-spirited and artistic styles with flowing silhouettes",
            "bohemian boho artistic flowing relaxed fashion style",
        ),
        CategoryDescriptor::new(
            "Streetwear",
            "Urban-inspired contemporary fashion with bold elements",
            "streetwear urban contemporary bold modern fashion",
        ),
        CategoryDescriptor::new(
            "Minimalist",
            "Clean lines and simple silhouettes in neutral tones",
            "minimalist clean simple neutral classic fashion items",
        ),
        CategoryDescriptor::new(
            "Glamorous Evening",
            "Elegant and sophisticated looks for special occasions",
            "glamorous evening formal elegant sophisticated fashion",
        ),
    ]
}
