use serde::{Deserialize, Serialize};

/// A named grouping of services with its own ordering, hue and tag vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a category.
///
/// `hue` is doubly optional: `Some(None)` clears the hue, `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub order: Option<i64>,
    pub hue: Option<Option<f64>>,
    pub tags: Option<Vec<String>>,
}
