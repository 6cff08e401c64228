use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::ValidationError;

/// Display shading applied to a service card.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorIntensity {
    #[default]
    Default,
    Lighter,
    Light,
    Bright,
}

/// A bookmarked service pinned to the board.
///
/// `categories` holds category *names*; the join against [`Category`](super::category::Category)
/// is by name, so renames must go through the store's cascade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub color_intensity: ColorIntensity,
}

impl Service {
    pub fn is_uncategorized(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn in_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Star rating for the given category, `None` when unrated.
    pub fn rating_in(&self, category: &str) -> Option<u8> {
        self.ratings.get(category).copied()
    }
}

/// Fields supplied when creating a service; `id` and `order` are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewService {
    pub name: String,
    pub url: String,
    pub description: String,
    pub categories: Vec<String>,
    pub flags: Vec<String>,
    pub tags: Vec<String>,
    pub category_tags: BTreeMap<String, Vec<String>>,
    pub ratings: BTreeMap<String, u8>,
    pub color_intensity: ColorIntensity,
}

impl NewService {
    /// Checks the fields a bookmark cannot be saved without: a name, a URL and
    /// at least one category. The store itself accepts anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        if self.categories.is_empty() {
            return Err(ValidationError::NoCategory);
        }
        Ok(())
    }
}

/// Partial update merged into an existing service. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub flags: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub category_tags: Option<BTreeMap<String, Vec<String>>>,
    pub ratings: Option<BTreeMap<String, u8>>,
    pub order: Option<i64>,
    pub color_intensity: Option<ColorIntensity>,
}

impl ServiceUpdate {
    /// Merges the present fields into `service`.
    pub fn apply_to(self, service: &mut Service) {
        if let Some(v) = self.name {
            service.name = v;
        }
        if let Some(v) = self.url {
            service.url = v;
        }
        if let Some(v) = self.description {
            service.description = v;
        }
        if let Some(v) = self.categories {
            service.categories = v;
        }
        if let Some(v) = self.flags {
            service.flags = v;
        }
        if let Some(v) = self.tags {
            service.tags = v;
        }
        if let Some(v) = self.category_tags {
            service.category_tags = v;
        }
        if let Some(v) = self.ratings {
            service.ratings = v;
        }
        if let Some(v) = self.order {
            service.order = v;
        }
        if let Some(v) = self.color_intensity {
            service.color_intensity = v;
        }
    }
}
