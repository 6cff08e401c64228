use serde::{Deserialize, Serialize};

/// Best-effort page metadata scraped from raw markup. Empty strings mean "not found".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}
