use serde::{Deserialize, Serialize};

pub const MIN_COLUMN_COUNT: u8 = 1;
pub const MAX_COLUMN_COUNT: u8 = 6;

/// Board-wide display settings, persisted and exported as a single record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    /// Text color used when a category has no hue.
    pub text_color: String,
    #[serde(deserialize_with = "column_count")]
    pub column_count: u8,
    pub hide_descriptions: bool,
    pub show_tags: bool,
    pub show_ratings: bool,
    pub hide_urls: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            text_color: "#9ca3af".to_string(),
            column_count: 2,
            hide_descriptions: false,
            show_tags: true,
            show_ratings: true,
            hide_urls: false,
        }
    }
}

impl DisplaySettings {
    pub fn is_valid_column_count(count: i64) -> bool {
        (MIN_COLUMN_COUNT as i64..=MAX_COLUMN_COUNT as i64).contains(&count)
    }
}

fn column_count<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let count = u8::deserialize(deserializer)?;
    if DisplaySettings::is_valid_column_count(count as i64) {
        Ok(count)
    } else {
        Err(serde::de::Error::custom(format!(
            "column count must be between {} and {}, got {}",
            MIN_COLUMN_COUNT, MAX_COLUMN_COUNT, count
        )))
    }
}
