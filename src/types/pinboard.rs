use serde::{Deserialize, Serialize};

use super::category::Category;
use super::service::{ColorIntensity, Service};
use super::settings::DisplaySettings;

/// Export format version written into every backup.
pub const EXPORT_VERSION: &str = "1.0";

/// The whole board: the single document persisted after every change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PinboardData {
    pub title: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub available_flags: Vec<String>,
}

impl PinboardData {
    /// An empty board with the given title.
    pub fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            services: Vec::new(),
            categories: Vec::new(),
            available_flags: Vec::new(),
        }
    }
}

impl Default for PinboardData {
    /// The seed board shown on first launch.
    fn default() -> Self {
        let category_names = [
            "AI Assistants & Chatbots",
            "Image & Video Generation",
            "Video Editing",
            "Audio & Music Generation",
            "Google AI Platforms",
            "Web App Development",
            "Writing",
            "Miscellaneous",
        ];
        let categories = category_names
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: (i + 1).to_string(),
                name: name.to_string(),
                order: i as i64,
                hue: None,
                tags: if *name == "Web App Development" {
                    vec!["Coding".to_string(), "Hosting".to_string()]
                } else {
                    Vec::new()
                },
            })
            .collect();

        Self {
            title: "My Pinboard".to_string(),
            services: vec![Service {
                id: "1".to_string(),
                name: "ChatGPT".to_string(),
                url: "https://chat.openai.com".to_string(),
                description: "OpenAI conversational AI".to_string(),
                categories: vec!["AI Assistants & Chatbots".to_string()],
                flags: Vec::new(),
                tags: Vec::new(),
                category_tags: Default::default(),
                ratings: Default::default(),
                order: 0,
                color_intensity: ColorIntensity::Default,
            }],
            categories,
            available_flags: vec![
                "paid".to_string(),
                "untested".to_string(),
                "deprecated".to_string(),
            ],
        }
    }
}

/// Backup file contents: the board, the display settings and export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub data: PinboardData,
    pub settings: DisplaySettings,
    pub export_date: String,
    pub version: String,
}
