//! JSON export and import of the board plus display settings.
//!
//! Import is parsed completely before anything is applied: either the caller
//! gets a full [`ImportOutcome`] to commit, or an [`ImportError`] and no change.

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::services::document_migrations;
use crate::types::errors::ImportError;
use crate::types::pinboard::{ExportDocument, PinboardData, EXPORT_VERSION};
use crate::types::settings::DisplaySettings;

/// Result of a successfully parsed import, ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Replacement board, when the document carried one.
    pub data: Option<PinboardData>,
    /// The current settings with every well-typed imported field applied.
    pub settings: DisplaySettings,
    /// camelCase names of the settings fields taken from the document.
    pub applied_settings: Vec<&'static str>,
}

/// Builds a backup of the board and settings stamped with the current time.
pub fn export_document(data: &PinboardData, settings: &DisplaySettings) -> ExportDocument {
    ExportDocument {
        data: data.clone(),
        settings: settings.clone(),
        export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: EXPORT_VERSION.to_string(),
    }
}

/// Pretty-printed backup JSON.
pub fn export_json(data: &PinboardData, settings: &DisplaySettings) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_document(data, settings))
}

/// File name used when saving a backup taken on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("pinboard-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Parses a backup document.
///
/// `data`, when present and not null, must deserialize into a board after
/// legacy-shape upgrades. Each settings field is taken independently when it
/// is well typed; the rest keep their values from `current`.
pub fn parse_import(text: &str, current: &DisplaySettings) -> Result<ImportOutcome, ImportError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;
    let Value::Object(root) = root else {
        return Err(ImportError::InvalidShape(
            "document root must be an object".to_string(),
        ));
    };

    let data_value = root.get("data").filter(|v| !v.is_null());
    let settings_value = root.get("settings").filter(|v| !v.is_null());
    if data_value.is_none() && settings_value.is_none() {
        return Err(ImportError::InvalidShape(
            "document contains neither data nor settings".to_string(),
        ));
    }

    let data = data_value.map(|v| parse_board(v.clone())).transpose()?;

    let mut settings = current.clone();
    let mut applied_settings = Vec::new();
    match settings_value {
        Some(Value::Object(fields)) => {
            applied_settings = apply_settings(fields, &mut settings);
        }
        Some(_) => tracing::warn!("ignoring import settings that are not an object"),
        None => {}
    }

    Ok(ImportOutcome {
        data,
        settings,
        applied_settings,
    })
}

fn parse_board(value: Value) -> Result<PinboardData, ImportError> {
    if !value.is_object() {
        return Err(ImportError::InvalidShape("data must be an object".to_string()));
    }
    let upgraded = document_migrations::migrate(value, 0);
    serde_json::from_value(upgraded).map_err(|e| ImportError::InvalidShape(format!("data: {}", e)))
}

fn apply_settings(fields: &Map<String, Value>, settings: &mut DisplaySettings) -> Vec<&'static str> {
    let mut applied = Vec::new();

    if let Some(color) = fields.get("textColor").and_then(Value::as_str) {
        if !color.is_empty() {
            settings.text_color = color.to_string();
            applied.push("textColor");
        }
    }
    if let Some(count) = fields.get("columnCount").and_then(Value::as_i64) {
        if DisplaySettings::is_valid_column_count(count) {
            settings.column_count = count as u8;
            applied.push("columnCount");
        }
    }

    let flags: [(&'static str, &mut bool); 4] = [
        ("hideDescriptions", &mut settings.hide_descriptions),
        ("showTags", &mut settings.show_tags),
        ("showRatings", &mut settings.show_ratings),
        ("hideUrls", &mut settings.hide_urls),
    ];
    for (key, target) in flags {
        if let Some(value) = fields.get(key).and_then(Value::as_bool) {
            *target = value;
            applied.push(key);
        }
    }

    applied
}
