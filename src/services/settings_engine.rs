// Pinboard Settings Engine
// Manages display settings: loading, saving, updating individual values, and resetting to defaults.
// Settings are stored as one JSON record in the document store, so every save is a single write.

use std::sync::Arc;

use crate::database::Database;
use crate::types::errors::SettingsError;
use crate::types::settings::DisplaySettings;

/// Storage key of the settings record.
pub const SETTINGS_KEY: &str = "pinboard-settings";
const SETTINGS_RECORD_VERSION: u32 = 1;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<DisplaySettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &DisplaySettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn replace(&mut self, settings: DisplaySettings) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
}

/// Settings engine that persists [`DisplaySettings`] in the database.
pub struct SettingsEngine {
    db: Arc<Database>,
    settings: DisplaySettings,
}

impl SettingsEngine {
    /// Creates an engine holding default settings. Call `load` to read the stored record.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            settings: DisplaySettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the stored record.
    ///
    /// If no record exists, returns default settings.
    /// If the record exists but is malformed, returns a serialization error
    /// and keeps the current in-memory settings.
    fn load(&mut self) -> Result<DisplaySettings, SettingsError> {
        let Some(doc) = self.db.get_document(SETTINGS_KEY)? else {
            self.settings = DisplaySettings::default();
            return Ok(self.settings.clone());
        };

        let settings: DisplaySettings = serde_json::from_str(&doc.body).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse settings record: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings as a single record.
    fn save(&self) -> Result<(), SettingsError> {
        let json = serde_json::to_string(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        self.db
            .put_document(SETTINGS_KEY, &json, SETTINGS_RECORD_VERSION)?;
        Ok(())
    }

    fn get_settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Updates one setting by its camelCase key (as it appears in exports).
    ///
    /// Converts the current settings to a `serde_json::Value`, replaces the
    /// field, then deserializes back into `DisplaySettings` so type and range
    /// checks apply. Saves after a successful update.
    ///
    /// # Examples
    /// - `"columnCount"` → updates `settings.column_count` (1..=6)
    /// - `"textColor"` → updates `settings.text_color`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        match json_value.as_object_mut() {
            Some(map) if map.contains_key(key) => {
                map.insert(key.to_string(), value);
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
        }

        let new_settings: DisplaySettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()?;
        tracing::debug!(key, "updated display setting");
        Ok(())
    }

    /// Replaces all settings at once (import) and saves.
    fn replace(&mut self, settings: DisplaySettings) -> Result<(), SettingsError> {
        self.settings = settings;
        self.save()
    }

    /// Resets all settings to defaults and saves.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.replace(DisplaySettings::default())
    }
}
