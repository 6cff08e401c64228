//! App Core for the pinboard.
//!
//! Central struct holding the database, the board manager, the settings
//! engine and the metadata fetcher.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::pinboard_manager::PinboardManager;
use crate::services::backup::{self, ImportOutcome};
use crate::services::metadata_extractor::MetadataFetcher;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::ImportError;
use crate::types::pinboard::ExportDocument;

/// Central application struct holding all managers and services.
pub struct App {
    pub db: Arc<Database>,
    pub pinboard: PinboardManager,
    pub settings_engine: SettingsEngine,
    pub metadata_fetcher: MetadataFetcher,
}

impl App {
    /// Opens the database at `db_path`, then loads the board and settings.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Self::from_database(db)
    }

    /// An app backed by a throwaway in-memory database.
    pub fn in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Self::from_database(db)
    }

    fn from_database(db: Arc<Database>) -> Result<Self, Box<dyn std::error::Error>> {
        let pinboard = PinboardManager::load(db.clone());

        let mut settings_engine = SettingsEngine::new(db.clone());
        if let Err(e) = settings_engine.load() {
            tracing::warn!(error = %e, "stored display settings are unreadable, using defaults");
        }

        let metadata_fetcher = MetadataFetcher::new()?;

        Ok(Self {
            db,
            pinboard,
            settings_engine,
            metadata_fetcher,
        })
    }

    /// Snapshot of the board and settings for a backup file.
    pub fn export_backup(&self) -> ExportDocument {
        backup::export_document(self.pinboard.data(), self.settings_engine.get_settings())
    }

    /// Parses `text` and, only if the whole document is acceptable, replaces
    /// the board and applies the imported settings.
    pub fn import_backup(&mut self, text: &str) -> Result<ImportOutcome, ImportError> {
        let outcome = backup::parse_import(text, self.settings_engine.get_settings())?;

        if let Some(data) = outcome.data.clone() {
            self.pinboard.replace_data(data);
        }
        if let Err(e) = self.settings_engine.replace(outcome.settings.clone()) {
            tracing::error!(error = %e, "failed to persist imported settings");
        }

        tracing::info!(
            replaced_board = outcome.data.is_some(),
            settings = outcome.applied_settings.len(),
            "imported backup"
        );
        Ok(outcome)
    }
}
