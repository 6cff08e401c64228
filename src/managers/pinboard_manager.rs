//! Board persistence around [`PinboardStore`].
//!
//! Loads the board document from the database (upgrading older shapes on the
//! way in) and writes the full document back after every mutation. Writes are
//! fire-and-forget: a failure is logged and the in-memory change stands.

use std::sync::Arc;

use crate::database::Database;
use crate::managers::pinboard_store::{PinboardStore, PinboardStoreTrait};
use crate::services::document_migrations::{self, CURRENT_DOCUMENT_VERSION};
use crate::types::errors::{StorageError, StoreError, ValidationError};
use crate::types::pinboard::PinboardData;
use crate::types::service::{NewService, ServiceUpdate};

/// Storage key of the board document.
pub const DATA_KEY: &str = "pinboard-data";

/// Owns the board state and keeps the persisted copy in step with it.
pub struct PinboardManager {
    db: Arc<Database>,
    store: PinboardStore,
}

impl PinboardManager {
    /// Loads the stored board, or the seed board when nothing usable is stored.
    pub fn load(db: Arc<Database>) -> Self {
        let data = match Self::read_stored(&db) {
            Ok(Some(data)) => {
                tracing::info!(
                    services = data.services.len(),
                    categories = data.categories.len(),
                    "loaded board"
                );
                data
            }
            Ok(None) => {
                tracing::info!("no stored board, starting from the seed board");
                PinboardData::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored board is unreadable, starting from the seed board");
                PinboardData::default()
            }
        };
        Self {
            db,
            store: PinboardStore::new(data),
        }
    }

    /// Wraps an explicit board without reading storage. Nothing is written until the first mutation.
    pub fn with_data(db: Arc<Database>, data: PinboardData) -> Self {
        Self {
            db,
            store: PinboardStore::new(data),
        }
    }

    fn read_stored(db: &Database) -> Result<Option<PinboardData>, StorageError> {
        let Some(doc) = db.get_document(DATA_KEY)? else {
            return Ok(None);
        };
        let value: serde_json::Value = serde_json::from_str(&doc.body)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let value = document_migrations::migrate(value, doc.schema_version);
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Read access to the board and its views.
    pub fn store(&self) -> &PinboardStore {
        &self.store
    }

    pub fn data(&self) -> &PinboardData {
        self.store.data()
    }

    /// Writes the whole board document.
    pub fn persist(&self) -> Result<(), StorageError> {
        let body = serde_json::to_string(self.store.data())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.db.put_document(DATA_KEY, &body, CURRENT_DOCUMENT_VERSION)
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "failed to persist board, change kept in memory only");
        }
    }

    /// Runs a mutation and persists the board afterwards.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut PinboardStore) -> T) -> T {
        let out = f(&mut self.store);
        self.persist_or_log();
        out
    }

    /// Runs a fallible mutation; the board is persisted only when it succeeds.
    pub fn try_mutate<T, E>(&mut self, f: impl FnOnce(&mut PinboardStore) -> Result<T, E>) -> Result<T, E> {
        let out = f(&mut self.store)?;
        self.persist_or_log();
        Ok(out)
    }

    /// Adds a service after checking the fields the add form requires.
    /// Its flags join the shared vocabulary first.
    pub fn add_service_checked(&mut self, service: NewService) -> Result<String, ValidationError> {
        service.validate()?;
        Ok(self.mutate(|store| {
            register_flags(store, &service.flags);
            store.add_service(service)
        }))
    }

    /// Merges `update` into a service, registering any flags it attaches before
    /// the vocabulary is pruned. An unknown id changes nothing.
    pub fn update_service(&mut self, id: &str, update: ServiceUpdate) -> Result<(), StoreError> {
        self.try_mutate(|store| {
            if store.get_service(id).is_none() {
                return Err(StoreError::ServiceNotFound(id.to_string()));
            }
            if let Some(flags) = &update.flags {
                register_flags(store, flags);
            }
            store.update_service(id, update)
        })
    }

    /// Toggles a section's tag filter. Filter selections are view state and are not persisted.
    pub fn toggle_tag_filter(&mut self, category_id: &str, tag: &str) -> bool {
        self.store.toggle_tag_filter(category_id, tag)
    }

    /// Replaces the board wholesale (import).
    pub fn replace_data(&mut self, data: PinboardData) {
        self.mutate(|store| store.replace_data(data));
    }
}

fn register_flags(store: &mut PinboardStore, flags: &[String]) {
    for flag in flags {
        store.add_flag(flag);
    }
}
