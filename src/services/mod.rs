// Pinboard services
// Stateless helpers and engines: metadata scraping, document upgrades, backup, settings.

pub mod backup;
pub mod document_migrations;
pub mod metadata_extractor;
pub mod settings_engine;
