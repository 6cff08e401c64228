//! Pinboard database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key-value document store.
//!
//! # Usage
//!
//! ```no_run
//! use pinboard::database::Database;
//!
//! let db = Database::open("pinboard.db").expect("failed to open database");
//! db.put_document("pinboard-data", "{}", 3).expect("write failed");
//! let doc = db.get_document("pinboard-data").expect("read failed");
//! assert!(doc.is_some());
//! ```

pub mod connection;
pub mod migrations;

pub use connection::{Database, StoredDocument};
