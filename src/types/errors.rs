use std::fmt;

// === MetadataError ===

/// Errors raised while fetching page metadata for a candidate URL.
#[derive(Debug)]
pub enum MetadataError {
    /// The request carried no URL.
    MissingUrl,
    /// The remote host answered with a non-success status.
    FetchFailed { status: u16 },
    /// The request could not be completed (DNS, TLS, timeout, body read).
    Network(String),
}

impl MetadataError {
    /// HTTP status the metadata endpoint reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            MetadataError::MissingUrl => 400,
            MetadataError::FetchFailed { status } => *status,
            MetadataError::Network(_) => 500,
        }
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::MissingUrl => write!(f, "URL is required"),
            MetadataError::FetchFailed { status } => {
                write!(f, "Failed to fetch URL: upstream returned {}", status)
            }
            MetadataError::Network(msg) => write!(f, "Failed to fetch metadata: {}", msg),
        }
    }
}

impl std::error::Error for MetadataError {}

// === ValidationError ===

/// Missing required fields on a new bookmark.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    MissingUrl,
    NoCategory,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingName => write!(f, "Service name is required"),
            ValidationError::MissingUrl => write!(f, "Service URL is required"),
            ValidationError::NoCategory => write!(f, "At least one category must be selected"),
        }
    }
}

impl std::error::Error for ValidationError {}

// === StoreError ===

/// Errors related to pinboard store operations.
#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Service with the given ID was not found.
    ServiceNotFound(String),
    /// Category with the given ID was not found.
    CategoryNotFound(String),
    /// Another category already uses the given name.
    DuplicateCategory(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ServiceNotFound(id) => write!(f, "Service not found: {}", id),
            StoreError::CategoryNotFound(id) => write!(f, "Category not found: {}", id),
            StoreError::DuplicateCategory(name) => {
                write!(f, "Category already exists: {}", name)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === ImportError ===

/// Errors raised while reading a backup document. An import that fails never mutates the board.
#[derive(Debug)]
pub enum ImportError {
    /// The text is not valid JSON.
    Parse(String),
    /// The JSON does not have the backup document shape.
    InvalidShape(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Parse(msg) => write!(f, "Import parse error: {}", msg),
            ImportError::InvalidShape(msg) => write!(f, "Invalid import document: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

// === StorageError ===

/// Errors related to reading or writing persisted documents.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    Database(String),
    /// Failed to serialize or deserialize a stored document.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Database(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to display settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// Reading or writing the settings record failed.
    Storage(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Storage(msg) => write!(f, "Settings storage error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e.to_string())
    }
}
