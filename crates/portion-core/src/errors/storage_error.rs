/// Errors from the durable local store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration to v{version} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("{kind} entry {id} not found")]
    NotFound { kind: String, id: i64 },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => "STORAGE_SQLITE",
            Self::MigrationFailed { .. } => "STORAGE_MIGRATION",
            Self::NotFound { .. } => "STORAGE_NOT_FOUND",
        }
    }
}
