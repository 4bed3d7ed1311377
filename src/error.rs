use thiserror::Error;

pub type MappingResult<T> = Result<T, MappingError>;

#[derive(Error, Debug)]
pub enum MappingError {
    /// The payload was written by a newer schema than this code understands.
    #[error(
        "cannot decode {type_name}: archived version {archived_version} is newer than current version {current_version}"
    )]
    NewerVersion {
        type_name: &'static str,
        archived_version: u32,
        current_version: u32,
    },

    #[error("type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("missing value for required field '{key}' of type {type_name}")]
    MissingField {
        key: String,
        type_name: &'static str,
    },

    #[error("invalid migration on key '{key}': {reason}")]
    InvalidMigration { key: String, reason: String },

    #[error("key '{key}' is reserved for the schema version marker")]
    ReservedKey { key: String },

    #[error("record has {trailing} trailing byte(s) after its last entry")]
    TrailingBytes { trailing: usize },

    #[error(transparent)]
    Encode(#[from] bincode::error::EncodeError),

    #[error(transparent)]
    Decode(#[from] bincode::error::DecodeError),

    #[cfg(feature = "sled")]
    #[error("Sled Error: {0}")]
    Sled(#[from] sled::Error),
}

impl MappingError {
    pub(crate) fn mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        MappingError::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Whether the error came from the schema history rather than the data.
    pub fn is_migration_error(&self) -> bool {
        matches!(
            self,
            MappingError::NewerVersion { .. } | MappingError::InvalidMigration { .. }
        )
    }
}
