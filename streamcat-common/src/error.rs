//! Error types for streamcat
//!
//! Two families live here:
//! - [`CatalogError`]: the failure taxonomy of every Store and Query Engine operation. Adapters
//!   translate it into their own status vocabulary and never invent new kinds.
//! - [`Error`]: startup failures (configuration, seed loading) surfaced to the binary.

use thiserror::Error;

/// Result type for Store and Query Engine operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Common result type for startup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Entity type named in a [`CatalogError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Song,
    Playlist,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Song => "song",
            Entity::Playlist => "playlist",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a catalog operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Caller-supplied field violates a constraint
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Referenced entity does not exist at the time of the operation
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    /// A dependent entity does not exist (e.g. playlist owner)
    #[error("{field} references missing entity: {id}")]
    Referential { field: String, id: String },

    /// Unexpected invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`CatalogError`], used by adapters to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Referential,
    Internal,
}

impl ErrorKind {
    /// Stable name shared by every adapter's error payload
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Referential => "ReferentialError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl CatalogError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn referential(field: impl Into<String>, id: impl Into<String>) -> Self {
        CatalogError::Referential {
            field: field.into(),
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation { .. } => ErrorKind::Validation,
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Referential { .. } => ErrorKind::Referential,
            CatalogError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Offending field, when the error identifies one
    pub fn field(&self) -> Option<&str> {
        match self {
            CatalogError::Validation { field, .. } | CatalogError::Referential { field, .. } => {
                Some(field)
            }
            CatalogError::NotFound { .. } => Some("id"),
            CatalogError::Internal(_) => None,
        }
    }
}

/// Startup errors
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file could not be decoded
    #[error("Seed decode error in {file}: {source}")]
    SeedFormat {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Seed data violates a catalog invariant
    #[error("Invalid seed data: {0}")]
    Seed(#[from] CatalogError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_field() {
        let err = CatalogError::validation("age", "must be positive");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.to_string(), "Invalid age: must be positive");

        let err = CatalogError::not_found(Entity::Song, "s1");
        assert_eq!(err.kind().as_str(), "NotFound");
        assert_eq!(err.to_string(), "song not found: s1");

        let err = CatalogError::Internal("index drift".to_string());
        assert_eq!(err.field(), None);
    }
}
