use axum_helpers::AppError;
use thiserror::Error;

/// Failure reported by a [`Repository`](crate::Repository).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    /// A value could not be converted to the stored type (e.g. a malformed id).
    #[error("Invalid {path}: {value}")]
    Cast { path: String, value: String },

    /// The document violates the collection schema.
    #[error("{0}")]
    Validation(String),

    /// A unique index rejected the write.
    #[error("Duplicate {field} value: {value}. Please use another value")]
    DuplicateKey { field: String, value: String },

    /// Anything the backend reports that has no better classification.
    #[error("{0}")]
    Backend(String),
}

impl StorageError {
    pub fn cast(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Cast {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Page and limit must be positive numbers")]
    InvalidPagination,

    #[error("Invalid fields selection: {0}")]
    InvalidProjection(String),

    #[error("Error executing query: {source}")]
    Execution {
        #[source]
        source: StorageError,
    },
}

impl QueryError {
    pub fn execution(source: StorageError) -> Self {
        Self::Execution { source }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Cast { .. } | StorageError::Validation(_) => {
                AppError::Validation(err.to_string())
            }
            StorageError::DuplicateKey { .. } => AppError::Conflict(err.to_string()),
            StorageError::Backend(detail) => AppError::Internal(detail),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidPagination => AppError::InvalidPagination(err.to_string()),
            QueryError::InvalidProjection(_) => AppError::Validation(err.to_string()),
            QueryError::Execution { ref source } => {
                let message = err.to_string();
                match source {
                    StorageError::Cast { .. } | StorageError::Validation(_) => {
                        AppError::Validation(message)
                    }
                    StorageError::DuplicateKey { .. } => AppError::Conflict(message),
                    StorageError::Backend(_) => AppError::Internal(message),
                }
            }
        }
    }
}
