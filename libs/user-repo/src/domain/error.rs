use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Low-level failure reported while talking to a backend.
///
/// This is always carried as the `source` of a [`UserRepoError`], so its
/// rendering ends up verbatim at the tail of every repository error message.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The lookup completed but matched no row.
    #[error("no rows in result set")]
    NoRows,

    /// The caller's context was cancelled while the call was pending.
    #[error("context canceled")]
    Cancelled,

    /// The caller's deadline passed while the call was pending.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl StorageError {
    /// Whether the backend reported "no matching row", either as an empty
    /// result or as an explicit driver error.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows | Self::Db(DbErr::RecordNotFound(_)))
    }

    /// Whether the failure came from the caller's context rather than the backend.
    #[must_use]
    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Errors returned by [`crate::UserRepository`] operations.
///
/// Messages are deterministic: operation context, the user id where one is
/// known, then the storage cause.
#[derive(Debug, Error)]
pub enum UserRepoError {
    #[error("user was not found (id: {id}): {source}")]
    NotFound {
        id: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to get user (id: {id}): {source}")]
    LookupFailed {
        id: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to insert user: {source}")]
    InsertFailed {
        #[source]
        source: StorageError,
    },

    #[error("failed to list users: {source}")]
    ListFailed {
        #[source]
        source: StorageError,
    },

    #[error("failed to delete user: {source}")]
    DeleteFailed {
        #[source]
        source: StorageError,
    },
}

impl UserRepoError {
    #[must_use]
    pub fn not_found(id: impl Into<String>, source: StorageError) -> Self {
        Self::NotFound {
            id: id.into(),
            source,
        }
    }

    #[must_use]
    pub fn lookup_failed(id: impl Into<String>, source: StorageError) -> Self {
        Self::LookupFailed {
            id: id.into(),
            source,
        }
    }

    #[must_use]
    pub fn insert_failed(source: StorageError) -> Self {
        Self::InsertFailed { source }
    }

    #[must_use]
    pub fn list_failed(source: StorageError) -> Self {
        Self::ListFailed { source }
    }

    #[must_use]
    pub fn delete_failed(source: StorageError) -> Self {
        Self::DeleteFailed { source }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The user id the failed operation was about, when the error carries one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::NotFound { id, .. } | Self::LookupFailed { id, .. } => Some(id),
            Self::InsertFailed { .. } | Self::ListFailed { .. } | Self::DeleteFailed { .. } => {
                None
            }
        }
    }

    /// The wrapped storage cause.
    #[must_use]
    pub fn storage(&self) -> &StorageError {
        match self {
            Self::NotFound { source, .. }
            | Self::LookupFailed { source, .. }
            | Self::InsertFailed { source }
            | Self::ListFailed { source }
            | Self::DeleteFailed { source } => source,
        }
    }

    /// Whether the backend rejected the write because of a duplicate `id` or `name`.
    ///
    /// Diagnostic only: a duplicate insert is still an [`Self::InsertFailed`].
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.storage(),
            StorageError::Db(err)
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        )
    }
}
