//! Cancellable per-operation context.
//!
//! Every repository call runs inside an [`OpContext`]. Cancelling the token
//! or passing the deadline drops the in-flight storage future and the call
//! fails with [`StorageError::Cancelled`] or [`StorageError::DeadlineExceeded`].

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::domain::error::StorageError;

#[derive(Clone, Debug, Default)]
pub struct OpContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled together with `token`.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Returns a copy of this context that expires after `timeout`.
    ///
    /// An earlier deadline already set on the context is kept.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a copy of this context that expires at `deadline`.
    ///
    /// An earlier deadline already set on the context is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            cancel: self.cancel.clone(),
            deadline: Some(deadline),
        }
    }

    /// Returns a context whose token is a child of this one: cancelling the
    /// child leaves the parent untouched.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The reason this context is done, if it already is.
    #[must_use]
    pub fn err(&self) -> Option<StorageError> {
        if self.cancel.is_cancelled() {
            return Some(StorageError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(StorageError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drives `fut` to completion unless the context finishes first.
    ///
    /// A context that is already done fails without polling `fut`, so no
    /// statement reaches the backend.
    ///
    /// # Errors
    /// Returns [`StorageError::Cancelled`] or [`StorageError::DeadlineExceeded`]
    /// when the context ends first, or the backend error produced by `fut`.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(StorageError::Cancelled),
            () = expired => Err(StorageError::DeadlineExceeded),
            res = fut => res.map_err(StorageError::from),
        }
    }
}
