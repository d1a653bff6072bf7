use async_trait::async_trait;

use crate::context::OpContext;
use crate::domain::error::UserRepoError;
use crate::domain::model::User;

/// Port for user persistence.
///
/// Implementations must produce the same results and the same error kinds for
/// the same data, whatever backend executes the statements.
///
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Duplicate `id` or `name` is rejected by storage and surfaces as
    /// [`UserRepoError::InsertFailed`].
    async fn register(&self, ctx: &OpContext, user: &User) -> Result<(), UserRepoError>;

    /// Load a user by primary key.
    ///
    /// A missing row is reported as [`UserRepoError::NotFound`]; every other
    /// failure as [`UserRepoError::LookupFailed`].
    async fn get(&self, ctx: &OpContext, id: &str) -> Result<User, UserRepoError>;

    /// All users in the order the backend returns them. Empty storage yields
    /// an empty vector.
    async fn list(&self, ctx: &OpContext) -> Result<Vec<User>, UserRepoError>;

    /// Delete the row whose primary key matches `user.id`.
    ///
    /// Deleting a user that does not exist is not an error.
    async fn delete(&self, ctx: &OpContext, user: &User) -> Result<(), UserRepoError>;
}
