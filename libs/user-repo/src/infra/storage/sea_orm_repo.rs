//! `SeaORM`-backed implementation of the [`UserRepository`] port.
//!
//! The repository is generic over the execution handle, so a pooled `MySQL`
//! connection, an in-memory `SQLite` engine, a `SeaORM` mock connection or an
//! open transaction all run the exact same statements:
//!
//! | operation  | statement (`MySQL` dialect)                                              |
//! |------------|------------------------------------------------------------------------|
//! | `register` | ``INSERT INTO `user` (`id`, `name`, `age`) VALUES (?, ?, ?)``          |
//! | `get`      | ``SELECT `user`.`id`, `user`.`name`, `user`.`age` FROM `user` WHERE `user`.`id` = ? LIMIT ?`` |
//! | `list`     | ``SELECT `user`.`id`, `user`.`name`, `user`.`age` FROM `user` ``       |
//! | `delete`   | ``DELETE FROM `user` WHERE `user`.`id` = ?``                           |

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::EntityTrait;
use tracing::{debug, instrument, warn};

use crate::DbConnTrait;
use crate::context::OpContext;
use crate::domain::error::{StorageError, UserRepoError};
use crate::domain::model::User;
use crate::domain::repo::UserRepository;
use crate::infra::storage::entity::{ActiveModel as UserAM, Entity as UserEntity};
use crate::infra::storage::mapper::primary_key;
use crate::infra::storage::schema::db_system;

/// `SeaORM` repository over any connection implementing [`DbConnTrait`].
///
/// Holds nothing but a shared handle to the connection; concurrent calls on
/// one instance are independent and consistency is left to the backend.
#[derive(Debug)]
pub struct SeaOrmUserRepository<C> {
    conn: Arc<C>,
}

impl<C> Clone for SeaOrmUserRepository<C> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

impl<C: DbConnTrait> SeaOrmUserRepository<C> {
    /// Create a new repository owning an execution handle.
    #[must_use]
    pub fn new(conn: C) -> Self {
        Self::shared(Arc::new(conn))
    }

    /// Create a new repository on a handle shared with other owners, such as
    /// the in-process simulator.
    #[must_use]
    pub fn shared(conn: Arc<C>) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn conn(&self) -> &C {
        &self.conn
    }

    /// Give the execution handle back, or `None` while other owners still
    /// hold it.
    #[must_use]
    pub fn into_inner(self) -> Option<C> {
        Arc::into_inner(self.conn)
    }

    fn db_system(&self) -> &'static str {
        db_system(self.conn.get_database_backend())
    }
}

#[async_trait]
impl<C> UserRepository for SeaOrmUserRepository<C>
where
    C: DbConnTrait + Send + Sync,
{
    #[instrument(
        name = "user_repo.repo.register",
        skip(self, ctx, user),
        fields(
            db.system = self.db_system(),
            db.operation = "INSERT",
            user.id = %user.id
        )
    )]
    async fn register(&self, ctx: &OpContext, user: &User) -> Result<(), UserRepoError> {
        debug!("Registering user");

        let row = UserAM::from(user);
        ctx.run(UserEntity::insert(row).exec_without_returning(self.conn.as_ref()))
            .await
            .map_err(|err| {
                warn!(error = %err, "Insert failed");
                UserRepoError::insert_failed(err)
            })?;

        Ok(())
    }

    #[instrument(
        name = "user_repo.repo.get",
        skip(self, ctx, id),
        fields(
            db.system = self.db_system(),
            db.operation = "SELECT",
            user.id = %id
        )
    )]
    async fn get(&self, ctx: &OpContext, id: &str) -> Result<User, UserRepoError> {
        debug!("Getting user by id");

        let found = ctx
            .run(UserEntity::find_by_id(id.to_owned()).one(self.conn.as_ref()))
            .await
            .and_then(|row| row.ok_or(StorageError::NoRows));

        match found {
            Ok(row) => {
                debug!("Successfully retrieved user");
                Ok(row.into())
            }
            Err(err) if err.is_no_rows() => {
                debug!(error = %err, "User not found");
                Err(UserRepoError::not_found(id, err))
            }
            Err(err) => {
                warn!(error = %err, "Lookup failed");
                Err(UserRepoError::lookup_failed(id, err))
            }
        }
    }

    #[instrument(
        name = "user_repo.repo.list",
        skip(self, ctx),
        fields(db.system = self.db_system(), db.operation = "SELECT")
    )]
    async fn list(&self, ctx: &OpContext) -> Result<Vec<User>, UserRepoError> {
        debug!("Listing users");

        let rows = ctx
            .run(UserEntity::find().all(self.conn.as_ref()))
            .await
            .map_err(|err| {
                warn!(error = %err, "List failed");
                UserRepoError::list_failed(err)
            })?;

        debug!(count = rows.len(), "Listed users");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(
        name = "user_repo.repo.delete",
        skip(self, ctx, user),
        fields(
            db.system = self.db_system(),
            db.operation = "DELETE",
            user.id = %user.id
        )
    )]
    async fn delete(&self, ctx: &OpContext, user: &User) -> Result<(), UserRepoError> {
        debug!("Deleting user");

        let res = ctx
            .run(UserEntity::delete_by_id(primary_key(user)).exec(self.conn.as_ref()))
            .await
            .map_err(|err| {
                warn!(error = %err, "Delete failed");
                UserRepoError::delete_failed(err)
            })?;

        debug!(rows_affected = res.rows_affected, "Deleted user");
        Ok(())
    }
}
