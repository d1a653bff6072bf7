//! In-process SQL engine standing in for a real server.
//!
//! Each [`SqliteSimulator`] owns a private in-memory `SQLite` database with the
//! `user` table already created, so tests can run side by side without port
//! allocation or shared state. The database disappears with the simulator.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set,
};
use tracing::debug;

use crate::domain::model::User;
use crate::infra::storage::entity::{ActiveModel as UserAM, Entity as UserEntity, Model as UserRow};
use crate::infra::storage::schema;

const MEMORY_URL: &str = "sqlite::memory:";

/// Lifetime and idle limit of the single pooled connection. Recycling it
/// would replace the database with an empty one.
const KEEP_ALIVE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Clone, Debug)]
pub struct SqliteSimulator {
    conn: Arc<DatabaseConnection>,
}

impl SqliteSimulator {
    /// Boot a fresh engine with an empty `user` table.
    ///
    /// # Errors
    /// Returns an error if the engine cannot be opened or the schema cannot
    /// be created.
    pub async fn start() -> Result<Self, DbErr> {
        let conn = Database::connect(connect_options()).await?;
        schema::bootstrap(&conn).await?;
        debug!("SQLite simulator started");
        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Shared execution handle, for [`crate::SeaOrmUserRepository::shared`]
    /// or for opening a transaction.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Insert a raw row, bypassing the repository. `age` may be `None`.
    ///
    /// # Errors
    /// Returns the engine error, e.g. on a duplicate `id` or `name`.
    pub async fn seed_row(&self, row: UserRow) -> Result<(), DbErr> {
        let am = UserAM {
            id: Set(row.id),
            name: Set(row.name),
            age: Set(row.age),
        };
        UserEntity::insert(am)
            .exec_without_returning(self.conn.as_ref())
            .await?;
        Ok(())
    }

    /// Insert users in order, bypassing the repository.
    ///
    /// # Errors
    /// Stops at and returns the first failing insert.
    pub async fn seed(&self, users: &[User]) -> Result<(), DbErr> {
        for user in users {
            self.seed_row(UserRow::from(user)).await?;
        }
        Ok(())
    }

    /// Number of rows currently stored.
    ///
    /// # Errors
    /// Returns the engine error if the count query fails.
    pub async fn row_count(&self) -> Result<u64, DbErr> {
        UserEntity::find().count(self.conn.as_ref()).await
    }

    /// Shut the engine down. The data is gone afterwards.
    ///
    /// While repositories still share the handle the engine stays up and
    /// closes when the last of them is dropped.
    ///
    /// # Errors
    /// Returns the driver error if the pool fails to close cleanly.
    pub async fn close(self) -> Result<(), DbErr> {
        match Arc::into_inner(self.conn) {
            Some(conn) => conn.close().await,
            None => {
                debug!("SQLite simulator still shared, closing with the last handle");
                Ok(())
            }
        }
    }
}

/// One connection that is never recycled: every pooled connection would
/// otherwise see its own empty in-memory database.
fn connect_options() -> ConnectOptions {
    let mut opts = ConnectOptions::new(MEMORY_URL);
    opts.max_connections(1)
        .min_connections(1)
        .max_lifetime(KEEP_ALIVE)
        .idle_timeout(KEEP_ALIVE)
        .sqlx_logging(false);
    opts
}
