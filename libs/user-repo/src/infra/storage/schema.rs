//! `user` table bootstrap for disposable backends.
//!
//! Production databases are expected to carry the schema already; the
//! container and simulator providers call [`bootstrap`] right after they
//! come up.

use sea_orm::{DatabaseBackend, DbErr};
use tracing::info;

use crate::DbConnTrait;

const MYSQL_DDL: &str = r"
CREATE TABLE IF NOT EXISTS `user` (
    `id` CHAR(26) NOT NULL,
    `name` VARCHAR(255) NOT NULL,
    `age` INT NULL,
    PRIMARY KEY (`id`),
    UNIQUE KEY `idx_user_name` (`name`)
);
";

const SQLITE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    "id" TEXT PRIMARY KEY NOT NULL,
    "name" TEXT NOT NULL,
    "age" INTEGER NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_user_name ON "user"("name");
"#;

/// DDL creating the `user` table for `backend`, if the crate ships a driver
/// for it.
#[must_use]
pub fn ddl_for(backend: DatabaseBackend) -> Option<&'static str> {
    match backend {
        DatabaseBackend::MySql => Some(MYSQL_DDL),
        DatabaseBackend::Sqlite => Some(SQLITE_DDL),
        DatabaseBackend::Postgres => None,
    }
}

/// Create the `user` table if it does not exist yet.
///
/// # Errors
/// Returns [`DbErr::Custom`] for a backend without a schema, or the backend
/// error if the DDL cannot be executed.
pub async fn bootstrap<C: DbConnTrait>(conn: &C) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let ddl = ddl_for(backend).ok_or_else(|| {
        DbErr::Custom(format!(
            "no user table schema for {}",
            db_system(backend)
        ))
    })?;
    conn.execute_unprepared(ddl).await?;
    info!(db.system = db_system(backend), "user table ready");
    Ok(())
}

/// `OpenTelemetry` `db.system` value for a backend.
#[must_use]
pub fn db_system(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::MySql => "mysql",
        DatabaseBackend::Postgres => "postgresql",
        DatabaseBackend::Sqlite => "sqlite",
    }
}
