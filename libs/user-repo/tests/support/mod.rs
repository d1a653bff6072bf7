#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)] // Each test binary uses a different subset of the fixtures

//! Per-test fixtures for the backend variants.
//!
//! Every helper hands ownership of its backend to the calling test; nothing
//! is shared between tests and everything is torn down on drop.

use std::sync::Once;

use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, Transaction, Value,
};
use tracing_subscriber::EnvFilter;

use user_repo::User;
use user_repo::infra::storage::entity::Model as UserRow;

#[cfg(feature = "mysql")]
mod container;
#[cfg(feature = "mysql")]
#[allow(unused_imports)]
pub use container::{MysqlUnderTest, bring_up_mysql};

pub const MIKE_ID: &str = "0123456789ABCDEFGHJKMNPQRS";
pub const BOB_ID: &str = "1123456789ABCDEFGHJKMNPQRS";

pub const SELECT_BY_ID: &str =
    "SELECT `user`.`id`, `user`.`name`, `user`.`age` FROM `user` WHERE `user`.`id` = ? LIMIT ?";
pub const SELECT_ALL: &str = "SELECT `user`.`id`, `user`.`name`, `user`.`age` FROM `user`";
pub const INSERT: &str = "INSERT INTO `user` (`id`, `name`, `age`) VALUES (?, ?, ?)";
pub const DELETE_BY_ID: &str = "DELETE FROM `user` WHERE `user`.`id` = ?";

/// Install a test-writer subscriber once per test binary. `RUST_LOG` selects levels.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

#[must_use]
pub fn mike() -> User {
    User::new(MIKE_ID, "Mike", 20)
}

#[must_use]
pub fn bob() -> User {
    User::new(BOB_ID, "Bob", 25)
}

#[must_use]
pub fn row(user: &User) -> UserRow {
    UserRow::from(user)
}

// ---------------------------------------------------------------------------
// Scripted mock driver
// ---------------------------------------------------------------------------

/// Mock connection answering successive SELECTs with `result_sets`.
#[must_use]
pub fn mock_rows(result_sets: Vec<Vec<UserRow>>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results(result_sets)
        .into_connection()
}

/// Mock connection failing its first SELECT with `err`.
#[must_use]
pub fn mock_query_error(err: DbErr) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql)
        .append_query_errors([err])
        .into_connection()
}

/// Mock connection acknowledging `count` writes with one affected row each.
#[must_use]
pub fn mock_writes(count: usize) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results((0..count).map(|_| MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }))
        .into_connection()
}

/// Mock connection failing its first write with `err`.
#[must_use]
pub fn mock_exec_error(err: DbErr) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_errors([err])
        .into_connection()
}

/// Expected log entry for one `MySQL` statement.
pub fn mysql_stmt<I>(sql: &str, values: I) -> Transaction
where
    I: IntoIterator<Item = Value>,
{
    Transaction::from_sql_and_values(DatabaseBackend::MySql, sql, values)
}
