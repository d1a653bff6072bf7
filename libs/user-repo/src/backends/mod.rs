//! Backend providers producing execution handles for the repository.
//!
//! - [`live`]: pooled connection to a running `MySQL` server (feature `mysql`).
//! - [`simulator`]: in-process `SQLite` engine holding the `user` table in
//!   memory (feature `sqlite`).
//!
//! Disposable containers and the scripted mock driver are test fixtures and
//! live in the integration-test support module.

#[cfg(feature = "mysql")]
pub mod live;
#[cfg(feature = "sqlite")]
pub mod simulator;
