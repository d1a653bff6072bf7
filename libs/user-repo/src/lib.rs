#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! User repository over interchangeable SQL backends.
//!
//! This crate manages exactly one entity kind, [`User`], through a small
//! repository contract ([`UserRepository`]): register, get, list and delete.
//! The repository is generic over the SQL execution handle ([`DbConnTrait`]),
//! so the same business logic runs unchanged against:
//!
//! - a live `MySQL` server ([`backends::live`], feature `mysql`),
//! - a disposable `MySQL` container (test support),
//! - an in-process `SQLite` engine ([`backends::simulator`], feature `sqlite`),
//! - the `SeaORM` mock driver.
//!
//! Storage failures are reclassified into [`UserRepoError`] kinds whose
//! rendered messages are stable and carry the original cause verbatim.
//!
//! # Example
//! ```rust,no_run
//! use user_repo::{OpContext, SeaOrmUserRepository, User, UserRepository};
//! use user_repo::backends::live::{ClientConfig, connect};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = connect(&ClientConfig::load()?).await?;
//! let repo = SeaOrmUserRepository::new(conn);
//! let ctx = OpContext::background();
//!
//! let mike = User::new("0123456789ABCDEFGHJKMNPQRS", "Mike", 20);
//! repo.register(&ctx, &mike).await?;
//! assert_eq!(repo.get(&ctx, &mike.id).await?, mike);
//! # Ok(())
//! # }
//! ```

pub use sea_orm::ConnectionTrait as DbConnTrait;

pub mod backends;
pub mod context;
pub mod domain;
pub mod infra;

pub use context::OpContext;
pub use domain::error::{StorageError, UserRepoError};
pub use domain::model::User;
pub use domain::repo::UserRepository;
pub use infra::storage::sea_orm_repo::SeaOrmUserRepository;
