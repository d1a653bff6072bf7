//! `SeaORM` storage: row entity, mapper, schema bootstrap and the repository.

pub mod entity;
pub mod mapper;
pub mod schema;
pub mod sea_orm_repo;
