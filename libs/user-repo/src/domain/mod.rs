//! Domain layer: the user model, the repository port and its error taxonomy.

pub mod error;
pub mod model;
pub mod repo;
