//! Conversions between the domain [`User`] and the `user` table row.
//!
//! This is the only place where the nullable `age` column meets the plain
//! integer of the domain model: writes always store `Some(age)`, reads turn a
//! missing value into `0`.

use sea_orm::Set;

use crate::domain::model::User;
use crate::infra::storage::entity::{ActiveModel as UserAM, Model as UserEntity};

/// Convert a database row to a domain model (owned version)
impl From<UserEntity> for User {
    fn from(e: UserEntity) -> Self {
        Self {
            id: e.id,
            name: e.name,
            age: e.age.unwrap_or_default(),
        }
    }
}

/// Convert a database row to a domain model (by-ref version)
impl From<&UserEntity> for User {
    fn from(e: &UserEntity) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            age: e.age.unwrap_or_default(),
        }
    }
}

/// Row for a fresh insert: every column is set, `age` included.
impl From<&User> for UserAM {
    fn from(u: &User) -> Self {
        Self {
            id: Set(u.id.clone()),
            name: Set(u.name.clone()),
            age: Set(Some(u.age)),
        }
    }
}

impl From<&User> for UserEntity {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            age: Some(u.age),
        }
    }
}

/// Primary key identifying the stored row of `user`.
#[must_use]
pub fn primary_key(user: &User) -> String {
    user.id.clone()
}
