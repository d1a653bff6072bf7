/// A user record as seen by callers of the repository.
///
/// The model is independent of the storage row shape: `age` is always a
/// concrete integer here, while storage keeps it nullable. The coercion
/// lives in [`crate::infra::storage::mapper`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// 26-character lexically sortable identifier, supplied by the caller.
    pub id: String,
    /// Unique display name. Uniqueness is enforced by storage.
    pub name: String,
    pub age: i32,
}

impl User {
    /// Length of a well-formed user identifier.
    pub const ID_LEN: usize = 26;

    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
        }
    }
}
