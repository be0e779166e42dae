use serde::{Deserialize, Serialize};

/// A user record as held in the store and persisted in the snapshot.
///
/// `id` is assigned by the store and immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Create/update payload: carries no `id`, so any id supplied by a client
/// is dropped during deserialization rather than checked by hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}
