use async_trait::async_trait;
use models::{User, UserInput};

use crate::errors::ServiceError;

/// Trait abstraction for the user directory (CRUD over user records).
/// Implementations can be file-backed, database-backed, or remote.
///
/// Lookup ids are passed as text and matched against the decimal rendering
/// of the record id, so `"007"` does not address record `7`.
#[async_trait]
pub trait UserDirectoryStore: Send + Sync {
    async fn list(&self) -> Vec<User>;
    async fn get(&self, id: &str) -> Option<User>;
    async fn create(&self, input: UserInput) -> Result<User, ServiceError>;
    async fn update(&self, id: &str, input: UserInput) -> Result<User, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}
