use std::{path::PathBuf, sync::Arc};
use tokio::sync::RwLock;
use tracing::warn;

use models::{User, UserInput};

use crate::errors::ServiceError;
use crate::storage::snapshot::JsonSnapshot;
use crate::users::UserDirectoryStore;

/// File-backed user directory.
///
/// The authoritative collection lives in memory in insertion order together
/// with the id counter; the snapshot is rewritten after every mutation. The
/// write guard is held across the snapshot write, so at most one mutation
/// (including its file write) is in flight at a time.
#[derive(Clone)]
pub struct UserStore {
    inner: Arc<RwLock<DirectoryState>>,
    snapshot: JsonSnapshot<User>,
}

struct DirectoryState {
    users: Vec<User>,
    next_id: u64,
}

impl UserStore {
    /// Load-or-empty construction: an absent, unreadable, or malformed
    /// snapshot starts an empty directory. `next_id` resumes above every
    /// persisted id, so ids are never reused across restarts.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let snapshot = JsonSnapshot::<User>::new(path).await;
        let users = snapshot.load().await;
        let next_id = users.iter().map(|u| u.id).max().map_or(1, |max| max + 1);
        Arc::new(Self {
            inner: Arc::new(RwLock::new(DirectoryState { users, next_id })),
            snapshot,
        })
    }

    /// List all records in insertion order.
    pub async fn list(&self) -> Vec<User> {
        let state = self.inner.read().await;
        state.users.clone()
    }

    /// Look up a record by the decimal rendering of its id.
    pub async fn get(&self, id: &str) -> Option<User> {
        let state = self.inner.read().await;
        state.users.iter().find(|u| u.id.to_string() == id).cloned()
    }

    /// Append a new record with the next id and persist.
    ///
    /// A failed snapshot write is reported to the caller but the append is
    /// not rolled back; the record lands in the next successful snapshot.
    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let mut state = self.inner.write().await;
        let user = User { id: state.next_id, name: input.name, email: input.email };
        state.next_id += 1;
        state.users.push(user.clone());
        if let Err(e) = self.snapshot.save(&state.users).await {
            warn!(id = user.id, error = %e, "snapshot write failed after create; memory ahead of disk");
            return Err(e);
        }
        Ok(user)
    }

    /// Replace `name`/`email` of the record with the given id and persist.
    /// The id itself is never changed by an update.
    pub async fn update(&self, id: &str, input: UserInput) -> Result<User, ServiceError> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id.to_string() == id)
            .ok_or_else(|| ServiceError::not_found("user"))?;
        user.name = input.name;
        user.email = input.email;
        let updated = user.clone();
        if let Err(e) = self.snapshot.save(&state.users).await {
            warn!(id = updated.id, error = %e, "snapshot write failed after update; memory ahead of disk");
            return Err(e);
        }
        Ok(updated)
    }

    /// Remove the record with the given id and persist; returns whether a
    /// record existed. Remaining records keep their order.
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let mut state = self.inner.write().await;
        let pos = match state.users.iter().position(|u| u.id.to_string() == id) {
            Some(pos) => pos,
            None => return Ok(false),
        };
        let removed = state.users.remove(pos);
        if let Err(e) = self.snapshot.save(&state.users).await {
            warn!(id = removed.id, error = %e, "snapshot write failed after delete; memory ahead of disk");
            return Err(e);
        }
        Ok(true)
    }
}

#[async_trait::async_trait]
impl UserDirectoryStore for UserStore {
    async fn list(&self) -> Vec<User> { self.list().await }
    async fn get(&self, id: &str) -> Option<User> { self.get(id).await }
    async fn create(&self, input: UserInput) -> Result<User, ServiceError> { self.create(input).await }
    async fn update(&self, id: &str, input: UserInput) -> Result<User, ServiceError> { self.update(id, input).await }
    async fn delete(&self, id: &str) -> Result<bool, ServiceError> { self.delete(id).await }
}
