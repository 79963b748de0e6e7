use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;

/// Collection handle over a document store for a single entity type.
///
/// Absent entities are reported as `None`, never as an error; deciding whether
/// absence is a failure belongs to the caller.
#[async_trait]
pub trait Collection<Entity, New, Patch>: Sync + Send {
    // stores a new entity and returns it with its assigned id
    async fn create(&self, input: &New) -> LibraryResult<Entity>;

    // every entity in store order
    async fn find(&self) -> LibraryResult<Vec<Entity>>;

    async fn find_by_id(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // removes an entity and returns its last stored state
    async fn find_by_id_and_delete(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // merges the patch into an entity and returns the merged state
    async fn find_by_id_and_update(&self, id: &str, patch: &Patch) -> LibraryResult<Option<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    InMemory,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LocalDynamoDB" => RepositoryStore::LocalDynamoDB,
            "InMemory" => RepositoryStore::InMemory,
            _ => RepositoryStore::DynamoDB,
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::DynamoDB => write!(f, "DynamoDB"),
            RepositoryStore::LocalDynamoDB => write!(f, "LocalDynamoDB"),
            RepositoryStore::InMemory => write!(f, "InMemory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_parse_store() {
        for store in [RepositoryStore::DynamoDB, RepositoryStore::LocalDynamoDB, RepositoryStore::InMemory] {
            assert_eq!(store, RepositoryStore::from(store.to_string()));
        }
        assert_eq!(RepositoryStore::DynamoDB, RepositoryStore::from("bogus".to_string()));
    }
}
