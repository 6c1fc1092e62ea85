//! Repository traits for resource and relationship data access
//!
//! Repositories move attribute maps (`serde_json::Value` objects) in and
//! out of storage; they never see documents or URLs. Errors travel as
//! `anyhow::Error` so implementations can tunnel typed
//! [`RestioError`](crate::core::error::RestioError)s through to the HTTP
//! boundary, which recovers them by downcast.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// CRUD access to the resources of one type.
///
/// The framework is agnostic to the underlying storage mechanism; an entry
/// carries its repository as an `Arc<dyn ResourceRepository>`.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Fetch one resource's attributes by id
    async fn find_one(&self, id: &str) -> Result<Option<Value>>;

    /// Fetch all resources as `(id, attributes)` pairs
    async fn find_all(&self) -> Result<Vec<(String, Value)>>;

    /// Store a new resource, generating an id when the caller supplies none;
    /// returns the stored `(id, attributes)` pair
    async fn create(&self, id: Option<String>, attributes: Value) -> Result<(String, Value)>;

    /// Merge changed attributes into an existing resource and return the
    /// merged attributes
    async fn update(&self, id: &str, attributes: Value) -> Result<Value>;

    /// Remove a resource; removing an absent id is not an error
    async fn delete(&self, id: &str) -> Result<()>;
}

impl std::fmt::Debug for dyn ResourceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ResourceRepository")
    }
}

/// Access to the linkage of one resource type's relationship fields.
///
/// Targets are returned as bare ids; the opposite type name comes from the
/// resource metadata, so callers can build full identifiers without the
/// repository knowing about types.
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Target id of a to-one field, if linked
    async fn find_one_target(&self, source_id: &str, field: &str) -> Result<Option<String>>;

    /// Target ids of a to-many field, in linkage order
    async fn find_many_targets(&self, source_id: &str, field: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct SingleTask;

    #[async_trait]
    impl ResourceRepository for SingleTask {
        async fn find_one(&self, id: &str) -> Result<Option<Value>> {
            if id == "1" {
                Ok(Some(serde_json::json!({ "name": "Close the accounts" })))
            } else {
                Ok(None)
            }
        }

        async fn find_all(&self) -> Result<Vec<(String, Value)>> {
            Ok(vec![(
                "1".to_string(),
                serde_json::json!({ "name": "Close the accounts" }),
            )])
        }

        async fn create(&self, _id: Option<String>, attributes: Value) -> Result<(String, Value)> {
            Ok(("1".to_string(), attributes))
        }

        async fn update(&self, _id: &str, attributes: Value) -> Result<Value> {
            Ok(attributes)
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_repository_usable_as_trait_object() {
        let repository: Arc<dyn ResourceRepository> = Arc::new(SingleTask);
        let found = repository.find_one("1").await.unwrap();
        assert!(found.is_some());
        assert!(repository.find_one("2").await.unwrap().is_none());
        assert_eq!(repository.find_all().await.unwrap().len(), 1);
    }
}
