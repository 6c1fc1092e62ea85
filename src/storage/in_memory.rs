//! In-memory repository implementations for testing and development

use crate::core::error::RestioError;
use crate::core::repository::{RelationshipRepository, ResourceRepository};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory resource repository
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Conflicts and missing ids are returned as typed
/// [`RestioError`] values inside `anyhow::Error`, so the HTTP boundary can
/// recover them by downcast.
#[derive(Clone)]
pub struct InMemoryResourceRepository {
    resource_type: String,
    resources: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryResourceRepository {
    /// Create an empty repository serving `resource_type`.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resources: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn find_one(&self, id: &str) -> Result<Option<Value>> {
        let resources = self
            .resources
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(resources.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<(String, Value)>> {
        let resources = self
            .resources
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut items: Vec<(String, Value)> = resources
            .iter()
            .map(|(id, attributes)| (id.clone(), attributes.clone()))
            .collect();
        // Stable listing order for clients and tests
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    async fn create(&self, id: Option<String>, attributes: Value) -> Result<(String, Value)> {
        let mut resources = self
            .resources
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if resources.contains_key(&id) {
            return Err(anyhow::Error::new(RestioError::ResourceAlreadyExists {
                resource_type: self.resource_type.clone(),
                id,
            }));
        }

        resources.insert(id.clone(), attributes.clone());

        Ok((id, attributes))
    }

    async fn update(&self, id: &str, attributes: Value) -> Result<Value> {
        let mut resources = self
            .resources
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let existing = resources.get_mut(id).ok_or_else(|| {
            anyhow::Error::new(RestioError::ResourceNotFound {
                resource_type: self.resource_type.clone(),
                id: id.to_string(),
            })
        })?;

        // Top-level merge: patched members replace, untouched members survive
        match (existing.as_object_mut(), attributes) {
            (Some(target), Value::Object(patch)) => {
                for (key, value) in patch {
                    target.insert(key, value);
                }
            }
            (_, replacement) => *existing = replacement,
        }

        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut resources = self
            .resources
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        resources.remove(id);

        Ok(())
    }
}

/// In-memory relationship repository
///
/// Linkage is kept per `(source id, field)` pair as an ordered target list;
/// to-one reads answer with the first target. Seeding goes through
/// [`set_targets`](Self::set_targets) and [`link`](Self::link) on the
/// concrete type before it is shared as a trait object.
#[derive(Clone)]
pub struct InMemoryRelationshipRepository {
    links: Arc<RwLock<HashMap<(String, String), Vec<String>>>>,
}

impl InMemoryRelationshipRepository {
    pub fn new() -> Self {
        Self {
            links: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replace the targets of `field` on `source_id`.
    pub fn set_targets(
        &self,
        source_id: impl Into<String>,
        field: impl Into<String>,
        targets: Vec<String>,
    ) -> Result<()> {
        let mut links = self
            .links
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        links.insert((source_id.into(), field.into()), targets);

        Ok(())
    }

    /// Append one target to `field` on `source_id`.
    pub fn link(
        &self,
        source_id: impl Into<String>,
        field: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Result<()> {
        let mut links = self
            .links
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        links
            .entry((source_id.into(), field.into()))
            .or_default()
            .push(target_id.into());

        Ok(())
    }
}

impl Default for InMemoryRelationshipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelationshipRepository for InMemoryRelationshipRepository {
    async fn find_one_target(&self, source_id: &str, field: &str) -> Result<Option<String>> {
        let links = self
            .links
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(links
            .get(&(source_id.to_string(), field.to_string()))
            .and_then(|targets| targets.first().cloned()))
    }

    async fn find_many_targets(&self, source_id: &str, field: &str) -> Result<Vec<String>> {
        let links = self
            .links
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(links
            .get(&(source_id.to_string(), field.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
