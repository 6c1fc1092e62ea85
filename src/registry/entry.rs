//! Registry entries binding resource metadata to repository handles

use crate::core::error::{RestioError, RestioResult};
use crate::core::information::ResourceInformation;
use crate::core::repository::{RelationshipRepository, ResourceRepository};
use crate::registry::ResourceRegistry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Immutable bundle of one resource's metadata and repository handles.
///
/// Entries are owned by the registry that stores them and handed out as
/// `Arc` clones. The only state written after construction is the resolved
/// parent link, computed on first access and cached.
pub struct RegistryEntry {
    information: ResourceInformation,
    repository: Option<Arc<dyn ResourceRepository>>,
    relationship_repositories: HashMap<String, Arc<dyn RelationshipRepository>>,
    parent: OnceLock<Option<Arc<RegistryEntry>>>,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("information", &self.information)
            .field("has_repository", &self.repository.is_some())
            .field(
                "relationship_repositories",
                &self.relationship_repositories.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl RegistryEntry {
    /// Entry carrying metadata only.
    pub fn new(information: ResourceInformation) -> Self {
        Self {
            information,
            repository: None,
            relationship_repositories: HashMap::new(),
            parent: OnceLock::new(),
        }
    }

    /// Attach the resource repository.
    pub fn with_repository(mut self, repository: Arc<dyn ResourceRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Attach the relationship repository serving `field`.
    pub fn with_relationship_repository(
        mut self,
        field: impl Into<String>,
        repository: Arc<dyn RelationshipRepository>,
    ) -> Self {
        self.relationship_repositories.insert(field.into(), repository);
        self
    }

    /// The resource metadata this entry was registered with.
    pub fn resource_information(&self) -> &ResourceInformation {
        &self.information
    }

    /// The resource repository, if one was attached.
    pub fn repository(&self) -> Option<Arc<dyn ResourceRepository>> {
        self.repository.clone()
    }

    /// The resource repository, or the typed error the exposure layer
    /// returns for an entry registered without one.
    pub fn require_repository(&self) -> RestioResult<Arc<dyn ResourceRepository>> {
        self.repository
            .clone()
            .ok_or_else(|| RestioError::RepositoryNotFound {
                resource_type: self.information.type_name().to_string(),
            })
    }

    /// The relationship repository serving `field`, if one was attached.
    pub fn relationship_repository(&self, field: &str) -> Option<Arc<dyn RelationshipRepository>> {
        self.relationship_repositories.get(field).cloned()
    }

    /// Entry of the nearest registered ancestor, resolved through
    /// `registry` on first call and cached for the entry's lifetime.
    pub fn parent_entry(&self, registry: &ResourceRegistry) -> Option<Arc<RegistryEntry>> {
        self.parent
            .get_or_init(|| {
                self.information
                    .resource_class()
                    .parent()
                    .and_then(|parent| registry.find_entry(parent).ok())
            })
            .clone()
    }
}
