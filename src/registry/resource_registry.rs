//! Resource registry mapping classes and type names to registry entries

use crate::core::error::{RestioError, RestioResult};
use crate::core::information::ResourceInformation;
use crate::core::resource::ResourceClass;
use crate::core::url::{ConstantServiceUrlProvider, ServiceUrlProvider};
use crate::registry::RegistryEntry;
use indexmap::IndexMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Ancestry walks stop here; a cyclic parent declaration would otherwise
/// never terminate.
const MAX_ANCESTRY_DEPTH: usize = 64;

/// The resolution cache is reset wholesale once it reaches this size.
const RESOLVED_CACHE_CAPACITY: usize = 1024;

/// The directory of every resource the application serves.
///
/// Two mappings back the directory: type name to entry (URL-path
/// resolution, iteration in registration order) and domain class to entry
/// (reverse lookup from object instances). Registration writes both at
/// once, so an entry reachable through one mapping is always reachable
/// through the other.
///
/// The registry is built single-threaded during bootstrap, then moved
/// behind an `Arc` and shared read-only across request tasks; the main maps
/// are never locked. The only interior mutability is the cache of resolved
/// subclass lookups, which degrades to a plain ancestry walk if its lock is
/// poisoned.
///
/// The two lookup operations fail differently on purpose:
/// [`get_entry`](Self::get_entry) answers an existence probe with `None`,
/// while [`find_entry`](Self::find_entry) reports an unresolvable class as
/// a hard error, because it means registration was incomplete.
pub struct ResourceRegistry {
    by_type: IndexMap<String, Arc<RegistryEntry>>,
    by_class: HashMap<TypeId, Arc<RegistryEntry>>,
    resolved: RwLock<HashMap<TypeId, String>>,
    url_provider: Arc<dyn ServiceUrlProvider>,
}

impl ResourceRegistry {
    /// Empty registry building links through `url_provider`.
    pub fn new(url_provider: Arc<dyn ServiceUrlProvider>) -> Self {
        Self {
            by_type: IndexMap::new(),
            by_class: HashMap::new(),
            resolved: RwLock::new(HashMap::new()),
            url_provider,
        }
    }

    /// Empty registry with a fixed base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(ConstantServiceUrlProvider::new(base_url)))
    }

    /// Register `entry` under `class` and under its resource type name.
    ///
    /// Both mappings are written before this returns. Re-registering an
    /// already-used class or type name replaces the previous entry (last
    /// registration wins) and evicts the replaced entry's key from the
    /// other mapping, so neither map keeps serving a dead entry. Returns
    /// the stored entry for chaining.
    pub fn add_entry(&mut self, class: ResourceClass, entry: RegistryEntry) -> Arc<RegistryEntry> {
        let type_name = entry.resource_information().type_name().to_string();
        let entry = Arc::new(entry);

        if let Some(displaced) = self.by_type.insert(type_name.clone(), Arc::clone(&entry)) {
            tracing::warn!(
                type_name = %type_name,
                "resource type re-registered, replacing previous entry"
            );
            let displaced_class = displaced
                .resource_information()
                .resource_class()
                .type_id();
            if displaced_class != class.type_id()
                && self
                    .by_class
                    .get(&displaced_class)
                    .is_some_and(|current| Arc::ptr_eq(current, &displaced))
            {
                self.by_class.remove(&displaced_class);
            }
        }

        if let Some(displaced) = self.by_class.insert(class.type_id(), Arc::clone(&entry)) {
            let displaced_type = displaced.resource_information().type_name();
            if displaced_type != type_name
                && self
                    .by_type
                    .get(displaced_type)
                    .is_some_and(|current| Arc::ptr_eq(current, &displaced))
            {
                tracing::warn!(
                    class = class.name(),
                    old_type = displaced_type,
                    new_type = %type_name,
                    "resource class re-registered under a new type name"
                );
                self.by_type.shift_remove(displaced_type);
            }
        }

        entry
    }

    /// Look up an entry by resource type name.
    ///
    /// A miss is an answer, not a failure: callers probing for existence
    /// get `None` and decide for themselves whether that is fatal.
    pub fn get_entry(&self, type_name: &str) -> Option<Arc<RegistryEntry>> {
        self.by_type.get(type_name).cloned()
    }

    /// Resolve an entry for an arbitrary runtime class.
    ///
    /// The class may be a generated subtype never seen at registration; in
    /// that case the ancestry chain is walked upward and the first
    /// registered ancestor wins, with the resolution cached for subsequent
    /// lookups. A class with no registered ancestor is a hard error,
    /// never a silent absence.
    pub fn find_entry(&self, class: ResourceClass) -> RestioResult<Arc<RegistryEntry>> {
        if let Some(entry) = self.by_class.get(&class.type_id()) {
            return Ok(Arc::clone(entry));
        }

        // Cached resolutions go through the type-name map, so an entry
        // replaced after caching is picked up on the next lookup.
        if let Ok(resolved) = self.resolved.read() {
            if let Some(type_name) = resolved.get(&class.type_id()) {
                if let Some(entry) = self.by_type.get(type_name) {
                    return Ok(Arc::clone(entry));
                }
            }
        }

        let mut ancestor = class.parent();
        let mut depth = 0;
        while let Some(current) = ancestor {
            if depth >= MAX_ANCESTRY_DEPTH {
                tracing::warn!(
                    class = class.name(),
                    "ancestry walk exceeded {} levels, giving up",
                    MAX_ANCESTRY_DEPTH
                );
                break;
            }
            if let Some(entry) = self.by_class.get(&current.type_id()) {
                self.memoize(class, entry.resource_information().type_name());
                return Ok(Arc::clone(entry));
            }
            ancestor = current.parent();
            depth += 1;
        }

        Err(RestioError::ResourceClassNotRegistered {
            class_name: class.name().to_string(),
        })
    }

    fn memoize(&self, class: ResourceClass, type_name: &str) {
        if let Ok(mut resolved) = self.resolved.write() {
            if resolved.len() >= RESOLVED_CACHE_CAPACITY {
                resolved.clear();
            }
            resolved.insert(class.type_id(), type_name.to_string());
        }
    }

    /// Collection URL for a resource type: `{base_url}/{type_name}` with
    /// exactly one separating slash, whatever the base URL ends in.
    pub fn resource_url(&self, information: &ResourceInformation) -> String {
        let base_url = self.url_provider.url();
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            information.type_name()
        )
    }

    /// URL of a single resource: `{base_url}/{type_name}/{id}`.
    pub fn entry_url(&self, information: &ResourceInformation, id: &str) -> String {
        format!("{}/{}", self.resource_url(information), id)
    }

    /// The provider links are built through.
    pub fn service_url_provider(&self) -> Arc<dyn ServiceUrlProvider> {
        Arc::clone(&self.url_provider)
    }

    /// Registered entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<RegistryEntry>> {
        self.by_type.values()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
