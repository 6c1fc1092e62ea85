//! Integration tests for the resource registry
//!
//! These tests exercise the registry through the public API only: the
//! registration scenario, the two deliberately asymmetric lookup contracts
//! (None for type-name misses, hard error for class misses), proxy-subclass
//! resolution through the ancestry chain, and URL construction.

use restio::prelude::*;

struct Task {
    id: i64,
}

domain_resource!(Task, id);

/// Stands in for an ORM-style lazily generated subtype of Task: never
/// registered, resolves through its parent.
struct TaskProxy {
    id: i64,
}

domain_resource!(TaskProxy extends Task, id);

struct Project {
    id: String,
}

domain_resource!(Project, id);

fn task_information() -> ResourceInformation {
    ResourceInformation::new(Task::class(), "tasks", "id")
        .unwrap()
        .with_attribute("name")
        .unwrap()
}

fn registry_with_task() -> ResourceRegistry {
    let mut registry = ResourceRegistry::with_base_url("https://service.local");
    registry.add_entry(Task::class(), RegistryEntry::new(task_information()));
    registry
}

// =============================================================================
// The registration scenario
// =============================================================================

#[test]
fn test_registered_class_resolves_both_ways() {
    let registry = registry_with_task();

    let by_type = registry.get_entry("tasks").expect("type lookup should hit");
    let by_class = registry
        .find_entry(Task::class())
        .expect("class lookup should hit");

    assert!(Arc::ptr_eq(&by_type, &by_class));
    assert_eq!(by_type.resource_information().type_name(), "tasks");
}

#[test]
fn test_resource_url_from_entry() {
    let registry = registry_with_task();
    let entry = registry.get_entry("tasks").unwrap();
    assert_eq!(
        registry.resource_url(entry.resource_information()),
        "https://service.local/tasks"
    );
}

#[test]
fn test_resource_url_normalizes_trailing_slash() {
    let mut registry = ResourceRegistry::with_base_url("https://service.local/");
    let entry = registry.add_entry(Task::class(), RegistryEntry::new(task_information()));
    assert_eq!(
        registry.resource_url(entry.resource_information()),
        "https://service.local/tasks"
    );
}

// =============================================================================
// Lookup asymmetry: None for names, hard error for classes
// =============================================================================

#[test]
fn test_unknown_type_name_is_none_never_error() {
    let registry = registry_with_task();
    assert!(registry.get_entry("nonExistingType").is_none());
}

#[test]
fn test_unregistered_class_is_error_never_none() {
    let registry = registry_with_task();

    // i64 was never registered and has no relation to Task
    let err = registry
        .find_entry(ResourceClass::of::<i64>())
        .expect_err("unrelated class must be a hard failure");
    assert!(matches!(err, RestioError::ResourceClassNotRegistered { .. }));
    assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_unregistered_domain_class_is_error() {
    let registry = registry_with_task();
    let err = registry.find_entry(Project::class()).unwrap_err();
    assert!(err.to_string().contains("Project"));
}

// =============================================================================
// Proxy / subclass resolution
// =============================================================================

#[test]
fn test_proxy_subclass_resolves_to_registered_ancestor() {
    let registry = registry_with_task();

    let direct = registry.find_entry(Task::class()).unwrap();
    let via_proxy = registry
        .find_entry(TaskProxy::class())
        .expect("proxy should resolve through its parent");

    assert!(Arc::ptr_eq(&direct, &via_proxy));
}

#[test]
fn test_proxy_value_resolves_through_trait_object() {
    let registry = registry_with_task();
    let proxy = TaskProxy { id: 7 };

    let resource: &dyn DomainResource = &proxy;
    let entry = registry.find_entry(resource.runtime_class()).unwrap();
    assert_eq!(entry.resource_information().type_name(), "tasks");
    assert_eq!(resource.resource_id(), "7");
}

#[test]
fn test_repeated_proxy_lookups_stay_consistent() {
    let registry = registry_with_task();

    // The second lookup answers from the memo cache; both must agree
    let first = registry.find_entry(TaskProxy::class()).unwrap();
    let second = registry.find_entry(TaskProxy::class()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

// =============================================================================
// Duplicate registration: last wins, no stale counterpart keys
// =============================================================================

#[test]
fn test_duplicate_type_name_overwrites() {
    let mut registry = registry_with_task();

    let replacement_info = ResourceInformation::new(Project::class(), "tasks", "id").unwrap();
    let replacement = registry.add_entry(Project::class(), RegistryEntry::new(replacement_info));

    assert_eq!(registry.len(), 1);
    let current = registry.get_entry("tasks").unwrap();
    assert!(Arc::ptr_eq(&current, &replacement));

    // The displaced class key was evicted along with its entry
    assert!(registry.find_entry(Task::class()).is_err());
}

#[test]
fn test_reregistered_class_drops_old_type_name() {
    let mut registry = registry_with_task();

    let renamed = ResourceInformation::new(Task::class(), "jobs", "id").unwrap();
    registry.add_entry(Task::class(), RegistryEntry::new(renamed));

    assert!(registry.get_entry("tasks").is_none());
    let entry = registry.find_entry(Task::class()).unwrap();
    assert_eq!(entry.resource_information().type_name(), "jobs");
}

// =============================================================================
// Registry as shared read-only state
// =============================================================================

#[tokio::test]
async fn test_concurrent_reads_after_publication() {
    let registry = Arc::new(registry_with_task());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            let entry = registry.find_entry(TaskProxy::class()).unwrap();
            assert_eq!(entry.resource_information().type_name(), "tasks");
            assert!(registry.get_entry("nonExistingType").is_none());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}

#[test]
fn test_entries_iterate_in_registration_order() {
    let mut registry = registry_with_task();
    let projects = ResourceInformation::new(Project::class(), "projects", "id").unwrap();
    registry.add_entry(Project::class(), RegistryEntry::new(projects));

    let names: Vec<&str> = registry
        .entries()
        .map(|entry| entry.resource_information().type_name())
        .collect();
    assert_eq!(names, vec!["tasks", "projects"]);
}
