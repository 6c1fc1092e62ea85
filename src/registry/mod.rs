//! Resource registry: the directory every request resolves through
//!
//! Built once during bootstrap by module registration, then shared
//! read-only for the process lifetime. See
//! [`ResourceRegistry`] for the lookup contract.

pub mod entry;
pub mod resource_registry;

pub use entry::RegistryEntry;
pub use resource_registry::ResourceRegistry;
