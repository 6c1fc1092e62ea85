//! Storage implementations backing the repository traits

pub mod in_memory;

pub use in_memory::{InMemoryRelationshipRepository, InMemoryResourceRepository};
