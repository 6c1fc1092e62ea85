//! # Restio
//!
//! A JSON:API resource framework for building RESTful services in Rust.
//!
//! ## Features
//!
//! - **Resource Registry**: runtime directory mapping domain classes and
//!   JSON:API type names to their metadata and repositories
//! - **Proxy Resolution**: generated subtypes (lazy-loading proxies) resolve
//!   to the entry of their nearest registered ancestor
//! - **JSON:API Documents**: spec-shaped payloads with links, relationships
//!   and structured error objects
//! - **Registry-Driven Routes**: one set of type-agnostic handlers serves
//!   every registered resource
//! - **Pluggable URLs**: constant or request-derived base URLs for resource
//!   links
//! - **Module Bootstrap**: applications contribute resources through modules;
//!   the registry is frozen before the first request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restio::prelude::*;
//!
//! struct Task {
//!     id: String,
//! }
//!
//! domain_resource!(Task, id);
//!
//! struct TaskModule;
//!
//! impl Module for TaskModule {
//!     fn name(&self) -> &str {
//!         "tasks"
//!     }
//!
//!     fn register(&self, registry: &mut ResourceRegistry) -> Result<()> {
//!         let information = ResourceInformation::new(Task::class(), "tasks", "id")?
//!             .with_attribute("name")?;
//!         let entry = RegistryEntry::new(information)
//!             .with_repository(Arc::new(InMemoryResourceRepository::new("tasks")));
//!         registry.add_entry(Task::class(), entry);
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! ServerBuilder::new()
//!     .with_service_url("https://api.example.com")
//!     .register_module(TaskModule)
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod macros;
pub mod registry;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        document::{
            Document, ErrorData, ErrorDocument, LinkageDocument, Links, MEDIA_TYPE, PrimaryData,
            Relationship, RelationshipData, ResourceIdentifier, ResourceObject,
        },
        error::{RestioError, RestioResult},
        information::{ResourceField, ResourceFieldKind, ResourceInformation},
        module::Module,
        repository::{RelationshipRepository, ResourceRepository},
        resource::{DomainResource, ResourceClass},
        url::{ConstantServiceUrlProvider, RequestUrlProvider, ServiceUrlProvider},
    };

    // === Registry ===
    pub use crate::registry::{RegistryEntry, ResourceRegistry};

    // === Macros ===
    pub use crate::domain_resource;

    // === Storage ===
    pub use crate::storage::{InMemoryRelationshipRepository, InMemoryResourceRepository};

    // === Config ===
    pub use crate::config::{HttpConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{delete, get, patch, post},
    };
}
