//! Server host holding the frozen application state
//!
//! The host is produced by [`ServerBuilder`](crate::server::ServerBuilder)
//! after module registration completes. From that point the registry is
//! behind an `Arc` and never mutated again; every exposure and every
//! request task reads the same frozen directory.

use crate::registry::ResourceRegistry;
use crate::server::rest;
use axum::Router;
use std::sync::Arc;

/// Built server state: the frozen registry plus the custom route overlay.
pub struct ServerHost {
    registry: Arc<ResourceRegistry>,
    custom_routes: Vec<Router>,
}

impl ServerHost {
    /// Build the host from builder components.
    ///
    /// Moving the registry behind `Arc` here is the publication point: all
    /// `add_entry` calls happen-before any concurrent read.
    pub fn from_builder_components(
        registry: ResourceRegistry,
        custom_routes: Vec<Router>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            custom_routes,
        }
    }

    /// The shared resource registry.
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Assemble the full router: REST exposure plus custom routes.
    pub fn router(&self) -> Router {
        rest::build_router(Arc::clone(&self.registry), self.custom_routes.clone())
    }
}
