//! Module system for restio
//!
//! Applications contribute resources through modules. The server builder
//! runs every module's registration against one registry during bootstrap,
//! then freezes the result; modules never see the registry again after
//! startup.

use crate::registry::ResourceRegistry;
use anyhow::Result;

/// Trait for a resource module
pub trait Module: Send + Sync {
    /// Unique module name, used in bootstrap logs and errors
    fn name(&self) -> &str;

    /// Module version
    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Register this module's resources with the registry.
    ///
    /// Failures abort bootstrap; a registry missing entries must not serve
    /// requests.
    fn register(&self, registry: &mut ResourceRegistry) -> Result<()>;
}
