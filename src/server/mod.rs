//! Server module for building HTTP servers with registry-driven routes
//!
//! The `ServerBuilder` runs module registration against a fresh registry,
//! freezes the result into a `ServerHost`, and exposes it over REST:
//! resource CRUD routes, relationship routes and introspection routes, all
//! resolved through the registry at request time.

pub mod builder;
pub mod host;
pub mod rest;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use rest::AppState;
