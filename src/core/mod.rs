//! Core module containing fundamental traits and types for the framework

pub mod document;
pub mod error;
pub mod information;
pub mod module;
pub mod repository;
pub mod resource;
pub mod url;

pub use document::{
    Document, ErrorData, ErrorDocument, LinkageDocument, Links, MEDIA_TYPE, PrimaryData,
    Relationship, RelationshipData, ResourceIdentifier, ResourceObject,
};
pub use error::{RestioError, RestioResult};
pub use information::{ResourceField, ResourceFieldKind, ResourceInformation};
pub use module::Module;
pub use repository::{RelationshipRepository, ResourceRepository};
pub use resource::{DomainResource, ResourceClass};
pub use url::{
    ConstantServiceUrlProvider, RequestUrlProvider, ServiceUrlProvider,
    request_base_url_middleware,
};
