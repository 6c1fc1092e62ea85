//! Typed error handling for the restio framework
//!
//! Every failure the framework can surface renders the same structured
//! triple: an HTTP status code, a stable machine-readable title, and a
//! human-readable detail message. [`RestioError`] carries that contract;
//! its [`IntoResponse`] impl emits the triple as a JSON:API error document.
//!
//! Two lookup failures are deliberately asymmetric:
//! - an unknown resource *type name* is an absence (`None` from the
//!   registry), mapped to [`RestioError::UnknownResourceType`] only at the
//!   HTTP boundary;
//! - an unknown resource *class* is always
//!   [`RestioError::ResourceClassNotRegistered`], a hard 500, because it
//!   means registration was incomplete.
//!
//! # Example
//!
//! ```rust,ignore
//! use restio::prelude::*;
//!
//! match registry.find_entry(token) {
//!     Ok(entry) => serve(entry),
//!     Err(e @ RestioError::ResourceClassNotRegistered { .. }) => {
//!         tracing::error!("bootstrap defect: {}", e);
//!         Err(e)
//!     }
//!     Err(e) => Err(e),
//! }
//! ```

use crate::core::document::{ErrorData, ErrorDocument, MEDIA_TYPE};
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::fmt;

/// The main error type for the restio framework
#[derive(Debug)]
pub enum RestioError {
    /// Reverse lookup failed: the class (and its whole ancestry) was never
    /// registered. Signals a bootstrap defect, not a client mistake.
    ResourceClassNotRegistered { class_name: String },

    /// A request named a type the registry does not know
    UnknownResourceType { resource_type: String },

    /// A known type has no resource with the requested id
    ResourceNotFound { resource_type: String, id: String },

    /// A known type has no relationship field with the requested name
    RelationshipNotFound { resource_type: String, field: String },

    /// Create collided with an existing id
    ResourceAlreadyExists { resource_type: String, id: String },

    /// The document's `type` member does not match the endpoint
    ResourceTypeMismatch { expected: String, actual: String },

    /// The request body is not a usable JSON:API document
    InvalidDocument { message: String },

    /// Resource metadata failed validation at registration time
    InvalidResourceInformation { message: String },

    /// An entry was registered without the repository the operation needs
    RepositoryNotFound { resource_type: String },

    /// Configuration loading or builder wiring failed
    Config { message: String },

    /// Unexpected failure, optionally wrapping the underlying cause
    Internal {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RestioError {
    /// Shorthand for an [`RestioError::Internal`] without a cause.
    pub fn internal(message: impl Into<String>) -> Self {
        RestioError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// An [`RestioError::Internal`] wrapping the failure that caused it.
    pub fn internal_with_cause(
        message: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        RestioError::Internal {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestioError::ResourceClassNotRegistered { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestioError::UnknownResourceType { .. } => StatusCode::NOT_FOUND,
            RestioError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            RestioError::RelationshipNotFound { .. } => StatusCode::NOT_FOUND,
            RestioError::ResourceAlreadyExists { .. } => StatusCode::CONFLICT,
            RestioError::ResourceTypeMismatch { .. } => StatusCode::CONFLICT,
            RestioError::InvalidDocument { .. } => StatusCode::BAD_REQUEST,
            RestioError::InvalidResourceInformation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestioError::RepositoryNotFound { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestioError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestioError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable title for this error, rendered into error documents
    pub fn title(&self) -> &'static str {
        match self {
            RestioError::ResourceClassNotRegistered { .. } => "RESOURCE_CLASS_NOT_REGISTERED",
            RestioError::UnknownResourceType { .. } => "UNKNOWN_RESOURCE_TYPE",
            RestioError::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            RestioError::RelationshipNotFound { .. } => "RELATIONSHIP_NOT_FOUND",
            RestioError::ResourceAlreadyExists { .. } => "RESOURCE_ALREADY_EXISTS",
            RestioError::ResourceTypeMismatch { .. } => "RESOURCE_TYPE_MISMATCH",
            RestioError::InvalidDocument { .. } => "INVALID_DOCUMENT",
            RestioError::InvalidResourceInformation { .. } => "INVALID_RESOURCE_INFORMATION",
            RestioError::RepositoryNotFound { .. } => "REPOSITORY_NOT_FOUND",
            RestioError::Config { .. } => "CONFIG_ERROR",
            RestioError::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Render the status/title/detail triple for an error document
    pub fn error_data(&self) -> ErrorData {
        ErrorData {
            status: self.status_code().as_u16().to_string(),
            title: self.title().to_string(),
            detail: self.to_string(),
        }
    }
}

impl fmt::Display for RestioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestioError::ResourceClassNotRegistered { class_name } => {
                write!(f, "Resource class '{}' is not registered", class_name)
            }
            RestioError::UnknownResourceType { resource_type } => {
                write!(f, "Unknown resource type: {}", resource_type)
            }
            RestioError::ResourceNotFound { resource_type, id } => {
                write!(f, "{} with id '{}' not found", resource_type, id)
            }
            RestioError::RelationshipNotFound {
                resource_type,
                field,
            } => {
                write!(
                    f,
                    "Relationship '{}' not found on type '{}'",
                    field, resource_type
                )
            }
            RestioError::ResourceAlreadyExists { resource_type, id } => {
                write!(f, "{} with id '{}' already exists", resource_type, id)
            }
            RestioError::ResourceTypeMismatch { expected, actual } => {
                write!(
                    f,
                    "Resource type mismatch: expected '{}', got '{}'",
                    expected, actual
                )
            }
            RestioError::InvalidDocument { message } => {
                write!(f, "Invalid document: {}", message)
            }
            RestioError::InvalidResourceInformation { message } => {
                write!(f, "Invalid resource information: {}", message)
            }
            RestioError::RepositoryNotFound { resource_type } => {
                write!(f, "No repository registered for type '{}'", resource_type)
            }
            RestioError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            RestioError::Internal { message, .. } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RestioError::Internal { source, .. } => source
                .as_deref()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl IntoResponse for RestioError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorDocument::of(self.error_data()));
        let mut response = (status, body).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        response
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for RestioError {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        RestioError::Internal {
            message,
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::io::Error> for RestioError {
    fn from(err: std::io::Error) -> Self {
        RestioError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RestioError {
    fn from(err: serde_yaml::Error) -> Self {
        RestioError::Config {
            message: err.to_string(),
        }
    }
}

/// Repositories speak `anyhow::Result`; typed errors tunneled through an
/// `anyhow::Error` are recovered here by downcast, everything else becomes
/// an internal error that keeps the original as its cause.
impl From<anyhow::Error> for RestioError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<RestioError>() {
            Ok(restio_err) => restio_err,
            Err(err) => {
                let message = err.to_string();
                RestioError::Internal {
                    message,
                    source: Some(err.into()),
                }
            }
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for restio operations
pub type RestioResult<T> = Result<T, RestioError>;

// =============================================================================
// Tests
// =============================================================================
