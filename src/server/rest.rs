//! REST exposure of registered resources
//!
//! Builds the axum router serving JSON:API endpoints for every registered
//! resource type. Handlers are completely type-agnostic: each one resolves
//! the `{resource_type}` path segment through the registry exactly once and
//! dispatches to the matched entry's repositories. Nothing here knows about
//! concrete domain types.

use crate::core::document::{
    Document, LinkageDocument, Links, MEDIA_TYPE, Relationship, RelationshipData, ResourceIdentifier,
    ResourceObject,
};
use crate::core::error::{RestioError, RestioResult};
use crate::core::information::{ResourceField, ResourceInformation};
use crate::core::url::request_base_url_middleware;
use crate::registry::{RegistryEntry, ResourceRegistry};
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ResourceRegistry>,
}

impl AppState {
    /// Resolve a type-name path segment, mapping absence to the 404-class
    /// error the protocol layer serves.
    fn entry(&self, resource_type: &str) -> RestioResult<Arc<RegistryEntry>> {
        self.registry
            .get_entry(resource_type)
            .ok_or_else(|| RestioError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            })
    }
}

/// Build the full REST router over `registry`.
///
/// Custom routers are merged in before the middleware layers, so custom
/// handlers see the same request-derived base URL scope as the built-in
/// ones.
pub fn build_router(registry: Arc<ResourceRegistry>, custom_routes: Vec<Router>) -> Router {
    let state = AppState { registry };

    let api = Router::new()
        .route("/", get(index))
        .route("/{resource_type}", get(list_resources).post(create_resource))
        .route(
            "/{resource_type}/{id}",
            get(get_resource)
                .patch(update_resource)
                .delete(delete_resource),
        )
        .route(
            "/{resource_type}/{id}/relationships/{field}",
            get(get_relationship),
        )
        .route("/{resource_type}/{id}/{field}", get(get_related))
        .with_state(state);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .merge(api);

    for custom in custom_routes {
        app = app.merge(custom);
    }

    app.layer(middleware::from_fn(request_base_url_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Serialize `body` with the JSON:API media type.
fn json_api_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
    response
}

/// Build a resource object with its self link and relationship links.
///
/// Relationship members carry links only; linkage data is served by the
/// dedicated `relationships` endpoints.
fn resource_object(
    registry: &ResourceRegistry,
    information: &ResourceInformation,
    id: &str,
    attributes: Value,
) -> ResourceObject {
    let self_url = registry.entry_url(information, id);
    let mut object = ResourceObject::new(information.type_name(), id);
    if let Value::Object(map) = attributes {
        object.attributes = map;
    }
    for field in information.relationships() {
        let links = Links::self_only(format!("{}/relationships/{}", self_url, field.name))
            .with_related(format!("{}/{}", self_url, field.name));
        object = object.with_relationship(
            &field.name,
            Relationship {
                data: None,
                links: Some(links),
            },
        );
    }
    object.with_self_link(self_url)
}

/// Resolve a relationship request down to its parts, checking that the
/// source resource exists and that the field is a declared relationship
/// with a linkage repository attached.
async fn resolve_relationship(
    state: &AppState,
    resource_type: &str,
    id: &str,
    field: &str,
) -> RestioResult<(Arc<RegistryEntry>, ResourceField)> {
    let entry = state.entry(resource_type)?;
    let field_info = entry
        .resource_information()
        .relationship(field)
        .cloned()
        .ok_or_else(|| RestioError::RelationshipNotFound {
            resource_type: resource_type.to_string(),
            field: field.to_string(),
        })?;

    let repository = entry.require_repository()?;
    if repository.find_one(id).await.map_err(RestioError::from)?.is_none() {
        return Err(RestioError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        });
    }

    Ok((entry, field_info))
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /`: registered resource types with their collection URLs, in
/// registration order.
async fn index(State(state): State<AppState>) -> Response {
    let resources: Vec<Value> = state
        .registry
        .entries()
        .map(|entry| {
            let information = entry.resource_information();
            json!({
                "type": information.type_name(),
                "url": state.registry.resource_url(information),
            })
        })
        .collect();

    json_api_response(StatusCode::OK, &json!({ "resources": resources }))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "restio"
    }))
}

/// `GET /{type}`: collection document.
async fn list_resources(
    State(state): State<AppState>,
    Path(resource_type): Path<String>,
) -> RestioResult<Response> {
    let entry = state.entry(&resource_type)?;
    let repository = entry.require_repository()?;
    let information = entry.resource_information();

    let items = repository.find_all().await.map_err(RestioError::from)?;
    let resources = items
        .into_iter()
        .map(|(id, attributes)| resource_object(&state.registry, information, &id, attributes))
        .collect();

    let document =
        Document::collection(resources).with_self_link(state.registry.resource_url(information));
    Ok(json_api_response(StatusCode::OK, &document))
}

/// `POST /{type}`: create a resource from a JSON:API document.
async fn create_resource(
    State(state): State<AppState>,
    Path(resource_type): Path<String>,
    Json(document): Json<Document>,
) -> RestioResult<Response> {
    let entry = state.entry(&resource_type)?;
    let repository = entry.require_repository()?;
    let information = entry.resource_information();

    let resource = document
        .into_single()
        .ok_or_else(|| RestioError::InvalidDocument {
            message: "create requests carry a single resource object".to_string(),
        })?;
    if resource.resource_type != resource_type {
        return Err(RestioError::ResourceTypeMismatch {
            expected: resource_type,
            actual: resource.resource_type,
        });
    }

    let (id, attributes) = repository
        .create(resource.id, Value::Object(resource.attributes))
        .await
        .map_err(RestioError::from)?;

    let location = state.registry.entry_url(information, &id);
    let document = Document::single(resource_object(&state.registry, information, &id, attributes));
    let mut response = json_api_response(StatusCode::CREATED, &document);
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    Ok(response)
}

/// `GET /{type}/{id}`: single-resource document.
async fn get_resource(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
) -> RestioResult<Response> {
    let entry = state.entry(&resource_type)?;
    let repository = entry.require_repository()?;
    let information = entry.resource_information();

    let attributes = repository
        .find_one(&id)
        .await
        .map_err(RestioError::from)?
        .ok_or_else(|| RestioError::ResourceNotFound {
            resource_type: resource_type.clone(),
            id: id.clone(),
        })?;

    let document = Document::single(resource_object(&state.registry, information, &id, attributes));
    Ok(json_api_response(StatusCode::OK, &document))
}

/// `PATCH /{type}/{id}`: merge changed attributes.
async fn update_resource(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
    Json(document): Json<Document>,
) -> RestioResult<Response> {
    let entry = state.entry(&resource_type)?;
    let repository = entry.require_repository()?;
    let information = entry.resource_information();

    let resource = document
        .into_single()
        .ok_or_else(|| RestioError::InvalidDocument {
            message: "update requests carry a single resource object".to_string(),
        })?;
    if resource.resource_type != resource_type {
        return Err(RestioError::ResourceTypeMismatch {
            expected: resource_type,
            actual: resource.resource_type,
        });
    }

    let merged = repository
        .update(&id, Value::Object(resource.attributes))
        .await
        .map_err(RestioError::from)?;

    let document = Document::single(resource_object(&state.registry, information, &id, merged));
    Ok(json_api_response(StatusCode::OK, &document))
}

/// `DELETE /{type}/{id}`: idempotent removal, 204 on success.
async fn delete_resource(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
) -> RestioResult<Response> {
    let entry = state.entry(&resource_type)?;
    let repository = entry.require_repository()?;

    repository.delete(&id).await.map_err(RestioError::from)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /{type}/{id}/relationships/{field}`: linkage document.
async fn get_relationship(
    State(state): State<AppState>,
    Path((resource_type, id, field)): Path<(String, String, String)>,
) -> RestioResult<Response> {
    let (entry, field_info) = resolve_relationship(&state, &resource_type, &id, &field).await?;
    let linkage =
        entry
            .relationship_repository(&field)
            .ok_or_else(|| RestioError::RepositoryNotFound {
                resource_type: resource_type.clone(),
            })?;

    // Declared relationships always carry the opposite type name
    let opposite = field_info.opposite_type.clone().unwrap_or_default();
    let data = if field_info.is_collection() {
        let targets = linkage
            .find_many_targets(&id, &field)
            .await
            .map_err(RestioError::from)?;
        RelationshipData::Many(
            targets
                .into_iter()
                .map(|target| ResourceIdentifier::new(opposite.clone(), target))
                .collect(),
        )
    } else {
        let target = linkage
            .find_one_target(&id, &field)
            .await
            .map_err(RestioError::from)?;
        RelationshipData::One(target.map(|target| ResourceIdentifier::new(opposite, target)))
    };

    let base = state
        .registry
        .entry_url(entry.resource_information(), &id);
    let document = LinkageDocument::new(data).with_links(
        Links::self_only(format!("{}/relationships/{}", base, field))
            .with_related(format!("{}/{}", base, field)),
    );
    Ok(json_api_response(StatusCode::OK, &document))
}

/// `GET /{type}/{id}/{field}`: the related resources themselves.
async fn get_related(
    State(state): State<AppState>,
    Path((resource_type, id, field)): Path<(String, String, String)>,
) -> RestioResult<Response> {
    let (entry, field_info) = resolve_relationship(&state, &resource_type, &id, &field).await?;
    let linkage =
        entry
            .relationship_repository(&field)
            .ok_or_else(|| RestioError::RepositoryNotFound {
                resource_type: resource_type.clone(),
            })?;

    let opposite = field_info.opposite_type.clone().unwrap_or_default();
    let target_entry = state.entry(&opposite)?;
    let target_repository = target_entry.require_repository()?;
    let target_information = target_entry.resource_information();

    let self_url = format!(
        "{}/{}",
        state.registry.entry_url(entry.resource_information(), &id),
        field
    );

    let document = if field_info.is_collection() {
        let targets = linkage
            .find_many_targets(&id, &field)
            .await
            .map_err(RestioError::from)?;
        let mut resources = Vec::with_capacity(targets.len());
        for target in targets {
            // Linkage pointing at a since-deleted resource is skipped
            if let Some(attributes) = target_repository
                .find_one(&target)
                .await
                .map_err(RestioError::from)?
            {
                resources.push(resource_object(
                    &state.registry,
                    target_information,
                    &target,
                    attributes,
                ));
            }
        }
        Document::collection(resources).with_self_link(self_url)
    } else {
        let target = linkage
            .find_one_target(&id, &field)
            .await
            .map_err(RestioError::from)?;
        let mut resource = None;
        if let Some(target) = target {
            if let Some(attributes) = target_repository
                .find_one(&target)
                .await
                .map_err(RestioError::from)?
            {
                resource = Some(resource_object(
                    &state.registry,
                    target_information,
                    &target,
                    attributes,
                ));
            }
        }
        Document::nullable(resource).with_self_link(self_url)
    };

    Ok(json_api_response(StatusCode::OK, &document))
}
