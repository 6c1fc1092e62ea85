//! JSON:API document types
//!
//! The wire shapes of the protocol: top-level documents, resource objects,
//! identifier linkage and error objects. Everything here is plain data with
//! serde derives; link construction happens in the exposure layer, which is
//! the only place that knows the base URL.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON:API media type, sent as `Content-Type` on every response.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Resource linkage: the `type` + `id` pair identifying one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Link object used at the document, resource and relationship levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

impl Links {
    pub fn self_only(url: impl Into<String>) -> Self {
        Self {
            self_link: Some(url.into()),
            related: None,
        }
    }

    pub fn with_related(mut self, url: impl Into<String>) -> Self {
        self.related = Some(url.into());
        self
    }
}

/// Linkage carried by a relationship: `null`, one identifier, or many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(Option<ResourceIdentifier>),
    Many(Vec<ResourceIdentifier>),
}

/// One relationship member of a resource object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl Relationship {
    pub fn to_one(target: Option<ResourceIdentifier>) -> Self {
        Self {
            data: Some(RelationshipData::One(target)),
            links: None,
        }
    }

    pub fn to_many(targets: Vec<ResourceIdentifier>) -> Self {
        Self {
            data: Some(RelationshipData::Many(targets)),
            links: None,
        }
    }

    pub fn with_links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }
}

/// A resource object: `type`, `id`, attributes and relationships.
///
/// `id` is optional because create requests may leave identifier assignment
/// to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: Some(id.into()),
            attributes: serde_json::Map::new(),
            relationships: IndexMap::new(),
            links: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, relationship: Relationship) -> Self {
        self.relationships.insert(name.into(), relationship);
        self
    }

    pub fn with_self_link(mut self, url: impl Into<String>) -> Self {
        self.links = Some(Links::self_only(url));
        self
    }

    /// The identifier pair for this object, if it has an id.
    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(self.resource_type.clone(), id.clone()))
    }
}

/// Primary data of a document: a single (nullable) resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Single(Option<ResourceObject>),
    Collection(Vec<ResourceObject>),
}

/// Top-level JSON:API document with primary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl Document {
    /// Document holding one resource.
    pub fn single(resource: ResourceObject) -> Self {
        Self {
            data: PrimaryData::Single(Some(resource)),
            links: None,
        }
    }

    /// Document holding one resource or `null`.
    pub fn nullable(resource: Option<ResourceObject>) -> Self {
        Self {
            data: PrimaryData::Single(resource),
            links: None,
        }
    }

    /// Document holding a collection.
    pub fn collection(resources: Vec<ResourceObject>) -> Self {
        Self {
            data: PrimaryData::Collection(resources),
            links: None,
        }
    }

    pub fn with_self_link(mut self, url: impl Into<String>) -> Self {
        self.links = Some(Links::self_only(url));
        self
    }

    /// Consume the document and return its single resource, if that is what
    /// it holds. Collection documents yield `None`.
    pub fn into_single(self) -> Option<ResourceObject> {
        match self.data {
            PrimaryData::Single(resource) => resource,
            PrimaryData::Collection(_) => None,
        }
    }
}

/// Top-level document whose primary data is linkage only, served by
/// `relationships` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageDocument {
    pub data: RelationshipData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl LinkageDocument {
    pub fn new(data: RelationshipData) -> Self {
        Self { data, links: None }
    }

    pub fn with_links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }
}

/// One JSON:API error object: the status/title/detail triple.
///
/// `status` is a string, not a number, per the error-object shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub status: String,
    pub title: String,
    pub detail: String,
}

/// Top-level document carrying only errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorData>,
}

impl ErrorDocument {
    pub fn of(error: ErrorData) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_document_shape() {
        let document = Document::single(
            ResourceObject::new("tasks", "1")
                .with_attribute("name", json!("Close the accounts"))
                .with_self_link("https://service.local/tasks/1"),
        );
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "data": {
                    "type": "tasks",
                    "id": "1",
                    "attributes": { "name": "Close the accounts" },
                    "links": { "self": "https://service.local/tasks/1" }
                }
            })
        );
    }

    #[test]
    fn test_empty_members_are_omitted() {
        let document = Document::single(ResourceObject::new("tasks", "1"));
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value, json!({ "data": { "type": "tasks", "id": "1" } }));
    }

    #[test]
    fn test_nullable_to_one_serializes_null() {
        let document = Document::nullable(None);
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value, json!({ "data": null }));
    }

    #[test]
    fn test_collection_document_shape() {
        let document = Document::collection(vec![
            ResourceObject::new("tasks", "1"),
            ResourceObject::new("tasks", "2"),
        ]);
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "data": [
                    { "type": "tasks", "id": "1" },
                    { "type": "tasks", "id": "2" }
                ]
            })
        );
    }

    #[test]
    fn test_create_request_without_id_deserializes() {
        let document: Document = serde_json::from_value(json!({
            "data": {
                "type": "tasks",
                "attributes": { "name": "New task" }
            }
        }))
        .unwrap();
        let resource = document.into_single().unwrap();
        assert_eq!(resource.resource_type, "tasks");
        assert!(resource.id.is_none());
        assert_eq!(resource.attributes["name"], json!("New task"));
    }

    #[test]
    fn test_into_single_rejects_collections() {
        let document: Document =
            serde_json::from_value(json!({ "data": [{ "type": "tasks", "id": "1" }] })).unwrap();
        assert!(document.into_single().is_none());
    }

    #[test]
    fn test_relationship_linkage_shapes() {
        let to_one = Relationship::to_one(Some(ResourceIdentifier::new("projects", "9")));
        assert_eq!(
            serde_json::to_value(&to_one).unwrap(),
            json!({ "data": { "type": "projects", "id": "9" } })
        );

        let empty = Relationship::to_one(None);
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({ "data": null }));

        let to_many = Relationship::to_many(vec![ResourceIdentifier::new("tasks", "1")]);
        assert_eq!(
            serde_json::to_value(&to_many).unwrap(),
            json!({ "data": [{ "type": "tasks", "id": "1" }] })
        );
    }

    #[test]
    fn test_linkage_document_with_links() {
        let document = LinkageDocument::new(RelationshipData::Many(vec![]))
            .with_links(
                Links::self_only("https://service.local/tasks/1/relationships/subtasks")
                    .with_related("https://service.local/tasks/1/subtasks"),
            );
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "data": [],
                "links": {
                    "self": "https://service.local/tasks/1/relationships/subtasks",
                    "related": "https://service.local/tasks/1/subtasks"
                }
            })
        );
    }

    #[test]
    fn test_error_document_triple() {
        let document = ErrorDocument::of(ErrorData {
            status: "500".to_string(),
            title: "INTERNAL_SERVER_ERROR".to_string(),
            detail: "something broke".to_string(),
        });
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "errors": [{
                    "status": "500",
                    "title": "INTERNAL_SERVER_ERROR",
                    "detail": "something broke"
                }]
            })
        );
    }

    #[test]
    fn test_resource_identifier_extraction() {
        let with_id = ResourceObject::new("tasks", "1");
        assert_eq!(
            with_id.identifier(),
            Some(ResourceIdentifier::new("tasks", "1"))
        );

        let mut without_id = ResourceObject::new("tasks", "1");
        without_id.id = None;
        assert!(without_id.identifier().is_none());
    }
}
