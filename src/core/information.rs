//! Resource metadata types and member-name validation

use crate::core::error::{RestioError, RestioResult};
use crate::core::resource::ResourceClass;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// What role a field plays in a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceFieldKind {
    Id,
    Attribute,
    ToOne,
    ToMany,
}

/// Descriptor for one field of a resource type.
///
/// Relationship fields carry the type name of the resource on the other
/// side; attributes and the identifier do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceField {
    pub name: String,
    pub kind: ResourceFieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opposite_type: Option<String>,
}

impl ResourceField {
    pub fn id(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ResourceFieldKind::Id,
            opposite_type: None,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ResourceFieldKind::Attribute,
            opposite_type: None,
        }
    }

    pub fn to_one(name: impl Into<String>, opposite_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ResourceFieldKind::ToOne,
            opposite_type: Some(opposite_type.into()),
        }
    }

    pub fn to_many(name: impl Into<String>, opposite_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ResourceFieldKind::ToMany,
            opposite_type: Some(opposite_type.into()),
        }
    }

    /// True for to-one and to-many fields.
    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, ResourceFieldKind::ToOne | ResourceFieldKind::ToMany)
    }

    /// True for to-many fields.
    pub fn is_collection(&self) -> bool {
        self.kind == ResourceFieldKind::ToMany
    }
}

/// Check a string against the member-name rules shared by type names,
/// attribute names and relationship names: alphanumeric first and last
/// characters, with `-` and `_` allowed inside.
pub fn is_valid_member_name(name: &str) -> bool {
    static MEMBER_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = MEMBER_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9_-]*[a-zA-Z0-9])?$").unwrap());
    regex.is_match(name)
}

/// Metadata for one resource kind.
///
/// Holds the protocol-visible type name, the owning domain class token, the
/// identifier field and the attribute/relationship descriptors. Built once
/// during registration and immutable afterwards; every name is validated at
/// construction so a malformed definition aborts bootstrap instead of
/// surfacing mid-request.
#[derive(Debug, Clone)]
pub struct ResourceInformation {
    resource_class: ResourceClass,
    type_name: String,
    id_field: ResourceField,
    fields: Vec<ResourceField>,
}

impl ResourceInformation {
    /// Create metadata for `type_name` owned by `resource_class`, with the
    /// identifier held in `id_field_name`.
    pub fn new(
        resource_class: ResourceClass,
        type_name: impl Into<String>,
        id_field_name: impl Into<String>,
    ) -> RestioResult<Self> {
        let type_name = type_name.into();
        if !is_valid_member_name(&type_name) {
            return Err(RestioError::InvalidResourceInformation {
                message: format!("invalid resource type name '{}'", type_name),
            });
        }
        let id_field_name = id_field_name.into();
        if !is_valid_member_name(&id_field_name) {
            return Err(RestioError::InvalidResourceInformation {
                message: format!(
                    "invalid identifier field name '{}' for type '{}'",
                    id_field_name, type_name
                ),
            });
        }
        Ok(Self {
            resource_class,
            type_name,
            id_field: ResourceField::id(id_field_name),
            fields: Vec::new(),
        })
    }

    /// Add an attribute field.
    pub fn with_attribute(self, name: impl Into<String>) -> RestioResult<Self> {
        self.with_field(ResourceField::attribute(name))
    }

    /// Add a to-one relationship pointing at `opposite_type`.
    pub fn with_to_one(
        self,
        name: impl Into<String>,
        opposite_type: impl Into<String>,
    ) -> RestioResult<Self> {
        self.with_field(ResourceField::to_one(name, opposite_type))
    }

    /// Add a to-many relationship pointing at `opposite_type`.
    pub fn with_to_many(
        self,
        name: impl Into<String>,
        opposite_type: impl Into<String>,
    ) -> RestioResult<Self> {
        self.with_field(ResourceField::to_many(name, opposite_type))
    }

    fn with_field(mut self, field: ResourceField) -> RestioResult<Self> {
        if !is_valid_member_name(&field.name) {
            return Err(RestioError::InvalidResourceInformation {
                message: format!(
                    "invalid field name '{}' for type '{}'",
                    field.name, self.type_name
                ),
            });
        }
        // "type" and "id" are claimed by the document structure itself
        if field.name == "type" || field.name == "id" || field.name == self.id_field.name {
            return Err(RestioError::InvalidResourceInformation {
                message: format!(
                    "field name '{}' is reserved for type '{}'",
                    field.name, self.type_name
                ),
            });
        }
        if self.fields.iter().any(|existing| existing.name == field.name) {
            return Err(RestioError::InvalidResourceInformation {
                message: format!(
                    "duplicate field '{}' for type '{}'",
                    field.name, self.type_name
                ),
            });
        }
        self.fields.push(field);
        Ok(self)
    }

    /// The class token this metadata is registered under.
    pub fn resource_class(&self) -> ResourceClass {
        self.resource_class
    }

    /// The protocol-visible type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The identifier field descriptor.
    pub fn id_field(&self) -> &ResourceField {
        &self.id_field
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[ResourceField] {
        &self.fields
    }

    /// Attribute fields only.
    pub fn attributes(&self) -> impl Iterator<Item = &ResourceField> {
        self.fields
            .iter()
            .filter(|field| field.kind == ResourceFieldKind::Attribute)
    }

    /// Relationship fields only.
    pub fn relationships(&self) -> impl Iterator<Item = &ResourceField> {
        self.fields.iter().filter(|field| field.is_relationship())
    }

    /// Look up any declared field by name.
    pub fn field(&self, name: &str) -> Option<&ResourceField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a relationship field by name.
    pub fn relationship(&self, name: &str) -> Option<&ResourceField> {
        self.field(name).filter(|field| field.is_relationship())
    }
}
