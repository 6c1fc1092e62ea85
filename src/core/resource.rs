//! Resource class tokens and the core trait for domain types

use std::any::TypeId;

/// Runtime identity of a domain type, with an optional parent link.
///
/// A `ResourceClass` is a cheap copyable token that stands in for a Rust
/// type at runtime:
/// - type_id: the `TypeId` used for exact-match lookups
/// - name: the type's name, used in diagnostics
/// - parent: accessor for the ancestor token, if the type declares one
///
/// Parent links exist so generated subtypes (lazy-loading proxies, decorated
/// variants) can resolve to the metadata of the type they were derived from,
/// even though only the base type was ever registered. Tokens can be built
/// for any `'static` type, including primitives, so lookup misses are
/// expressible without registering anything.
#[derive(Clone, Copy, Debug)]
pub struct ResourceClass {
    type_id: TypeId,
    name: &'static str,
    parent: Option<fn() -> ResourceClass>,
}

impl ResourceClass {
    /// Build the token for a type.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            parent: None,
        }
    }

    /// Declare the ancestor this token resolves through.
    ///
    /// Takes an accessor rather than a token so type declarations stay
    /// order-independent.
    pub fn with_parent(mut self, parent: fn() -> ResourceClass) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The `TypeId` this token identifies.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The type name, as produced by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The parent token, if one was declared.
    pub fn parent(&self) -> Option<ResourceClass> {
        self.parent.map(|accessor| accessor())
    }
}

impl PartialEq for ResourceClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ResourceClass {}

impl std::hash::Hash for ResourceClass {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// Base trait for domain types exposed as resources.
///
/// Implementors provide:
/// - class: the static token for the type (used at registration)
/// - runtime_class: the token for a value's actual type (used for reverse
///   lookup from object instances, object-safe)
/// - resource_id: the identifier value rendered into documents and URLs
///
/// The [`domain_resource!`](crate::domain_resource) macro generates
/// implementations for plain structs and for subtypes that resolve through
/// a parent.
pub trait DomainResource: Send + Sync {
    /// The class token for this type.
    fn class() -> ResourceClass
    where
        Self: Sized;

    /// The class token for this value's runtime type.
    fn runtime_class(&self) -> ResourceClass;

    /// The identifier of this value, as a string.
    fn resource_id(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Project {
        id: String,
    }

    impl DomainResource for Project {
        fn class() -> ResourceClass {
            ResourceClass::of::<Project>()
        }

        fn runtime_class(&self) -> ResourceClass {
            Self::class()
        }

        fn resource_id(&self) -> String {
            self.id.clone()
        }
    }

    // Stands in for a runtime-generated subtype of Project
    #[derive(Clone)]
    struct ProjectProxy {
        id: String,
    }

    impl DomainResource for ProjectProxy {
        fn class() -> ResourceClass {
            ResourceClass::of::<ProjectProxy>().with_parent(Project::class)
        }

        fn runtime_class(&self) -> ResourceClass {
            Self::class()
        }

        fn resource_id(&self) -> String {
            self.id.clone()
        }
    }

    #[test]
    fn test_token_equality_is_by_type() {
        assert_eq!(ResourceClass::of::<Project>(), Project::class());
        assert_ne!(ResourceClass::of::<Project>(), ResourceClass::of::<ProjectProxy>());
    }

    #[test]
    fn test_tokens_for_primitives() {
        let token = ResourceClass::of::<i64>();
        assert_eq!(token.type_id(), TypeId::of::<i64>());
        assert!(token.parent().is_none());
    }

    #[test]
    fn test_parent_chain() {
        let proxy = ProjectProxy::class();
        let parent = proxy.parent().unwrap();
        assert_eq!(parent, Project::class());
        assert!(parent.parent().is_none());
    }

    #[test]
    fn test_runtime_class_through_trait_object() {
        let value = ProjectProxy { id: "p1".into() };
        let resource: &dyn DomainResource = &value;
        assert_eq!(resource.runtime_class(), ProjectProxy::class());
        assert_eq!(resource.resource_id(), "p1");
    }
}
