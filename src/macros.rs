//! Macros for reducing boilerplate when defining domain resources

/// Implement [`DomainResource`](crate::core::resource::DomainResource) for a
/// domain struct.
///
/// Two forms:
///
/// - `domain_resource!(Task, id)`: a plain domain type whose identifier
///   lives in the `id` field.
/// - `domain_resource!(TaskProxy extends Task, id)`: a generated subtype
///   (lazy-loading proxy, decorated variant) that the registry resolves
///   through its parent's registration.
///
/// # Example
/// ```rust,ignore
/// use restio::domain_resource;
///
/// struct Task {
///     id: i64,
///     name: String,
/// }
///
/// domain_resource!(Task, id);
/// ```
#[macro_export]
macro_rules! domain_resource {
    ($type:ident, $id_field:ident) => {
        impl $crate::core::resource::DomainResource for $type {
            fn class() -> $crate::core::resource::ResourceClass {
                $crate::core::resource::ResourceClass::of::<$type>()
            }

            fn runtime_class(&self) -> $crate::core::resource::ResourceClass {
                <$type as $crate::core::resource::DomainResource>::class()
            }

            fn resource_id(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(&self.$id_field)
            }
        }
    };

    ($type:ident extends $parent:ty, $id_field:ident) => {
        impl $crate::core::resource::DomainResource for $type {
            fn class() -> $crate::core::resource::ResourceClass {
                $crate::core::resource::ResourceClass::of::<$type>()
                    .with_parent(<$parent as $crate::core::resource::DomainResource>::class)
            }

            fn runtime_class(&self) -> $crate::core::resource::ResourceClass {
                <$type as $crate::core::resource::DomainResource>::class()
            }

            fn resource_id(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(&self.$id_field)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::resource::{DomainResource, ResourceClass};

    struct Task {
        id: i64,
    }

    domain_resource!(Task, id);

    struct TaskProxy {
        id: i64,
    }

    domain_resource!(TaskProxy extends Task, id);

    #[test]
    fn test_plain_form_generates_impl() {
        let task = Task { id: 42 };
        assert_eq!(task.resource_id(), "42");
        assert_eq!(task.runtime_class(), Task::class());
        assert!(Task::class().parent().is_none());
    }

    #[test]
    fn test_extends_form_links_parent() {
        let proxy = TaskProxy { id: 7 };
        assert_eq!(proxy.resource_id(), "7");
        assert_eq!(
            TaskProxy::class().parent().expect("parent declared"),
            Task::class()
        );
        assert_ne!(TaskProxy::class(), Task::class());
    }

    #[test]
    fn test_generated_impl_is_object_safe() {
        let proxy = TaskProxy { id: 7 };
        let resource: &dyn DomainResource = &proxy;
        assert_eq!(resource.runtime_class(), ResourceClass::of::<TaskProxy>());
    }
}
