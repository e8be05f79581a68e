//! Macros for declaring schemas.
//!
//! The [`define_schema!`] macro implements [`crate::Entity`] and
//! [`crate::Schema`] for a struct, tying it to a collection name.

/// Implements [`crate::Entity`] and [`crate::Schema`] for a struct.
///
/// # Syntax
///
/// ```ignore
/// define_schema!(User => "users");          // identifier field is `id`
/// define_schema!(Tag => "tags", key);       // identifier field is `key`
/// ```
///
/// The identifier field must be an `Option<ObjectId>`. The struct itself must
/// already derive `Serialize` and `Deserialize`.
#[macro_export]
macro_rules! define_schema {
    ($entity:ty => $collection:literal) => {
        $crate::define_schema!($entity => $collection, id);
    };

    ($entity:ty => $collection:literal, $field:ident) => {
        impl $crate::Entity for $entity {
            fn id(&self) -> ::std::option::Option<$crate::ObjectId> {
                self.$field
            }

            fn set_id(&mut self, id: $crate::ObjectId) {
                self.$field = ::std::option::Option::Some(id);
            }
        }

        impl $crate::Schema for $entity {
            const COLLECTION: &'static str = $collection;
        }
    };
}
