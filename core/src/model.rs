//! Structural walker over typed models.
//!
//! # Design
//! A model is a plain struct whose fields are all `TriState<_>`. The
//! `model!` macro registers, once per type, a binding table (field name,
//! shape, flags) in declaration order and implements `Model::walk` /
//! `Model::walk_mut`, which pair every binding with its field as a
//! `&dyn Field`. Everything else in the engine is written against those two
//! traversals, so there is no runtime type inspection anywhere.
//!
//! Nested models get an `AttrType` impl from the same macro, which is how
//! the walker recurses into objects held by fields, list elements and map
//! values.

use serde_json::{Map, Value};

use crate::attr::{mismatch, Field};
use crate::descriptor::{FieldBinding, TypeDescriptor};
use crate::error::ConvertError;
use crate::path::FieldPath;

/// Visitor passed to `Model::walk`.
pub type Visit<'a> = dyn FnMut(&FieldBinding, &dyn Field) -> Result<(), ConvertError> + 'a;

/// Visitor passed to `Model::walk_mut`.
pub type VisitMut<'a> = dyn FnMut(&FieldBinding, &mut dyn Field) -> Result<(), ConvertError> + 'a;

/// Visitor passed to `Model::for_each`; it cannot fail.
pub type Each<'a> = dyn FnMut(&FieldBinding, &dyn Field) + 'a;

pub type EachMut<'a> = dyn FnMut(&FieldBinding, &mut dyn Field) + 'a;

/// A typed model with a statically registered field table.
pub trait Model: Default + 'static {
    /// Field bindings in declaration order, built once per type.
    fn bindings() -> &'static [FieldBinding];

    /// Visit every field in declaration order, stopping at the first error.
    fn walk(&self, visit: &mut Visit<'_>) -> Result<(), ConvertError>;

    fn walk_mut(&mut self, visit: &mut VisitMut<'_>) -> Result<(), ConvertError>;

    /// Visit every field in declaration order.
    fn for_each(&self, visit: &mut Each<'_>);

    fn for_each_mut(&mut self, visit: &mut EachMut<'_>);

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Object(Self::bindings())
    }
}

/// Encode every field of `model` into a JSON object.
///
/// Null and unknown fields are omitted unless their binding asks for an
/// explicit null.
pub fn encode_object<M: Model>(model: &M, path: &FieldPath) -> Result<Map<String, Value>, ConvertError> {
    let mut out = Map::new();
    model.walk(&mut |binding, field| {
        if field.is_null() || field.is_unknown() {
            if binding.sends_null() {
                out.insert(binding.name.to_owned(), Value::Null);
            }
            return Ok(());
        }
        let value = field.encode(&path.field(binding.name))?;
        out.insert(binding.name.to_owned(), value);
        Ok(())
    })?;
    Ok(out)
}

/// Decode a JSON object into a fresh model. Missing keys become `Null`;
/// keys the model does not declare are ignored.
pub fn decode_object<M: Model>(value: &Value, path: &FieldPath) -> Result<M, ConvertError> {
    let Value::Object(entries) = value else {
        return Err(mismatch(path, "object", value));
    };
    let mut model = M::default();
    model.walk_mut(&mut |binding, field| field.decode(entries.get(binding.name), &path.field(binding.name)))?;
    Ok(model)
}

pub fn fill_object<M: Model>(model: &mut M) {
    model.for_each_mut(&mut |_, field| field.fill_unknown());
}

/// Reject the model if any field flagged `REQUIRED` is null.
///
/// Only top-level bindings are checked; nested requirements are left to the
/// backend.
pub fn check_required<M: Model>(model: &M) -> Result<(), ConvertError> {
    model.walk(&mut |binding, field| {
        if binding.is_required() && field.is_null() {
            return Err(ConvertError::MissingRequiredField {
                path: FieldPath::root().field(binding.name).to_string(),
            });
        }
        Ok(())
    })
}

/// Declare a model struct and register its field bindings.
///
/// Every field must be a `TriState<_>`. Flags follow the type after `=>`:
///
/// ```
/// use eda_core::{model, TriState};
///
/// model! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct Widget {
///         pub name: TriState<String> => REQUIRED,
///         pub note: TriState<String> => SEND_NULL,
///         pub port: TriState<i64>,
///     }
/// }
///
/// let widget = Widget { name: TriState::Known("p1".into()), ..Default::default() };
/// let body = eda_core::to_body(&widget).unwrap();
/// assert_eq!(serde_json::Value::Object(body), serde_json::json!({"name": "p1", "note": null}));
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $($flag:ident)|+)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::model::Model for $name {
            fn bindings() -> &'static [$crate::descriptor::FieldBinding] {
                static BINDINGS: ::std::sync::OnceLock<::std::vec::Vec<$crate::descriptor::FieldBinding>> =
                    ::std::sync::OnceLock::new();
                BINDINGS.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::descriptor::FieldBinding::new(
                                ::std::stringify!($field),
                                <$ty as $crate::attr::AttrType>::descriptor(),
                                $crate::descriptor::FieldFlags::NONE
                                    $($(.union($crate::descriptor::FieldFlags::$flag))+)?,
                            ),
                        )*
                    ]
                })
            }

            fn walk(&self, visit: &mut $crate::model::Visit<'_>) -> ::std::result::Result<(), $crate::error::ConvertError> {
                let fields: ::std::vec::Vec<&dyn $crate::attr::Field> =
                    ::std::vec![$(&self.$field as &dyn $crate::attr::Field),*];
                for (binding, field) in <Self as $crate::model::Model>::bindings().iter().zip(fields) {
                    visit(binding, field)?;
                }
                ::std::result::Result::Ok(())
            }

            fn for_each(&self, visit: &mut $crate::model::Each<'_>) {
                let fields: ::std::vec::Vec<&dyn $crate::attr::Field> =
                    ::std::vec![$(&self.$field as &dyn $crate::attr::Field),*];
                for (binding, field) in <Self as $crate::model::Model>::bindings().iter().zip(fields) {
                    visit(binding, field);
                }
            }

            fn for_each_mut(&mut self, visit: &mut $crate::model::EachMut<'_>) {
                let fields: ::std::vec::Vec<&mut dyn $crate::attr::Field> =
                    ::std::vec![$(&mut self.$field as &mut dyn $crate::attr::Field),*];
                for (binding, field) in <Self as $crate::model::Model>::bindings().iter().zip(fields) {
                    visit(binding, field);
                }
            }

            fn walk_mut(&mut self, visit: &mut $crate::model::VisitMut<'_>) -> ::std::result::Result<(), $crate::error::ConvertError> {
                let fields: ::std::vec::Vec<&mut dyn $crate::attr::Field> =
                    ::std::vec![$(&mut self.$field as &mut dyn $crate::attr::Field),*];
                for (binding, field) in <Self as $crate::model::Model>::bindings().iter().zip(fields) {
                    visit(binding, field)?;
                }
                ::std::result::Result::Ok(())
            }
        }

        impl $crate::attr::AttrType for $name {
            fn descriptor() -> $crate::descriptor::TypeDescriptor {
                <Self as $crate::model::Model>::descriptor()
            }

            fn encode(&self, path: &$crate::path::FieldPath) -> ::std::result::Result<$crate::Value, $crate::error::ConvertError> {
                $crate::model::encode_object(self, path).map($crate::Value::Object)
            }

            fn decode(value: &$crate::Value, path: &$crate::path::FieldPath) -> ::std::result::Result<Self, $crate::error::ConvertError> {
                $crate::model::decode_object(value, path)
            }

            fn fill_unknown(&mut self) {
                $crate::model::fill_object(self)
            }
        }
    };
}
