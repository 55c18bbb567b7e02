//! Static shape descriptions of model fields.
//!
//! # Design
//! A `TypeDescriptor` says what a field holds: a primitive, a list or map of
//! some element shape, a nested object with its own field table, or a dynamic
//! value whose shape is only known at runtime. Descriptors are derived from
//! Rust types through `AttrType::descriptor` and never inferred from data.
//!
//! Object descriptors point at the `'static` binding table that the `model!`
//! macro registers for the nested model, so a descriptor tree is cheap to
//! clone and shared by every conversion of that model type.

use std::fmt;

use serde_json::Value;

/// Scalar kinds a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    Int64,
    Float64,
    String,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
        }
    }
}

/// Shape of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    List(Box<TypeDescriptor>),
    /// String-keyed map.
    Map(Box<TypeDescriptor>),
    /// Nested object, fields in declaration order.
    Object(&'static [FieldBinding]),
    Dynamic,
}

impl TypeDescriptor {
    /// Short kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Primitive(kind) => kind.name(),
            TypeDescriptor::List(_) => "list",
            TypeDescriptor::Map(_) => "map",
            TypeDescriptor::Object(_) => "object",
            TypeDescriptor::Dynamic => "dynamic",
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::List(elem) => write!(f, "list({elem})"),
            TypeDescriptor::Map(elem) => write!(f, "map({elem})"),
            TypeDescriptor::Object(fields) => {
                f.write_str("object{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.descriptor)?;
                }
                f.write_str("}")
            }
            other => f.write_str(other.kind_name()),
        }
    }
}

/// Per-field wire behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFlags(u8);

impl FieldFlags {
    pub const NONE: FieldFlags = FieldFlags(0);
    /// Emit an explicit JSON `null` when the field is null, so that a
    /// patch-style update clears the prior value instead of keeping it.
    pub const SEND_NULL: FieldFlags = FieldFlags(1);
    /// The orchestration layer rejects the model when this field is null.
    pub const REQUIRED: FieldFlags = FieldFlags(1 << 1);
    /// Assigned by the backend rather than by the caller.
    pub const COMPUTED: FieldFlags = FieldFlags(1 << 2);

    pub const fn union(self, other: FieldFlags) -> FieldFlags {
        FieldFlags(self.0 | other.0)
    }

    pub const fn contains(self, other: FieldFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Connects a model field to its JSON key.
///
/// The key is the field name; there is no renaming layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub name: &'static str,
    pub descriptor: TypeDescriptor,
    pub flags: FieldFlags,
}

impl FieldBinding {
    pub fn new(name: &'static str, descriptor: TypeDescriptor, flags: FieldFlags) -> Self {
        Self {
            name,
            descriptor,
            flags,
        }
    }

    pub fn sends_null(&self) -> bool {
        self.flags.contains(FieldFlags::SEND_NULL)
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(FieldFlags::REQUIRED)
    }

    pub fn is_computed(&self) -> bool {
        self.flags.contains(FieldFlags::COMPUTED)
    }
}

/// Kind name of an untyped JSON value, as reported in errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
