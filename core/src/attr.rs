//! Typed attribute values and their JSON conversions.
//!
//! # Design
//! `AttrType` is implemented by every Rust type that can sit inside a
//! `TriState`: the four primitives, `Vec<T>`, `BTreeMap<String, T>`,
//! `Dynamic`, nested models (via `model!`) and `TriState<T>` itself, which
//! lets list and map elements carry their own null/unknown state.
//!
//! `Field` is the object-safe face of a model field. The walker hands each
//! field out as `&dyn Field`, so the encoder, decoder and filler never need
//! to know the concrete Rust type behind a binding.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::descriptor::{value_kind, PrimitiveKind, TypeDescriptor};
use crate::dynamic::Dynamic;
use crate::error::ConvertError;
use crate::path::FieldPath;
use crate::value::TriState;

/// A type with a static shape that converts to and from JSON.
pub trait AttrType: Sized {
    fn descriptor() -> TypeDescriptor;

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError>;

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError>;

    /// Replace nested `Unknown` values with `Null`.
    fn fill_unknown(&mut self) {}

    /// Canonical text for a query string. Only primitives have one.
    fn query_text(&self) -> Option<String> {
        None
    }
}

pub(crate) fn mismatch(path: &FieldPath, expected: impl Into<String>, actual: &Value) -> ConvertError {
    ConvertError::TypeMismatch {
        path: path.to_string(),
        expected: expected.into(),
        actual: value_kind(actual),
    }
}

fn range_error(path: &FieldPath, value: impl ToString, reason: &'static str) -> ConvertError {
    ConvertError::NumericRange {
        path: path.to_string(),
        value: value.to_string(),
        reason,
    }
}

// 2^63 is exactly representable as f64; i64::MAX is not.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Convert a JSON number to `i64` without truncation.
///
/// Integral floats (as produced by permissive decoders) convert exactly;
/// fractional values and values outside the `i64` range are rejected.
pub fn number_to_i64(n: &Number, path: &FieldPath) -> Result<i64, ConvertError> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(range_error(path, n, "overflows int64"));
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => Err(range_error(path, n, "is not finite")),
        Some(f) if f.fract() != 0.0 => Err(range_error(path, n, "is not integral")),
        Some(f) if !(-I64_UPPER_BOUND..I64_UPPER_BOUND).contains(&f) => {
            Err(range_error(path, n, "overflows int64"))
        }
        Some(f) => Ok(f as i64),
        None => Err(range_error(path, n, "has no numeric representation")),
    }
}

/// Read an `i64` out of a raw JSON value, e.g. an id returned by the backend.
pub fn num_to_i64(value: &Value) -> Result<i64, ConvertError> {
    match value {
        Value::Number(n) => number_to_i64(n, &FieldPath::root()),
        other => Err(mismatch(&FieldPath::root(), PrimitiveKind::Int64.name(), other)),
    }
}

impl AttrType for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Bool)
    }

    fn encode(&self, _path: &FieldPath) -> Result<Value, ConvertError> {
        Ok(Value::Bool(*self))
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        value.as_bool().ok_or_else(|| mismatch(path, "bool", value))
    }

    fn query_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl AttrType for i64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Int64)
    }

    fn encode(&self, _path: &FieldPath) -> Result<Value, ConvertError> {
        Ok(Value::Number((*self).into()))
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        match value {
            Value::Number(n) => number_to_i64(n, path),
            other => Err(mismatch(path, "int64", other)),
        }
    }

    fn query_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl AttrType for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Float64)
    }

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError> {
        Number::from_f64(*self)
            .map(Value::Number)
            .ok_or_else(|| range_error(path, self, "is not representable in JSON"))
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| range_error(path, n, "has no float64 representation")),
            other => Err(mismatch(path, "float64", other)),
        }
    }

    // `Display` for f64 prints the shortest text that parses back to the same value.
    fn query_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl AttrType for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::String)
    }

    fn encode(&self, _path: &FieldPath) -> Result<Value, ConvertError> {
        Ok(Value::String(self.clone()))
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(path, "string", value))
    }

    fn query_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: AttrType> AttrType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::List(Box::new(T::descriptor()))
    }

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError> {
        self.iter()
            .enumerate()
            .map(|(i, item)| item.encode(&path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        let Value::Array(items) = value else {
            return Err(mismatch(path, Self::descriptor().kind_name(), value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode(item, &path.index(i)))
            .collect()
    }

    fn fill_unknown(&mut self) {
        self.iter_mut().for_each(T::fill_unknown);
    }
}

impl<T: AttrType> AttrType for BTreeMap<String, T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Map(Box::new(T::descriptor()))
    }

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError> {
        let mut out = Map::with_capacity(self.len());
        for (key, item) in self {
            out.insert(key.clone(), item.encode(&path.key(key))?);
        }
        Ok(Value::Object(out))
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        let Value::Object(entries) = value else {
            return Err(mismatch(path, Self::descriptor().kind_name(), value));
        };
        entries
            .iter()
            .map(|(key, item)| Ok::<_, ConvertError>((key.clone(), T::decode(item, &path.key(key))?)))
            .collect()
    }

    fn fill_unknown(&mut self) {
        self.values_mut().for_each(T::fill_unknown);
    }
}

impl AttrType for Dynamic {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Dynamic
    }

    fn encode(&self, _path: &FieldPath) -> Result<Value, ConvertError> {
        Ok(self.to_value())
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        Dynamic::resolve(value, path)
    }
}

/// Elements and fields: `Null` and `Unknown` both go out as JSON `null`.
impl<T: AttrType> AttrType for TriState<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError> {
        match self {
            TriState::Known(v) => v.encode(path),
            TriState::Null => Ok(Value::Null),
            TriState::Unknown => {
                tracing::debug!(%path, "encoding unknown value as null");
                Ok(Value::Null)
            }
        }
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(TriState::Null),
            other => T::decode(other, path).map(TriState::Known),
        }
    }

    fn fill_unknown(&mut self) {
        match self {
            TriState::Unknown => *self = TriState::Null,
            TriState::Known(v) => v.fill_unknown(),
            TriState::Null => {}
        }
    }

    fn query_text(&self) -> Option<String> {
        self.as_known().and_then(T::query_text)
    }
}

/// Object-safe access to one model field.
pub trait Field {
    fn descriptor(&self) -> TypeDescriptor;

    fn is_null(&self) -> bool;

    fn is_unknown(&self) -> bool;

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError>;

    /// Decode from the value found under the field's key; `None` means the
    /// key was absent and yields `Null`.
    fn decode(&mut self, value: Option<&Value>, path: &FieldPath) -> Result<(), ConvertError>;

    fn fill_unknown(&mut self);

    fn query_text(&self) -> Option<String>;
}

impl<T: AttrType> Field for TriState<T> {
    fn descriptor(&self) -> TypeDescriptor {
        T::descriptor()
    }

    fn is_null(&self) -> bool {
        TriState::is_null(self)
    }

    fn is_unknown(&self) -> bool {
        TriState::is_unknown(self)
    }

    fn encode(&self, path: &FieldPath) -> Result<Value, ConvertError> {
        AttrType::encode(self, path)
    }

    fn decode(&mut self, value: Option<&Value>, path: &FieldPath) -> Result<(), ConvertError> {
        *self = match value {
            None => TriState::Null,
            Some(v) => <TriState<T> as AttrType>::decode(v, path)?,
        };
        Ok(())
    }

    fn fill_unknown(&mut self) {
        AttrType::fill_unknown(self)
    }

    fn query_text(&self) -> Option<String> {
        AttrType::query_text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root() -> FieldPath {
        FieldPath::root().field("f")
    }

    #[test]
    fn integral_float_decodes_to_int() {
        assert_eq!(i64::decode(&json!(5.0), &root()).unwrap(), 5);
        assert_eq!(i64::decode(&json!(-12), &root()).unwrap(), -12);
    }

    #[test]
    fn fractional_float_is_rejected_for_int() {
        let err = i64::decode(&json!(5.5), &root()).unwrap_err();
        assert!(matches!(err, ConvertError::NumericRange { reason: "is not integral", .. }));
    }

    #[test]
    fn u64_beyond_i64_overflows() {
        let err = i64::decode(&json!(u64::MAX), &root()).unwrap_err();
        assert!(matches!(err, ConvertError::NumericRange { reason: "overflows int64", .. }));
        let err = i64::decode(&json!(1e19), &root()).unwrap_err();
        assert!(matches!(err, ConvertError::NumericRange { reason: "overflows int64", .. }));
    }

    #[test]
    fn i64_min_as_float_is_exact() {
        assert_eq!(i64::decode(&json!(-9_223_372_036_854_775_808.0), &root()).unwrap(), i64::MIN);
    }

    #[test]
    fn strings_are_not_stringified() {
        let err = String::decode(&json!(12), &root()).unwrap_err();
        assert_eq!(
            err,
            ConvertError::TypeMismatch {
                path: "f".into(),
                expected: "string".into(),
                actual: "number",
            }
        );
        assert!(bool::decode(&json!("true"), &root()).is_err());
    }

    #[test]
    fn float_accepts_any_number() {
        assert_eq!(f64::decode(&json!(3), &root()).unwrap(), 3.0);
        assert_eq!(f64::decode(&json!(0.25), &root()).unwrap(), 0.25);
    }

    #[test]
    fn nan_cannot_be_encoded() {
        let err = f64::NAN.encode(&root()).unwrap_err();
        assert!(matches!(err, ConvertError::NumericRange { .. }));
    }

    #[test]
    fn list_element_error_names_index() {
        let err = Vec::<i64>::decode(&json!([1, 2, "x"]), &root()).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch at f[2]: expected int64, got string");
    }

    #[test]
    fn null_list_element_needs_tristate() {
        assert!(Vec::<String>::decode(&json!(["a", null]), &root()).is_err());
        let items = Vec::<TriState<String>>::decode(&json!(["a", null]), &root()).unwrap();
        assert_eq!(items, vec![TriState::Known("a".into()), TriState::Null]);
    }

    #[test]
    fn map_decodes_by_key() {
        let map = BTreeMap::<String, i64>::decode(&json!({"b": 2, "a": 1}), &root()).unwrap();
        assert_eq!(map.get("a"), Some(&1));
        let err = BTreeMap::<String, i64>::decode(&json!({"a": true}), &root()).unwrap_err();
        assert_eq!(err.to_string(), r#"type mismatch at f["a"]: expected int64, got bool"#);
    }

    #[test]
    fn tristate_field_absent_is_null() {
        let mut field: TriState<i64> = TriState::Known(4);
        Field::decode(&mut field, None, &root()).unwrap();
        assert!(field.is_null());
    }

    #[test]
    fn empty_list_is_known() {
        let mut field: TriState<Vec<String>> = TriState::Null;
        Field::decode(&mut field, Some(&json!([])), &root()).unwrap();
        assert_eq!(field, TriState::Known(Vec::new()));
    }

    #[test]
    fn query_text_forms() {
        assert_eq!(true.query_text().as_deref(), Some("true"));
        assert_eq!(1_000_000_i64.query_text().as_deref(), Some("1000000"));
        assert_eq!(0.1_f64.query_text().as_deref(), Some("0.1"));
        assert_eq!(vec![1_i64].query_text(), None);
        assert_eq!(AttrType::query_text(&TriState::<String>::Unknown), None);
    }

    #[test]
    fn num_to_i64_reads_raw_values() {
        assert_eq!(num_to_i64(&json!(42.0)).unwrap(), 42);
        assert!(num_to_i64(&json!("42")).is_err());
    }
}
