//! API response to model.

use serde_json::Value;

use crate::error::ConvertError;
use crate::model::{decode_object, Model};
use crate::path::FieldPath;

/// Populate `model` from a decoded response body.
///
/// Keys are matched exactly. A key that is absent sets the field to `Null`;
/// a present key must match the field's shape. The model is replaced only if
/// every field decodes, so a failed call leaves it untouched.
pub fn from_response<M: Model>(value: &Value, model: &mut M) -> Result<(), ConvertError> {
    let decoded = decode_object::<M>(value, &FieldPath::root())?;
    *model = decoded;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::dynamic::Dynamic;
    use crate::value::TriState;
    use serde_json::json;

    crate::model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Label {
            name: TriState<String>,
            value: TriState<String>,
        }
    }

    crate::model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Spec {
            replicas: TriState<i64>,
            labels: TriState<Vec<Label>>,
            annotations: TriState<BTreeMap<String, String>>,
        }
    }

    crate::model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Deployment {
            name: TriState<String>,
            tags: TriState<Vec<String>>,
            spec: TriState<Spec>,
            extra: TriState<Dynamic>,
        }
    }

    #[test]
    fn empty_list_and_absent_key_differ() {
        let mut model = Deployment::default();
        from_response(&json!({"tags": []}), &mut model).unwrap();
        assert_eq!(model.tags, TriState::Known(Vec::new()));

        from_response(&json!({}), &mut model).unwrap();
        assert_eq!(model.tags, TriState::Null);
    }

    #[test]
    fn nested_type_mismatch_names_path() {
        let mut model = Deployment::default();
        let err = from_response(&json!({"spec": {"replicas": "three"}}), &mut model).unwrap_err();
        assert_eq!(
            err,
            ConvertError::TypeMismatch {
                path: "spec.replicas".into(),
                expected: "int64".into(),
                actual: "string",
            }
        );
    }

    #[test]
    fn list_of_objects_path() {
        let mut model = Deployment::default();
        let input = json!({"spec": {"labels": [{"name": "a"}, {"name": "b"}, {"name": 3}]}});
        let err = from_response(&input, &mut model).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch at spec.labels[2].name: expected string, got number");
    }

    #[test]
    fn failure_leaves_model_untouched() {
        let mut model = Deployment {
            name: TriState::Known("before".into()),
            ..Default::default()
        };
        let snapshot = model.clone();
        let err = from_response(&json!({"name": "after", "spec": {"replicas": 1.5}}), &mut model);
        assert!(matches!(err, Err(ConvertError::NumericRange { .. })));
        assert_eq!(model, snapshot);
    }

    #[test]
    fn integral_float_becomes_int() {
        let mut model = Deployment::default();
        from_response(&json!({"spec": {"replicas": 5.0}}), &mut model).unwrap();
        let spec = model.spec.as_known().unwrap();
        assert_eq!(spec.replicas, TriState::Known(5));
    }

    #[test]
    fn dynamic_field_keeps_structure() {
        let mut model = Deployment::default();
        let extra = json!({"list": [1, {"deep": null}], "flag": true});
        from_response(&json!({"extra": extra}), &mut model).unwrap();
        let TriState::Known(dynamic) = &model.extra else {
            panic!("extra should be known");
        };
        assert_eq!(dynamic.to_value(), extra);
    }

    #[test]
    fn explicit_null_and_unlisted_keys() {
        let mut model = Deployment::default();
        from_response(&json!({"name": null, "status": {"ready": true}}), &mut model).unwrap();
        assert_eq!(model, Deployment::default());
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut model = Deployment::default();
        from_response(&json!({"Name": "x"}), &mut model).unwrap();
        assert!(model.name.is_null());
    }

    #[test]
    fn map_values_decode() {
        let mut model = Deployment::default();
        from_response(&json!({"spec": {"annotations": {"team": "net"}}}), &mut model).unwrap();
        let spec = model.spec.as_known().unwrap();
        assert_eq!(
            spec.annotations,
            TriState::Known(BTreeMap::from([("team".to_string(), "net".to_string())]))
        );
    }
}
