//! Model to request body / query string.
//!
//! Callers are expected to run `fill_unknown` first. An `Unknown` that slips
//! through is treated as `Null` rather than sent.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::model::{encode_object, Model};
use crate::path::FieldPath;

/// Encode a model as a nested JSON object for a request body.
///
/// Null fields are omitted, except those bound with `SEND_NULL`, which are
/// sent as an explicit `null` so the backend clears the prior value.
pub fn to_body<M: Model>(model: &M) -> Result<Map<String, Value>, ConvertError> {
    encode_object(model, &FieldPath::root())
}

/// Encode the top-level primitive fields of a model as query parameters.
///
/// Lists, maps, objects and dynamic fields are skipped. Null and unknown
/// fields are absent from the result.
pub fn to_query_params<M: Model>(model: &M) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    model.for_each(&mut |binding, field| {
        if !binding.descriptor.is_primitive() {
            return;
        }
        if let Some(text) = field.query_text() {
            params.insert(binding.name.to_owned(), text);
        }
    });
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TriState;
    use serde_json::json;

    crate::model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Filter {
            region: TriState<String>,
            limit: TriState<i64>,
            ratio: TriState<f64>,
            verbose: TriState<bool>,
            tags: TriState<Vec<String>>,
        }
    }

    crate::model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Patch {
            name: TriState<String>,
            comment: TriState<String> => SEND_NULL,
            owner: TriState<String>,
        }
    }

    #[test]
    fn query_omits_null_and_unknown() {
        let mut filter = Filter {
            region: TriState::Unknown,
            ..Default::default()
        };
        assert!(!to_query_params(&filter).contains_key("region"));

        filter.region = TriState::Null;
        assert!(!to_query_params(&filter).contains_key("region"));

        filter.region = TriState::Known("eu-west".into());
        assert_eq!(to_query_params(&filter).get("region").map(String::as_str), Some("eu-west"));
    }

    #[test]
    fn query_stringifies_primitives_and_skips_lists() {
        let filter = Filter {
            region: TriState::Null,
            limit: TriState::Known(1500),
            ratio: TriState::Known(0.5),
            verbose: TriState::Known(false),
            tags: TriState::Known(vec!["a".into()]),
        };
        let params = to_query_params(&filter);
        assert_eq!(
            params,
            BTreeMap::from([
                ("limit".to_string(), "1500".to_string()),
                ("ratio".to_string(), "0.5".to_string()),
                ("verbose".to_string(), "false".to_string()),
            ])
        );
    }

    #[test]
    fn body_distinguishes_omit_from_explicit_null() {
        let patch = Patch {
            name: TriState::Known("r1".into()),
            comment: TriState::Null,
            owner: TriState::Null,
        };
        let body = to_body(&patch).unwrap();
        assert_eq!(Value::Object(body), json!({"name": "r1", "comment": null}));
    }

    #[test]
    fn body_never_carries_unknown() {
        let patch = Patch {
            name: TriState::Unknown,
            comment: TriState::Unknown,
            owner: TriState::Known("ops".into()),
        };
        let body = to_body(&patch).unwrap();
        assert_eq!(Value::Object(body), json!({"comment": null, "owner": "ops"}));
    }

    #[test]
    fn empty_list_is_sent_as_empty() {
        let filter = Filter {
            tags: TriState::Known(Vec::new()),
            ..Default::default()
        };
        let body = to_body(&filter).unwrap();
        assert_eq!(Value::Object(body), json!({"tags": []}));
    }
}
