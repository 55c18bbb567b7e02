//! Stateless HTTP request builder and response parser for the EDA API.
//!
//! # Design
//! `EdaClient` holds only a `base_url` and carries no mutable state between
//! calls. Requests are built from a path template such as
//! `/core/admin/roles/{name}`, a set of path parameters, query parameters and
//! an optional JSON body. Responses are checked for status and parsed into an
//! untyped JSON tree that the conversion engine then decodes. The caller
//! executes the HTTP round-trip in between.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::value::TriState;

/// Synchronous, stateless client for the EDA API.
#[derive(Debug, Clone)]
pub struct EdaClient {
    base_url: String,
}

impl EdaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request from a path template.
    ///
    /// Each `{name}` segment of `template` is replaced by the matching entry
    /// of `path_params`, percent-encoded. Query parameters are appended in
    /// key order.
    pub fn build_request(
        &self,
        method: HttpMethod,
        template: &str,
        path_params: &[(&str, String)],
        query: &BTreeMap<String, String>,
        body: Option<&Map<String, Value>>,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();
            for segment in template.trim_start_matches('/').split('/') {
                segments.push(&expand_segment(segment, path_params)?);
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        let (headers, body) = match body {
            Some(body) => {
                let text = serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
                (
                    vec![("content-type".to_string(), "application/json".to_string())],
                    Some(text),
                )
            }
            None => (Vec::new(), None),
        };

        tracing::debug!(method = method.as_str(), url = %url, "built request");
        Ok(HttpRequest {
            method,
            path: url.to_string(),
            headers,
            body,
        })
    }

    /// Check the status and parse the body as JSON.
    ///
    /// An empty 2xx body parses as JSON `null`.
    pub fn parse_json(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Check the status only; the body is discarded.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Path parameter taken from a string field. Null, unknown and empty
/// strings are all missing.
pub fn path_param(name: &'static str, value: &TriState<String>) -> Result<(&'static str, String), ApiError> {
    match value {
        TriState::Known(s) if !s.is_empty() => Ok((name, s.clone())),
        _ => Err(ApiError::MissingPathParam { name: name.to_string() }),
    }
}

fn expand_segment(segment: &str, params: &[(&str, String)]) -> Result<String, ApiError> {
    let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return Ok(segment.to_string());
    };
    params
        .iter()
        .find(|(key, _)| *key == name)
        .filter(|(_, value)| !value.is_empty())
        .map(|(_, value)| value.clone())
        .ok_or_else(|| ApiError::MissingPathParam { name: name.to_string() })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
