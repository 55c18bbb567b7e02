//! Error types for the conversion engine and the API client.
//!
//! # Design
//! `ConvertError` covers everything the engine can reject while moving values
//! between typed models and JSON. Every variant carries the rendered field
//! path so the caller can point at the offending attribute. Nothing is
//! coerced on a best-effort basis; a value that does not fit is an error.
//!
//! `ApiError` wraps the transport side. `NotFound` gets a dedicated variant
//! because callers frequently distinguish "the resource does not exist" from
//! "the server returned an unexpected status." All other non-2xx responses
//! land in `HttpError` with the raw status code and body for debugging.

use thiserror::Error;

/// Errors raised while encoding, decoding or validating a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The JSON kind at `path` does not match the declared field shape.
    #[error("type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: &'static str,
    },

    /// A number could not be represented exactly in the target type.
    #[error("numeric range error at {path}: {value} {reason}")]
    NumericRange {
        path: String,
        value: String,
        reason: &'static str,
    },

    /// A dynamic value held a JSON construct that could not be classified.
    #[error("unsupported dynamic shape at {path}: {detail}")]
    UnsupportedDynamicShape { path: String, detail: String },

    /// A field flagged as required is null.
    #[error("missing required field {path}")]
    MissingRequiredField { path: String },
}

/// Errors returned by `EdaClient` and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the object does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The base URL or an expanded path could not be parsed.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A `{param}` placeholder in a path template had no value.
    #[error("missing path parameter {name}")]
    MissingPathParam { name: String },

    /// A path parameter was present but malformed.
    #[error("invalid path parameter {name}: {reason}")]
    InvalidPathParam { name: String, reason: String },

    /// An import id did not name an object.
    #[error("invalid import id {id:?}: {reason}")]
    InvalidImportId { id: String, reason: String },

    /// The model could not be converted to or from JSON.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}
