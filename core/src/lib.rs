//! Conversion engine and request plumbing for the EDA API.
//!
//! # Overview
//! Models are plain structs whose attributes are `TriState<_>`: absent
//! (`Null`), not yet decided (`Unknown`) or present (`Known`). The engine
//! converts them to and from the JSON the API speaks:
//!
//! - `to_body` / `to_query_params` encode a model for a request.
//! - `from_response` decodes a response into a model, all or nothing.
//! - `fill_unknown` turns every undecided value into `Null` before a write.
//! - `Dynamic` carries attributes whose shape is only known at runtime.
//!
//! # Design
//! No network access happens here (host-does-IO). `EdaClient`,
//! `ResourceClient` and `DataSourceClient` split each operation into a
//! `build_*` step that produces an `HttpRequest` and a `parse_*` step that
//! consumes an `HttpResponse`; the caller performs the round-trip.

pub mod attr;
pub mod client;
pub mod data_source;
pub mod data_sources;
pub mod decode;
pub mod descriptor;
pub mod dynamic;
pub mod encode;
pub mod error;
pub mod fill;
pub mod http;
pub mod model;
pub mod path;
pub mod resource;
pub mod resources;
pub mod value;

pub use serde_json::{Map, Value};

pub use attr::{num_to_i64, AttrType, Field};
pub use client::EdaClient;
pub use data_source::{DataSource, DataSourceClient};
pub use decode::from_response;
pub use descriptor::{FieldBinding, FieldFlags, PrimitiveKind, TypeDescriptor};
pub use dynamic::Dynamic;
pub use encode::{to_body, to_query_params};
pub use error::{ApiError, ConvertError};
pub use fill::fill_unknown;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use model::Model;
pub use path::{FieldPath, PathStep};
pub use resource::{Resource, ResourceClient};
pub use value::TriState;
