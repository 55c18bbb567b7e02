//! Read-only data sources.
//!
//! A data source sends the scalar attributes of its config model as query
//! parameters, fills path placeholders from the same model, and decodes the
//! response back into it. Config attributes the response does not carry keep
//! their configured values, so the result can be read again.

use std::marker::PhantomData;

use serde_json::Value;

use crate::client::EdaClient;
use crate::decode::from_response;
use crate::encode::to_query_params;
use crate::error::{ApiError, ConvertError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::model::{encode_object, Model};
use crate::path::FieldPath;

pub trait DataSource {
    type Model: Model;

    const TYPE_NAME: &'static str;
    const READ_PATH: &'static str;

    fn path_params(_config: &Self::Model) -> Result<Vec<(&'static str, String)>, ApiError> {
        Ok(Vec::new())
    }

    /// Reshape the raw response before it is decoded, e.g. to put a bare
    /// JSON array under the attribute that holds it.
    fn wrap_response(result: Value) -> Value {
        result
    }
}

#[derive(Debug, Clone)]
pub struct DataSourceClient<D> {
    client: EdaClient,
    _source: PhantomData<D>,
}

impl<D: DataSource> DataSourceClient<D> {
    pub fn new(client: EdaClient) -> Self {
        Self {
            client,
            _source: PhantomData,
        }
    }

    pub fn build_read(&self, config: &D::Model) -> Result<HttpRequest, ApiError> {
        let params = D::path_params(config)?;
        let query = to_query_params(config);
        tracing::info!(data_source = D::TYPE_NAME, path = D::READ_PATH, query = ?query, "read request");
        self.client
            .build_request(HttpMethod::Get, D::READ_PATH, &params, &query, None)
    }

    /// Decode the response into `model`; on error `model` is left as it was.
    pub fn parse_read(&self, response: HttpResponse, model: &mut D::Model) -> Result<(), ApiError> {
        let result = self.client.parse_json(response)?;
        tracing::info!(data_source = D::TYPE_NAME, path = D::READ_PATH, result = %result, "read returned");
        let mut decoded = D::Model::default();
        from_response(&D::wrap_response(result), &mut decoded)?;
        keep_config(model, &mut decoded)?;
        *model = decoded;
        Ok(())
    }
}

/// Copy the non-null values of `config` into the fields `decoded` left null.
fn keep_config<M: Model>(config: &M, decoded: &mut M) -> Result<(), ConvertError> {
    let config = encode_object(config, &FieldPath::root())?;
    decoded.walk_mut(&mut |binding, field| match config.get(binding.name) {
        Some(value) if field.is_null() && !value.is_null() => {
            field.decode(Some(value), &FieldPath::root().field(binding.name))
        }
        _ => Ok(()),
    })
}
