//! CRUD plumbing shared by every managed resource.
//!
//! # Design
//! Each resource follows the same steps: fill unknown plan values with null,
//! encode the model, send it, then read the object back and decode the
//! response into the model so values computed by the backend land in state.
//! `Resource` describes one resource type (endpoints and how to derive path
//! parameters from its model); `ResourceClient` runs the steps.
//!
//! As with `EdaClient`, every step is split into `build_*` and `parse_*`.
//! After a successful create or update the caller issues `build_read` and
//! feeds the result to `parse_read` to pick up computed values.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::client::EdaClient;
use crate::decode::from_response;
use crate::encode::to_body;
use crate::error::ApiError;
use crate::fill::fill_unknown;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::model::{check_required, Model};

/// A managed resource type.
pub trait Resource {
    type Model: Model;

    const TYPE_NAME: &'static str;
    const CREATE_PATH: &'static str;
    const READ_PATH: &'static str;
    const UPDATE_PATH: &'static str;
    const DELETE_PATH: &'static str;

    /// Values for the `{param}` placeholders of the path templates.
    fn path_params(model: &Self::Model) -> Result<Vec<(&'static str, String)>, ApiError>;

    /// State to start from when importing an existing object by `id`. Only
    /// the identifying fields are set; a read fills in the rest.
    fn import_state(id: &str) -> Result<Self::Model, ApiError>;
}

/// Runs the CRUD steps for resource type `R`.
#[derive(Debug, Clone)]
pub struct ResourceClient<R> {
    client: EdaClient,
    _resource: PhantomData<R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(client: EdaClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// Resolve unknowns in `plan` and build the create request.
    pub fn build_create(&self, plan: &mut R::Model) -> Result<HttpRequest, ApiError> {
        self.build_write(HttpMethod::Post, R::CREATE_PATH, plan)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<(), ApiError> {
        let result = self.client.parse_json(response)?;
        tracing::info!(resource = R::TYPE_NAME, path = R::CREATE_PATH, result = %result, "create returned");
        Ok(())
    }

    pub fn build_read(&self, state: &R::Model) -> Result<HttpRequest, ApiError> {
        let params = R::path_params(state)?;
        tracing::info!(resource = R::TYPE_NAME, path = R::READ_PATH, "read request");
        self.client
            .build_request(HttpMethod::Get, R::READ_PATH, &params, &BTreeMap::new(), None)
    }

    /// Decode the read response into `model`.
    ///
    /// On any error `model` is left as it was.
    pub fn parse_read(&self, response: HttpResponse, model: &mut R::Model) -> Result<(), ApiError> {
        let result = self.client.parse_json(response)?;
        tracing::info!(resource = R::TYPE_NAME, path = R::READ_PATH, result = %result, "read returned");
        let mut decoded = R::Model::default();
        from_response(&result, &mut decoded)?;
        check_required(&decoded)?;
        *model = decoded;
        Ok(())
    }

    pub fn build_update(&self, plan: &mut R::Model) -> Result<HttpRequest, ApiError> {
        self.build_write(HttpMethod::Put, R::UPDATE_PATH, plan)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<(), ApiError> {
        let result = self.client.parse_json(response)?;
        tracing::info!(resource = R::TYPE_NAME, path = R::UPDATE_PATH, result = %result, "update returned");
        Ok(())
    }

    pub fn build_delete(&self, state: &R::Model) -> Result<HttpRequest, ApiError> {
        let params = R::path_params(state)?;
        tracing::info!(resource = R::TYPE_NAME, path = R::DELETE_PATH, "delete request");
        self.client
            .build_request(HttpMethod::Delete, R::DELETE_PATH, &params, &BTreeMap::new(), None)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.client.parse_empty(response)?;
        tracing::info!(resource = R::TYPE_NAME, path = R::DELETE_PATH, "delete returned");
        Ok(())
    }

    /// Seed state for an import. Follow with `build_read` / `parse_read`.
    pub fn import_state(&self, id: &str) -> Result<R::Model, ApiError> {
        let state = R::import_state(id)?;
        tracing::info!(resource = R::TYPE_NAME, id, "import");
        Ok(state)
    }

    fn build_write(&self, method: HttpMethod, template: &str, plan: &mut R::Model) -> Result<HttpRequest, ApiError> {
        fill_unknown(plan);
        check_required(plan)?;
        let body = to_body(plan)?;
        let params = R::path_params(plan)?;
        tracing::info!(resource = R::TYPE_NAME, path = template, body = ?body, "{} request", method.as_str());
        self.client
            .build_request(method, template, &params, &BTreeMap::new(), Some(&body))
    }
}
