//! `transaction`: posts a change-set of arbitrary CRs as one transaction.
//!
//! The CR list is a dynamic attribute, so any mix of create, replace, patch
//! and delete operations passes through untouched. The backend answers a
//! create with the new transaction id only; there is nothing to read back.
//! Destroying the resource reverts the transaction. Read and update do not
//! call the backend.

use std::collections::BTreeMap;

use crate::attr::num_to_i64;
use crate::client::EdaClient;
use crate::dynamic::Dynamic;
use crate::encode::to_body;
use crate::error::ApiError;
use crate::fill::fill_unknown;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::model;
use crate::model::check_required;
use crate::value::TriState;

const CREATE_TRANSACTION: &str = "/core/transaction/v2";
const REVERT_TRANSACTION: &str = "/core/transaction/v2/revert/{transactionId}";

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Transaction {
        /// Assigned by the backend on create.
        pub id: TriState<i64> => COMPUTED,
        pub crs: TriState<Dynamic> => REQUIRED,
        pub description: TriState<String> => REQUIRED,
        pub dry_run: TriState<bool> => REQUIRED,
        pub result_type: TriState<String>,
        pub retain: TriState<bool>,
    }
}

#[derive(Debug, Clone)]
pub struct TransactionResource {
    client: EdaClient,
}

impl TransactionResource {
    pub fn new(client: EdaClient) -> Self {
        Self { client }
    }

    pub fn build_create(&self, plan: &mut Transaction) -> Result<HttpRequest, ApiError> {
        fill_unknown(plan);
        check_required(plan)?;
        let body = to_body(plan)?;
        tracing::info!(path = CREATE_TRANSACTION, body = ?body, "create transaction");
        self.client
            .build_request(HttpMethod::Post, CREATE_TRANSACTION, &[], &BTreeMap::new(), Some(&body))
    }

    /// Store the id assigned by the backend into `model.id`.
    pub fn parse_create(&self, response: HttpResponse, model: &mut Transaction) -> Result<(), ApiError> {
        let result = self.client.parse_json(response)?;
        tracing::info!(path = CREATE_TRANSACTION, result = %result, "transaction created");
        let id = result
            .get("id")
            .ok_or_else(|| ApiError::DeserializationError("transaction id missing from result".to_string()))?;
        model.id = TriState::Known(num_to_i64(id)?);
        Ok(())
    }

    pub fn build_delete(&self, state: &Transaction) -> Result<HttpRequest, ApiError> {
        let Some(id) = state.id.as_known() else {
            return Err(ApiError::MissingPathParam {
                name: "transactionId".to_string(),
            });
        };
        tracing::info!(path = REVERT_TRANSACTION, id, "revert transaction");
        self.client.build_request(
            HttpMethod::Post,
            REVERT_TRANSACTION,
            &[("transactionId", id.to_string())],
            &BTreeMap::new(),
            None,
        )
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        let result = self.client.parse_json(response)?;
        tracing::info!(path = REVERT_TRANSACTION, result = %result, "transaction reverted");
        Ok(())
    }

    /// Reads do not call the backend; the stored state is returned as is.
    pub fn read(&self, state: &Transaction) -> Transaction {
        state.clone()
    }

    /// Apply `plan` locally. The backend cannot edit a committed
    /// transaction, so only the stored state changes; `id` is kept.
    pub fn update(&self, plan: &mut Transaction, state: &mut Transaction) -> Result<(), ApiError> {
        fill_unknown(plan);
        check_required(plan)?;
        let id = std::mem::take(&mut state.id);
        *state = plan.clone();
        state.id = id;
        tracing::info!(id = ?state.id, "transaction updated locally");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn resource() -> TransactionResource {
        TransactionResource::new(EdaClient::new("http://localhost:3000"))
    }

    fn crs() -> Value {
        json!([
            {"type": {"create": {"value": {
                "apiVersion": "interfaces.eda.nokia.com/v1alpha1",
                "kind": "Interface",
                "metadata": {"name": "leaf1-e1-1", "namespace": "eda", "labels": {"role": "edge"}},
                "spec": {"enabled": true, "mtu": 9214, "members": [{"node": "leaf1", "interface": "ethernet-1-1"}]}
            }}}},
            {"type": {"delete": {"gvk": {"group": "core.eda.nokia.com", "kind": "Banner", "version": "v1"}, "name": "motd"}}}
        ])
    }

    fn plan() -> Transaction {
        Transaction {
            id: TriState::Unknown,
            crs: TriState::Known(Dynamic::resolve(&crs(), &Default::default()).unwrap()),
            description: TriState::Known("provision leaf1".into()),
            dry_run: TriState::Known(false),
            result_type: TriState::Unknown,
            retain: TriState::Known(true),
        }
    }

    #[test]
    fn create_sends_dynamic_crs_verbatim() {
        let mut plan = plan();
        let req = resource().build_create(&mut plan).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/core/transaction/v2");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"crs": crs(), "description": "provision leaf1", "dry_run": false, "retain": true})
        );
        assert!(plan.id.is_null());
        assert!(plan.result_type.is_null());
    }

    #[test]
    fn create_reads_id_from_float() {
        let mut model = plan();
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"id": 42.0}"#.to_string(),
        };
        resource().parse_create(response, &mut model).unwrap();
        assert_eq!(model.id, TriState::Known(42));
    }

    #[test]
    fn create_without_id_fails() {
        let mut model = plan();
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "{}".to_string(),
        };
        let err = resource().parse_create(response, &mut model).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
        assert!(model.id.is_unknown());
    }

    #[test]
    fn delete_reverts_by_id() {
        let mut state = plan();
        assert!(matches!(
            resource().build_delete(&state),
            Err(ApiError::MissingPathParam { .. })
        ));
        state.id = TriState::Known(42);
        let req = resource().build_delete(&state).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/core/transaction/v2/revert/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn update_is_local_and_keeps_id() {
        let mut state = plan();
        state.id = TriState::Known(42);
        let mut next = plan();
        next.description = TriState::Known("reworded".into());
        resource().update(&mut next, &mut state).unwrap();
        assert_eq!(state.id, TriState::Known(42));
        assert_eq!(state.description, TriState::Known("reworded".into()));
        assert!(state.result_type.is_null());
        assert_eq!(resource().read(&state), state);

        let mut invalid = Transaction::default();
        assert!(resource().update(&mut invalid, &mut state).is_err());
        assert_eq!(state.id, TriState::Known(42));
    }
}
