//! `cluster_auth_role`: cluster-wide roles granting access to resources and
//! API URLs.

use std::collections::BTreeMap;

use crate::client::path_param;
use crate::error::ApiError;
use crate::model;
use crate::resource::{Resource, ResourceClient};
use crate::value::TriState;

model! {
    /// One resource permission of a role.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct RoleRule {
        pub api_groups: TriState<Vec<String>>,
        pub resources: TriState<Vec<String>>,
        pub permissions: TriState<String>,
    }
}

model! {
    /// One URL permission of a role.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct UrlRule {
        pub path: TriState<String>,
        pub permissions: TriState<String>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct ClusterAuthRole {
        pub name: TriState<String> => REQUIRED,
        /// Sent as null when cleared so an update removes the old text.
        pub description: TriState<String> => SEND_NULL,
        pub labels: TriState<BTreeMap<String, String>>,
        pub annotations: TriState<BTreeMap<String, String>>,
        pub rules: TriState<Vec<RoleRule>>,
        pub url_rules: TriState<Vec<UrlRule>>,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterAuthRoleResource;

impl Resource for ClusterAuthRoleResource {
    type Model = ClusterAuthRole;

    const TYPE_NAME: &'static str = "cluster_auth_role";
    const CREATE_PATH: &'static str = "/core/admin/roles";
    const READ_PATH: &'static str = "/core/admin/roles/{name}";
    const UPDATE_PATH: &'static str = "/core/admin/roles/{name}";
    const DELETE_PATH: &'static str = "/core/admin/roles/{name}";

    fn path_params(model: &ClusterAuthRole) -> Result<Vec<(&'static str, String)>, ApiError> {
        Ok(vec![path_param("name", &model.name)?])
    }

    /// The id is `<name>` or `<name>/<anything>`; only the first segment is used.
    fn import_state(id: &str) -> Result<ClusterAuthRole, ApiError> {
        let name = id.split('/').next().unwrap_or_default();
        if name.is_empty() {
            return Err(ApiError::InvalidImportId {
                id: id.to_string(),
                reason: "expected <name>".to_string(),
            });
        }
        Ok(ClusterAuthRole {
            name: TriState::Known(name.to_string()),
            ..Default::default()
        })
    }
}

pub type ClusterAuthRoleClient = ResourceClient<ClusterAuthRoleResource>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EdaClient;
    use crate::error::ConvertError;
    use crate::http::{HttpMethod, HttpResponse};
    use serde_json::{json, Value};

    fn client() -> ClusterAuthRoleClient {
        ResourceClient::new(EdaClient::new("http://localhost:3000"))
    }

    fn response(status: u16, body: Value) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn plan() -> ClusterAuthRole {
        ClusterAuthRole {
            name: TriState::Known("net-admin".into()),
            description: TriState::Unknown,
            labels: TriState::Unknown,
            annotations: TriState::Null,
            rules: TriState::Known(vec![RoleRule {
                api_groups: TriState::Known(vec!["interfaces.eda.nokia.com".into()]),
                resources: TriState::Known(vec!["*".into()]),
                permissions: TriState::Unknown,
            }]),
            url_rules: TriState::Known(Vec::new()),
        }
    }

    #[test]
    fn create_fills_and_encodes() {
        let mut plan = plan();
        let req = client().build_create(&mut plan).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/core/admin/roles");
        assert!(plan.description.is_null());
        assert!(plan.labels.is_null());

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "net-admin",
                "description": null,
                "rules": [{"api_groups": ["interfaces.eda.nokia.com"], "resources": ["*"]}],
                "url_rules": []
            })
        );
    }

    #[test]
    fn create_requires_name() {
        let mut plan = ClusterAuthRole::default();
        let err = client().build_create(&mut plan).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Convert(ConvertError::MissingRequiredField { ref path }) if path == "name"
        ));
    }

    #[test]
    fn update_targets_named_role() {
        let mut plan = plan();
        let req = client().build_update(&mut plan).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/core/admin/roles/net-admin");
    }

    #[test]
    fn read_decodes_backend_state() {
        let state = plan();
        let req = client().build_read(&state).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());

        let mut model = state;
        let body = json!({
            "name": "net-admin",
            "description": "network operators",
            "labels": {"team": "noc"},
            "rules": [{"api_groups": ["*"], "resources": ["interfaces"], "permissions": "readWrite"}],
            "url_rules": [{"path": "/core/transaction/v2", "permissions": "read"}],
            "status": {"observed": 3}
        });
        client().parse_read(response(200, body), &mut model).unwrap();
        assert_eq!(model.description, TriState::Known("network operators".into()));
        assert!(model.annotations.is_null());
        let rules = model.rules.as_known().unwrap();
        assert_eq!(rules[0].permissions, TriState::Known("readWrite".into()));
        let url_rules = model.url_rules.as_known().unwrap();
        assert_eq!(url_rules[0].path, TriState::Known("/core/transaction/v2".into()));
    }

    #[test]
    fn read_without_name_is_rejected_and_state_kept() {
        let mut model = plan();
        let before = model.clone();
        let err = client()
            .parse_read(response(200, json!({"description": "orphan"})), &mut model)
            .unwrap_err();
        assert!(matches!(err, ApiError::Convert(ConvertError::MissingRequiredField { .. })));
        assert_eq!(model, before);
    }

    #[test]
    fn read_not_found() {
        let mut model = plan();
        let err = client()
            .parse_read(response(404, Value::Null), &mut model)
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn import_takes_name_from_first_segment() {
        let state = client().import_state("net-admin/ignored").unwrap();
        assert_eq!(state.name, TriState::Known("net-admin".into()));
        assert!(state.rules.is_null());

        let req = client().build_read(&state).unwrap();
        assert_eq!(req.path, "http://localhost:3000/core/admin/roles/net-admin");

        assert_eq!(
            client().import_state("viewer").unwrap().name,
            TriState::Known("viewer".into())
        );
        assert!(matches!(
            client().import_state("/net-admin"),
            Err(ApiError::InvalidImportId { .. })
        ));
        assert!(client().import_state("").is_err());
    }

    #[test]
    fn delete_needs_known_name() {
        let state = ClusterAuthRole {
            name: TriState::Unknown,
            ..Default::default()
        };
        let err = client().build_delete(&state).unwrap_err();
        assert!(matches!(err, ApiError::MissingPathParam { .. }));
        let req = client().build_delete(&plan()).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(client().parse_delete(response(204, Value::Null)).is_ok());
    }
}
