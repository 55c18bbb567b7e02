//! `auth_user`: a single local user account, looked up by uuid.

use uuid::Uuid;

use crate::client::path_param;
use crate::data_source::{DataSource, DataSourceClient};
use crate::error::ApiError;
use crate::model;
use crate::value::TriState;

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct UserStatus {
        pub last_successful_login: TriState<String>,
        pub last_failed_login: TriState<String>,
        pub failed_login_since_successful_login: TriState<i64>,
        pub temporarily_locked: TriState<bool>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct AuthUser {
        pub uuid: TriState<String> => REQUIRED,
        pub username: TriState<String>,
        pub firstname: TriState<String>,
        pub lastname: TriState<String>,
        pub email: TriState<String>,
        pub enabled: TriState<bool>,
        pub max_sessions: TriState<i64>,
        pub groups: TriState<Vec<String>>,
        pub status: TriState<UserStatus>,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AuthUserDataSource;

impl DataSource for AuthUserDataSource {
    type Model = AuthUser;

    const TYPE_NAME: &'static str = "auth_user";
    const READ_PATH: &'static str = "/core/admin/users/{uuid}";

    fn path_params(config: &AuthUser) -> Result<Vec<(&'static str, String)>, ApiError> {
        let (name, value) = path_param("uuid", &config.uuid)?;
        let uuid = Uuid::parse_str(&value).map_err(|e| ApiError::InvalidPathParam {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(vec![(name, uuid.hyphenated().to_string())])
    }
}

pub type AuthUserClient = DataSourceClient<AuthUserDataSource>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EdaClient;
    use crate::http::HttpResponse;

    fn client() -> AuthUserClient {
        DataSourceClient::new(EdaClient::new("http://localhost:3000"))
    }

    fn config(uuid: &str) -> AuthUser {
        AuthUser {
            uuid: TriState::Known(uuid.into()),
            ..Default::default()
        }
    }

    #[test]
    fn uuid_is_validated_and_normalised() {
        let req = client()
            .build_read(&config("6F1A2B3C-0000-4000-8000-00000000ABCD"))
            .unwrap();
        assert!(req
            .path
            .starts_with("http://localhost:3000/core/admin/users/6f1a2b3c-0000-4000-8000-00000000abcd"));

        let err = client().build_read(&config("not-a-uuid")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidPathParam { .. }));
    }

    #[test]
    fn decodes_nested_status() {
        let mut model = config("6f1a2b3c-0000-4000-8000-00000000abcd");
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"uuid":"6f1a2b3c-0000-4000-8000-00000000abcd","username":"admin","enabled":true,
                     "max_sessions":5.0,"groups":["admins"],
                     "status":{"failed_login_since_successful_login":0,"temporarily_locked":false}}"#
                .to_string(),
        };
        client().parse_read(response, &mut model).unwrap();
        assert_eq!(model.max_sessions, TriState::Known(5));
        let status = model.status.as_known().unwrap();
        assert_eq!(status.temporarily_locked, TriState::Known(false));
        assert!(status.last_successful_login.is_null());
    }
}
