//! In-memory stand-in for the slice of the EDA API the core crate talks to.
//!
//! Every route keeps its state in one `Store` behind an `RwLock`; nothing is
//! persisted across restarts.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Alarm seeded into every new store so history reads have something to
/// return.
pub const SEEDED_ALARM: &str = "InterfaceDown-leaf1-ethernet-1-1";

/// Catalog and app with a seeded requirements graph.
pub const SEEDED_CATALOG: &str = "eda-catalog-builtin-apps";
pub const SEEDED_APP: &str = "interfaces.eda.nokia.com";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UrlRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RoleRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_rules: Option<Vec<UrlRule>>,
}

impl Role {
    /// Rules without permissions are stored as read-only.
    fn normalize(&mut self) {
        for rule in self.rules.iter_mut().flatten() {
            rule.permissions.get_or_insert_with(|| "read".to_string());
        }
        for rule in self.url_rules.iter_mut().flatten() {
            rule.permissions.get_or_insert_with(|| "read".to_string());
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateTransaction {
    pub crs: Value,
    pub description: String,
    pub dry_run: bool,
    #[serde(default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub retain: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct TransactionRecord {
    pub id: u64,
    pub crs: Vec<Value>,
    pub description: String,
    pub dry_run: bool,
    pub reverts: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_login: Option<String>,
    pub failed_login_since_successful_login: i64,
    pub temporarily_locked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub uuid: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub enabled: bool,
    pub max_sessions: i64,
    pub groups: Vec<String>,
    pub status: UserStatus,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub max_sessions: i64,
    #[serde(default)]
    pub groups: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct NamespaceQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub roles: BTreeMap<String, Role>,
    pub transactions: BTreeMap<u64, TransactionRecord>,
    pub users: HashMap<Uuid, User>,
    pub alarms: BTreeMap<String, Vec<Value>>,
    pub namespaces: Vec<Namespace>,
    pub requirements: BTreeMap<(String, String), Value>,
    next_transaction: u64,
}

impl Store {
    pub fn seeded() -> Self {
        let mut store = Store {
            next_transaction: 1,
            ..Default::default()
        };
        store.namespaces = vec![
            Namespace {
                name: "eda".to_string(),
                description: Some("default namespace".to_string()),
            },
            Namespace {
                name: "eda-system".to_string(),
                description: None,
            },
            Namespace {
                name: "lab".to_string(),
                description: Some("lab fabric".to_string()),
            },
        ];
        store.alarms.insert(
            SEEDED_ALARM.to_string(),
            vec![
                json!({
                    "name": "InterfaceDown",
                    "severity": "major",
                    "probable_cause": "operational state is down",
                    "cleared": false,
                    "acknowledged": false,
                    "occurrences": 1,
                    "last_changed": "2024-05-01T10:00:00Z"
                }),
                json!({
                    "name": "InterfaceDown",
                    "severity": "major",
                    "probable_cause": "operational state is down",
                    "cleared": true,
                    "acknowledged": true,
                    "occurrences": 1,
                    "last_changed": "2024-05-01T10:05:00Z"
                }),
            ],
        );
        store.requirements.insert(
            (SEEDED_CATALOG.to_string(), SEEDED_APP.to_string()),
            json!({
                "nodes": [
                    {"app_id": SEEDED_APP, "catalog": SEEDED_CATALOG, "version": "v2.0.0", "installed": false},
                    {"app_id": "aaa.eda.nokia.com", "catalog": SEEDED_CATALOG, "version": "v1.1.0", "installed": true}
                ],
                "edges": [
                    {"from": SEEDED_APP, "to": "aaa.eda.nokia.com", "constraint": ">=v1.0.0"}
                ]
            }),
        );
        store
    }

    fn record_transaction(&mut self, crs: Vec<Value>, description: String, dry_run: bool, reverts: Option<u64>) -> u64 {
        let id = self.next_transaction;
        self.next_transaction += 1;
        self.transactions.insert(
            id,
            TransactionRecord {
                id,
                crs,
                description,
                dry_run,
                reverts,
            },
        );
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/core/admin/roles", post(create_role))
        .route(
            "/core/admin/roles/{name}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .route("/core/admin/users", post(create_user))
        .route("/core/admin/users/{uuid}", get(get_user))
        .route("/core/access/v1/namespaces", get(list_namespaces))
        .route("/core/alarm/v2/alarms/{alarmname}/history", get(alarm_history))
        .route(
            "/core/store/v1/requirementsgraph/catalog/{catalog}/app/{app_id}",
            get(requirements_graph),
        )
        .route("/core/transaction/v2", post(create_transaction))
        .route("/core/transaction/v2/revert/{transaction_id}", post(revert_transaction))
        .route(
            "/core/transaction/v2/result/execution/{transaction_id}",
            get(execution_result),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_role(
    State(db): State<Db>,
    Json(mut role): Json<Role>,
) -> Result<(StatusCode, Json<Role>), StatusCode> {
    let mut store = db.write().await;
    if store.roles.contains_key(&role.name) {
        return Err(StatusCode::CONFLICT);
    }
    role.normalize();
    tracing::info!(name = %role.name, "role created");
    store.roles.insert(role.name.clone(), role.clone());
    Ok((StatusCode::CREATED, Json(role)))
}

async fn get_role(State(db): State<Db>, Path(name): Path<String>) -> Result<Json<Role>, StatusCode> {
    let store = db.read().await;
    store.roles.get(&name).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_role(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(mut role): Json<Role>,
) -> Result<Json<Role>, StatusCode> {
    let mut store = db.write().await;
    let stored = store.roles.get_mut(&name).ok_or(StatusCode::NOT_FOUND)?;
    role.name = name;
    role.normalize();
    tracing::info!(name = %role.name, "role replaced");
    *stored = role.clone();
    Ok(Json(role))
}

async fn delete_role(State(db): State<Db>, Path(name): Path<String>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .roles
        .remove(&name)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> (StatusCode, Json<User>) {
    let user = User {
        uuid: Uuid::new_v4(),
        username: input.username,
        firstname: input.firstname,
        lastname: input.lastname,
        email: input.email,
        enabled: input.enabled,
        max_sessions: input.max_sessions,
        groups: input.groups,
        status: UserStatus {
            last_successful_login: None,
            failed_login_since_successful_login: 0,
            temporarily_locked: false,
        },
    };
    tracing::info!(uuid = %user.uuid, username = %user.username, "user created");
    db.write().await.users.insert(user.uuid, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(uuid): Path<Uuid>) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    store.users.get(&uuid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn list_namespaces(State(db): State<Db>, Query(query): Query<NamespaceQuery>) -> Json<Value> {
    let store = db.read().await;
    let namespaces: Vec<&Namespace> = store
        .namespaces
        .iter()
        .filter(|ns| query.filter.as_deref().map_or(true, |f| ns.name.contains(f)))
        .collect();
    let mut body = json!({ "namespaces": namespaces });
    if let Some(filter) = query.filter {
        body["filter"] = Value::String(filter);
    }
    Json(body)
}

async fn alarm_history(State(db): State<Db>, Path(alarm): Path<String>) -> Result<Json<Vec<Value>>, StatusCode> {
    let store = db.read().await;
    store.alarms.get(&alarm).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn requirements_graph(
    State(db): State<Db>,
    Path((catalog, app)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    store
        .requirements
        .get(&(catalog, app))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_transaction(
    State(db): State<Db>,
    Json(input): Json<CreateTransaction>,
) -> Result<Json<Value>, StatusCode> {
    let Value::Array(crs) = input.crs else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut store = db.write().await;
    let id = store.record_transaction(crs, input.description, input.dry_run, None);
    tracing::info!(id, retain = ?input.retain, result_type = ?input.result_type, "transaction created");
    Ok(Json(json!({ "id": id })))
}

async fn revert_transaction(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let original = store.transactions.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    let revert = store.record_transaction(
        original.crs,
        format!("revert of transaction {id}"),
        original.dry_run,
        Some(id),
    );
    tracing::info!(id, revert, "transaction reverted");
    Ok(Json(json!({ "id": revert })))
}

async fn execution_result(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let record = store.transactions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let intents_run: Vec<Value> = record
        .crs
        .iter()
        .enumerate()
        .map(|(i, cr)| {
            json!({
                "intent_name": format!("intent-{}", i + 1),
                "duration": 0.25,
                "errors": [],
                "output": cr,
            })
        })
        .collect();
    Ok(Json(json!({
        "transaction_id": id.to_string(),
        "execution_summary": format!("intents-run: {}, dry-run: {}", intents_run.len(), record.dry_run),
        "description": record.description,
        "reverts": record.reverts,
        "intents_run": intents_run,
        "changed_crs": record.crs,
    })))
}
