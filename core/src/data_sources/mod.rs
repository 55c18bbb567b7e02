//! Read-only data sources.

pub mod auth_user;
pub mod cluster_alarm_history;
pub mod namespace_get_response;
pub mod store_app_requirements_graph;
pub mod transaction_execution_result;

pub use auth_user::{AuthUser, AuthUserClient, AuthUserDataSource, UserStatus};
pub use cluster_alarm_history::{
    AlarmRecord, ClusterAlarmHistory, ClusterAlarmHistoryClient, ClusterAlarmHistoryDataSource,
};
pub use namespace_get_response::{
    Namespace, NamespaceGetResponse, NamespaceGetResponseClient, NamespaceGetResponseDataSource,
};
pub use store_app_requirements_graph::{
    AppEdge, AppNode, StoreAppRequirementsGraph, StoreAppRequirementsGraphClient,
    StoreAppRequirementsGraphDataSource,
};
pub use transaction_execution_result::{
    IntentRun, TransactionExecutionResult, TransactionExecutionResultClient, TransactionExecutionResultDataSource,
};
