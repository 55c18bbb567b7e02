//! Managed resources.

pub mod cluster_auth_role;
pub mod transaction;

pub use cluster_auth_role::{ClusterAuthRole, ClusterAuthRoleClient, ClusterAuthRoleResource, RoleRule, UrlRule};
pub use transaction::{Transaction, TransactionResource};
