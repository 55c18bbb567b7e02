//! `namespace_get_response`: lists the namespaces visible to the caller.

use crate::data_source::{DataSource, DataSourceClient};
use crate::model;
use crate::value::TriState;

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Namespace {
        pub name: TriState<String>,
        pub description: TriState<String>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct NamespaceGetResponse {
        /// Sent as a query parameter when set.
        pub filter: TriState<String>,
        pub all_namespaces: TriState<bool>,
        pub namespaces: TriState<Vec<Namespace>>,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NamespaceGetResponseDataSource;

impl DataSource for NamespaceGetResponseDataSource {
    type Model = NamespaceGetResponse;

    const TYPE_NAME: &'static str = "namespace_get_response";
    const READ_PATH: &'static str = "/core/access/v1/namespaces";
}

pub type NamespaceGetResponseClient = DataSourceClient<NamespaceGetResponseDataSource>;
