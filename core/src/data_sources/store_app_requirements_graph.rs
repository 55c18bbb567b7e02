//! `store_app_requirements_graph`: what an app from a catalog needs
//! installed before it can be installed itself.

use crate::client::path_param;
use crate::data_source::{DataSource, DataSourceClient};
use crate::error::ApiError;
use crate::model;
use crate::value::TriState;

model! {
    /// One app in the graph.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct AppNode {
        pub app_id: TriState<String>,
        pub catalog: TriState<String>,
        pub version: TriState<String>,
        pub installed: TriState<bool>,
    }
}

model! {
    /// `from` requires `to` at a version matching `constraint`.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct AppEdge {
        pub from: TriState<String>,
        pub to: TriState<String>,
        pub constraint: TriState<String>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct StoreAppRequirementsGraph {
        pub catalog: TriState<String> => REQUIRED,
        pub app_id: TriState<String> => REQUIRED,
        /// Version to resolve; the backend picks the latest when unset.
        pub version: TriState<String>,
        pub nodes: TriState<Vec<AppNode>>,
        pub edges: TriState<Vec<AppEdge>>,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StoreAppRequirementsGraphDataSource;

impl DataSource for StoreAppRequirementsGraphDataSource {
    type Model = StoreAppRequirementsGraph;

    const TYPE_NAME: &'static str = "store_app_requirements_graph";
    const READ_PATH: &'static str = "/core/store/v1/requirementsgraph/catalog/{catalog}/app/{appId}";

    fn path_params(config: &StoreAppRequirementsGraph) -> Result<Vec<(&'static str, String)>, ApiError> {
        Ok(vec![
            path_param("catalog", &config.catalog)?,
            path_param("appId", &config.app_id)?,
        ])
    }
}

pub type StoreAppRequirementsGraphClient = DataSourceClient<StoreAppRequirementsGraphDataSource>;
