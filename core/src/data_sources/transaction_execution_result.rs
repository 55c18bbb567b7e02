//! `transaction_execution_result`: what a transaction did when it ran.

use crate::client::path_param;
use crate::data_source::{DataSource, DataSourceClient};
use crate::dynamic::Dynamic;
use crate::error::ApiError;
use crate::model;
use crate::value::TriState;

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct IntentRun {
        pub intent_name: TriState<String>,
        pub duration: TriState<f64>,
        pub errors: TriState<Vec<String>>,
        /// Script output; its shape depends on the intent.
        pub output: TriState<Dynamic>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct TransactionExecutionResult {
        pub transaction_id: TriState<String> => REQUIRED,
        pub wait_for_complete: TriState<bool>,
        pub execution_summary: TriState<String>,
        pub intents_run: TriState<Vec<IntentRun>>,
        pub changed_crs: TriState<Dynamic>,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TransactionExecutionResultDataSource;

impl DataSource for TransactionExecutionResultDataSource {
    type Model = TransactionExecutionResult;

    const TYPE_NAME: &'static str = "transaction_execution_result";
    const READ_PATH: &'static str = "/core/transaction/v2/result/execution/{transactionId}";

    fn path_params(config: &TransactionExecutionResult) -> Result<Vec<(&'static str, String)>, ApiError> {
        Ok(vec![path_param("transactionId", &config.transaction_id)?])
    }
}

pub type TransactionExecutionResultClient = DataSourceClient<TransactionExecutionResultDataSource>;
