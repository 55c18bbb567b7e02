//! `cluster_alarm_history`: state changes of one alarm.
//!
//! The endpoint returns a bare JSON array, which is stored under the
//! `cluster_alarm_history` attribute.

use serde_json::{Map, Value};

use crate::client::path_param;
use crate::data_source::{DataSource, DataSourceClient};
use crate::error::ApiError;
use crate::model;
use crate::value::TriState;

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct AlarmRecord {
        pub name: TriState<String>,
        pub severity: TriState<String>,
        pub probable_cause: TriState<String>,
        pub cleared: TriState<bool>,
        pub acknowledged: TriState<bool>,
        pub occurrences: TriState<i64>,
        pub last_changed: TriState<String>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct ClusterAlarmHistory {
        pub alarmname: TriState<String> => REQUIRED,
        pub cluster_alarm_history: TriState<Vec<AlarmRecord>>,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterAlarmHistoryDataSource;

impl DataSource for ClusterAlarmHistoryDataSource {
    type Model = ClusterAlarmHistory;

    const TYPE_NAME: &'static str = "cluster_alarm_history";
    const READ_PATH: &'static str = "/core/alarm/v2/alarms/{alarmname}/history";

    fn path_params(config: &ClusterAlarmHistory) -> Result<Vec<(&'static str, String)>, ApiError> {
        Ok(vec![path_param("alarmname", &config.alarmname)?])
    }

    fn wrap_response(result: Value) -> Value {
        let mut wrapped = Map::new();
        wrapped.insert("cluster_alarm_history".to_string(), result);
        Value::Object(wrapped)
    }
}

pub type ClusterAlarmHistoryClient = DataSourceClient<ClusterAlarmHistoryDataSource>;
