use std::collections::BTreeSet;

use super::null_as_default;
use super::statistics::Statistics;
use super::timestamp::Timestamp;

pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_PASSED: &str = "PASSED";
pub const STATUS_FAILED: &str = "FAILED";
pub const STATUS_STOPPED: &str = "STOPPED";
pub const STATUS_INTERRUPTED: &str = "INTERRUPTED";

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchMode {
    #[default]
    Default,
    Debug,
}

/// Test run record returned by `GET /api/v1/{project}/launch`
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Launch {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_time: Timestamp,
    /// Zero instant while the launch is still running
    #[serde(deserialize_with = "null_as_default")]
    pub end_time: Timestamp,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub mode: LaunchMode,
    #[serde(rename = "approximateDuration", deserialize_with = "null_as_default")]
    pub approximate_duration: f32,
    #[serde(rename = "hasRetries", deserialize_with = "null_as_default")]
    pub has_retries: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

impl Launch {
    #[cfg(test)]
    pub fn new_test(id: &str, name: &str, status: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }
}
