//! Worker service wire types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /process`
///
/// Callers are loose about `order_id`: any JSON value is accepted and kept
/// as text. Missing or `null` means `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequest {
    #[serde(default = "unknown_order", deserialize_with = "order_id_as_text")]
    pub order_id: String,
}

fn unknown_order() -> String {
    "unknown".to_string()
}

fn order_id_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => unknown_order(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Success,
    Failed,
}

/// Response of `POST /process`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerOutcome {
    pub status: WorkerStatus,
    pub order_id: String,
}
