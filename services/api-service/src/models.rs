use serde::{Deserialize, Serialize};
use types::ids::RunId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRunResponse {
    pub run_id: RunId,
    pub status: String,
}
