use super::ShardCount;
use serde::{Deserialize, Serialize};

/// Result of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardCount,
}
