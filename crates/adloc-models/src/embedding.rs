//! Embedding scatter models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A profile row reduced to two normalized dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingPoint {
    /// Horizontal position in [0, 1]
    pub x: f64,
    /// Vertical position in [0, 1], 1 is the top
    pub y: f64,
    /// Segment this profile was clustered into
    pub group_id: i64,
    /// Row index of the originating profile
    pub index: u32,
    /// Row preview text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl EmbeddingPoint {
    pub fn new(x: f64, y: f64, group_id: i64, index: u32) -> Self {
        Self {
            x,
            y,
            group_id,
            index,
            summary: None,
        }
    }
}

/// How the service produced the vectors behind the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingSource {
    /// Model-computed text embeddings
    Embeddings,
    /// Cheap hand-built feature vectors
    Heuristic,
    #[serde(other)]
    Unknown,
}

/// Response of the embeddings endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmbeddingsPayload {
    #[serde(default)]
    pub points: Vec<EmbeddingPoint>,

    #[serde(default)]
    pub count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EmbeddingSource>,
}
