use serde::{Deserialize, Serialize};

use crate::domain::AssetId;

/// Partial update sent to an asset store. Always carries the whole editable
/// triple, with tags already split and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPatch {
    pub alt: String,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRequest {
    pub id: AssetId,
    pub set: AssetPatch,
}
