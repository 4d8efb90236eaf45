use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /recommend`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub query: String,
}

/// Reply from `POST /recommend`.
///
/// `recommendation` is either an object of title → details or any other JSON
/// value to show as text. A missing field decodes as `null`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RecommendResponse {
    #[serde(default)]
    pub recommendation: Value,
}
