use serde::{Deserialize, Serialize};

use crate::model::{EntityType, SearchResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteSearchRequest {
    pub query: String,
    pub types: Vec<EntityType>,
}

pub type RemoteSearchResponse = Vec<SearchResult>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchReport {
    pub query: String,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
