//! Request and response bodies exchanged over the HTTP surface

use serde::{Deserialize, Serialize};

/// Body of `POST /analyze_policy/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAnalysisRequest {
    pub country: String,
    pub policy_text: String,
}

/// Body of `POST /optimize_network/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDesignRequest {
    pub region: String,
    pub terrain_data: String,
    pub existing_infrastructure: Vec<String>,
    pub budget: i64,
}

/// Body of `POST /resource_allocation/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOptimizationRequest {
    pub region: String,
    pub existing_assets: Vec<String>,
    pub user_demand: String,
    pub budget: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Error body returned when the model call fails
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
