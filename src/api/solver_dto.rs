use serde::{Deserialize, Serialize};

/// Request body for the coalition-structure solver.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverRequestDto {
    pub num_of_agents: usize,
    pub coalition_values: Vec<f64>,
}

/// Response body on `200`. `partition` holds
/// 1-based agent indices.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResponseDto {
    pub value: f64,
    pub time_ms: f64,
    pub partition: Vec<Vec<usize>>,
}

/// Body carried by non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct SolverErrorDto {
    pub error: String,
    pub details: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
}
