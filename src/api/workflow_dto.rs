use serde::{Deserialize, Serialize};

use crate::domain::GammaParams;

/// Wire shape of a workflow topology file. Nodes
/// reference each other by `id`, not by any internal key — `loader::topology`
/// resolves those references while building the `WorkflowTopology`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTopologyDto {
    pub nodes: Vec<WorkflowNodeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNodeDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub gamma: GammaParams,
    #[serde(default)]
    pub connections: Vec<EdgeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDto {
    pub target: String,
    pub transfer_time: f64,
    #[serde(default)]
    pub gamma: GammaParams,
}
