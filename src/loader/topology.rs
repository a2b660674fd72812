use crate::api::workflow_dto::WorkflowTopologyDto;
use crate::domain::{TaskId, WorkflowTopology};
use crate::error::{Error, Result};

use super::parser::parse_json_file;

/// Loads a topology JSON file and converts it into a `WorkflowTopology`,
/// resolving each edge's `target` string into the internal `NodeKey` and
/// validating edge invariants at the boundary rather than deferring to `WorkflowTopology::add_edge`'s own
/// checks alone.
pub fn load_topology(file_path: &str) -> Result<WorkflowTopology> {
    let dto: WorkflowTopologyDto = parse_json_file(file_path)?;
    topology_from_dto(dto)
}

/// The in-memory counterpart of [`load_topology`], for callers who already
/// have a deserialized DTO (tests, or a caller embedding JSON inline).
pub fn topology_from_dto(dto: WorkflowTopologyDto) -> Result<WorkflowTopology> {
    let mut topology = WorkflowTopology::new();

    for node in &dto.nodes {
        topology.add_node(TaskId::new(node.id.clone()), node.name.clone(), node.gamma);
    }

    for node in &dto.nodes {
        let source = topology.key_for(&TaskId::new(node.id.clone())).expect("node was just inserted");
        for edge in &node.connections {
            let target_id = TaskId::new(edge.target.clone());
            let target = topology.key_for(&target_id).ok_or_else(|| Error::UnknownNodeReference(edge.target.clone()))?;
            topology.add_edge(source, target, edge.transfer_time, edge.gamma)?;
        }
    }

    Ok(topology)
}
