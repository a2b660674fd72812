use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::domain::gamma::GammaParams;
use crate::domain::ids::TaskId;
use crate::error::{Error, Result};

slotmap::new_key_type! {
    /// Internal dense key for a workflow node, stable for the lifetime of
    /// the `WorkflowTopology`/`AnnotatedDag` that created it. Never exposed
    /// across a JSON boundary — callers address nodes by `TaskId`.
    pub struct NodeKey;
}

/// One outgoing edge of a `WorkflowNode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub transfer_time: f64,
    pub gamma: GammaParams,
}

/// One task in the workflow graph. `execution_time` is `None` in a bare
/// topology template and filled in by the Monte-Carlo runner (or by a
/// caller driving a single deterministic pass) before scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: TaskId,
    pub name: String,
    pub execution_time: Option<f64>,
    pub level: u32,
    pub critical_path: bool,
    pub gamma: GammaParams,
    pub connections: Vec<Edge>,
}

impl WorkflowNode {
    pub fn new(id: TaskId, name: impl Into<String>, gamma: GammaParams) -> Self {
        Self { id, name: name.into(), execution_time: None, level: 0, critical_path: false, gamma, connections: Vec::new() }
    }
}

/// The shared-read topology of a workflow: created once at load time and
/// never mutated by the core afterwards. Each
/// scheduling pass works on its own `AnnotatedDag` copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowTopology {
    nodes: SlotMap<NodeKey, WorkflowNode>,
    id_index: HashMap<TaskId, NodeKey>,
}

impl WorkflowTopology {
    pub fn new() -> Self {
        Self { nodes: SlotMap::with_key(), id_index: HashMap::new() }
    }

    pub fn add_node(&mut self, id: TaskId, name: impl Into<String>, gamma: GammaParams) -> NodeKey {
        let key = self.nodes.insert(WorkflowNode::new(id.clone(), name, gamma));
        self.id_index.insert(id, key);
        key
    }

    /// Adds an outgoing edge `source -> target`. Rejects negative transfer
    /// times and multi-edges.
    pub fn add_edge(&mut self, source: NodeKey, target: NodeKey, transfer_time: f64, gamma: GammaParams) -> Result<()> {
        if transfer_time < 0.0 {
            let name = self.nodes.get(source).map(|n| n.name.clone()).unwrap_or_default();
            return Err(Error::InvalidDuration(name));
        }
        let already_connected = self.nodes.get(source).is_some_and(|n| n.connections.iter().any(|e| e.target == target));
        if already_connected {
            let source_name = self.nodes[source].id.clone();
            let target_name = self.nodes[target].id.clone();
            return Err(Error::DuplicateEdge(source_name.to_string(), target_name.to_string()));
        }
        let node = self.nodes.get_mut(source).expect("source key belongs to this topology");
        node.connections.push(Edge { source, target, transfer_time, gamma });
        Ok(())
    }

    pub fn node(&self, key: NodeKey) -> Option<&WorkflowNode> {
        self.nodes.get(key)
    }

    pub fn key_for(&self, id: &TaskId) -> Option<NodeKey> {
        self.id_index.get(id).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &WorkflowNode)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn into_parts(self) -> (SlotMap<NodeKey, WorkflowNode>, HashMap<TaskId, NodeKey>) {
        (self.nodes, self.id_index)
    }
}
