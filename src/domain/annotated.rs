use std::collections::HashMap;

use slotmap::SlotMap;

use crate::domain::ids::TaskId;
use crate::domain::topology::{Edge, NodeKey, WorkflowNode, WorkflowTopology};
use crate::error::{Error, Result};

/// Per-node CPM annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpmAnnotation {
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack: f64,
    pub is_on_critical_path: bool,
}

/// One resolved predecessor edge, pre-joined so the forward pass and every
/// EFT call can read `(predecessor, transfer_time)` in O(1) instead of
/// rescanning every node's outgoing edge list.
#[derive(Debug, Clone, Copy)]
pub struct IncomingEdge {
    pub from: NodeKey,
    pub transfer_time: f64,
}

/// The mutable, exclusively-owned working copy of a workflow used by a
/// single scheduling pass. Built once per pass
/// from the shared-read `WorkflowTopology`; the scheduler mutates nothing
/// here except its own bookkeeping (CPM annotations, per-task exec times
/// sampled for this pass).
#[derive(Debug, Clone)]
pub struct AnnotatedDag {
    nodes: SlotMap<NodeKey, WorkflowNode>,
    id_index: HashMap<TaskId, NodeKey>,
    incoming: HashMap<NodeKey, Vec<IncomingEdge>>,
    pub cpm: HashMap<NodeKey, CpmAnnotation>,
}

impl AnnotatedDag {
    pub fn from_topology(topology: &WorkflowTopology) -> Self {
        Self::from_parts(topology.clone().into_parts())
    }

    fn from_parts(parts: (SlotMap<NodeKey, WorkflowNode>, HashMap<TaskId, NodeKey>)) -> Self {
        let (nodes, id_index) = parts;
        let mut incoming: HashMap<NodeKey, Vec<IncomingEdge>> = HashMap::new();
        for (key, node) in nodes.iter() {
            for edge in &node.connections {
                incoming.entry(edge.target).or_default().push(IncomingEdge { from: key, transfer_time: edge.transfer_time });
            }
            incoming.entry(key).or_default();
        }
        Self { nodes, id_index, incoming, cpm: HashMap::new() }
    }

    pub fn key_for(&self, id: &TaskId) -> Option<NodeKey> {
        self.id_index.get(id).copied()
    }

    pub fn node(&self, key: NodeKey) -> &WorkflowNode {
        &self.nodes[key]
    }

    pub fn node_mut(&mut self, key: NodeKey) -> &mut WorkflowNode {
        &mut self.nodes[key]
    }

    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.keys()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn exec_time(&self, key: NodeKey) -> f64 {
        self.nodes[key].execution_time.unwrap_or(0.0)
    }

    pub fn outgoing(&self, key: NodeKey) -> &[Edge] {
        &self.nodes[key].connections
    }

    pub fn incoming(&self, key: NodeKey) -> &[IncomingEdge] {
        self.incoming.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_source(&self, key: NodeKey) -> bool {
        self.incoming(key).is_empty()
    }

    pub fn is_sink(&self, key: NodeKey) -> bool {
        self.outgoing(key).is_empty()
    }

    /// Sets `execution_time` on every node, e.g. from a Monte-Carlo sample
    /// or from the caller-supplied nominal durations for a deterministic
    /// pass.
    pub fn set_exec_time(&mut self, key: NodeKey, value: f64) {
        self.nodes[key].execution_time = Some(value);
    }

    /// Sets `transfer_time` to zero on every edge between two adjacent
    /// critical-path nodes.
    /// Used before computing the theoretical minimum runtime, which
    /// assumes CP co-location is free.
    pub fn zero_cp_edges(&mut self) {
        let cp_targets: std::collections::HashSet<NodeKey> = self.nodes.iter().filter(|(_, n)| n.critical_path).map(|(k, _)| k).collect();
        for (key, node) in self.nodes.iter_mut() {
            if !cp_targets.contains(&key) {
                continue;
            }
            for edge in node.connections.iter_mut() {
                if cp_targets.contains(&edge.target) {
                    edge.transfer_time = 0.0;
                }
            }
        }
        for incoming in self.incoming.values_mut() {
            for edge in incoming.iter_mut() {
                if cp_targets.contains(&edge.from) {
                    edge.transfer_time = 0.0;
                }
            }
        }
    }

    /// DFS-based topological sort with explicit cycle detection.
    pub fn topological_sort(&self) -> Result<Vec<NodeKey>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut mark: HashMap<NodeKey, Mark> = self.nodes.keys().map(|k| (k, Mark::Unvisited)).collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeKey, usize)> = Vec::new();

        for start in self.nodes.keys() {
            if mark[&start] != Mark::Unvisited {
                continue;
            }
            stack.push((start, 0));
            mark.insert(start, Mark::InProgress);

            while let Some(&mut (node, ref mut next_child)) = stack.last_mut() {
                let children = self.outgoing(node);
                if *next_child < children.len() {
                    let child = children[*next_child].target;
                    *next_child += 1;
                    match mark[&child] {
                        Mark::Unvisited => {
                            mark.insert(child, Mark::InProgress);
                            stack.push((child, 0));
                        }
                        Mark::InProgress => {
                            return Err(Error::Cycle(self.node(child).id.to_string()));
                        }
                        Mark::Done => {}
                    }
                } else {
                    mark.insert(node, Mark::Done);
                    order.push(node);
                    stack.pop();
                }
            }
        }

        order.reverse();
        Ok(order)
    }
}
