use std::collections::HashSet;

use crate::domain::{AnnotatedDag, NodeKey, TaskId};
use crate::error::Result;
use crate::scheduler::Coalition;

use super::bridge::SolverClient;
use super::subset::{build_coalition_values, SubsetValueFormula};

/// Which non-CP task grouping the coalition-structure solver is asked to
/// partition: the whole workflow at once, or one independent call per CP
/// node over just that node's own non-CP dependency chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitioningMode {
    WorkflowWide,
    PerCpNode,
}

/// Drives the coalition-structure solver under `mode` and returns the
/// resulting `Coalition`s, ready to hand to `OdpIpScheduler::new` — the
/// scheduler itself is agnostic to which mode produced them.
pub fn plan_coalitions(dag: &AnnotatedDag, client: &SolverClient, formula: SubsetValueFormula, cp_duration: f64) -> Result<Vec<Coalition>> {
    plan_coalitions_with_mode(dag, client, formula, cp_duration, PartitioningMode::WorkflowWide)
}

/// Same as [`plan_coalitions`] but with an explicit mode.
pub fn plan_coalitions_with_mode(dag: &AnnotatedDag, client: &SolverClient, formula: SubsetValueFormula, cp_duration: f64, mode: PartitioningMode) -> Result<Vec<Coalition>> {
    match mode {
        PartitioningMode::WorkflowWide => {
            let non_cp: Vec<NodeKey> = dag.keys().filter(|&k| !dag.node(k).critical_path).collect();
            solve_group(dag, client, &non_cp, formula, cp_duration)
        }
        PartitioningMode::PerCpNode => {
            let mut coalitions = Vec::new();
            for (_cp_node, chain) in per_cp_node_chains(dag) {
                coalitions.extend(solve_group(dag, client, &chain, formula, cp_duration)?);
            }
            Ok(coalitions)
        }
    }
}

fn solve_group(dag: &AnnotatedDag, client: &SolverClient, nodes: &[NodeKey], formula: SubsetValueFormula, cp_duration: f64) -> Result<Vec<Coalition>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let values = build_coalition_values(dag, nodes, cp_duration, formula)?;
    let agents: Vec<TaskId> = nodes.iter().map(|&n| dag.node(n).id.clone()).collect();
    client.solve(&agents, &values)
}

/// For each CP node in ascending earliest-start order, the non-CP
/// predecessors that feed it directly and have not already been claimed by
/// an earlier (upstream) CP node's chain. A non-CP task feeding two CP
/// stages is grouped with whichever stage it reaches first, so the chains
/// partition the non-CP task set rather than overlapping it.
fn per_cp_node_chains(dag: &AnnotatedDag) -> Vec<(NodeKey, Vec<NodeKey>)> {
    let mut cp_nodes: Vec<NodeKey> = dag.keys().filter(|&k| dag.node(k).critical_path).collect();
    cp_nodes.sort_by(|&a, &b| {
        let ea = dag.cpm.get(&a).map(|c| c.earliest_start).unwrap_or(0.0);
        let eb = dag.cpm.get(&b).map(|c| c.earliest_start).unwrap_or(0.0);
        ea.partial_cmp(&eb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut assigned: HashSet<NodeKey> = HashSet::new();
    cp_nodes
        .into_iter()
        .map(|cp_node| {
            let chain: Vec<NodeKey> =
                dag.incoming(cp_node).iter().map(|inc| inc.from).filter(|&from| !dag.node(from).critical_path && assigned.insert(from)).collect();
            (cp_node, chain)
        })
        .filter(|(_, chain)| !chain.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CpmAnnotation, GammaParams, WorkflowTopology};

    fn with_earliest_start(dag: &mut AnnotatedDag, node: NodeKey, earliest_start: f64) {
        dag.cpm.insert(node, CpmAnnotation { earliest_start, ..Default::default() });
    }

    /// P -> X, Q -> X, Q -> Y, R -> Y, X -> Y, with X and Y on the critical
    /// path and P/Q/R off it.
    fn two_stage_topology() -> (AnnotatedDag, NodeKey, NodeKey, NodeKey, NodeKey, NodeKey) {
        let mut topology = WorkflowTopology::new();
        let gamma = GammaParams::default();
        let p = topology.add_node(TaskId::new("P"), "P", gamma);
        let q = topology.add_node(TaskId::new("Q"), "Q", gamma);
        let r = topology.add_node(TaskId::new("R"), "R", gamma);
        let x = topology.add_node(TaskId::new("X"), "X", gamma);
        let y = topology.add_node(TaskId::new("Y"), "Y", gamma);
        topology.add_edge(p, x, 0.0, gamma).unwrap();
        topology.add_edge(q, x, 0.0, gamma).unwrap();
        topology.add_edge(q, y, 0.0, gamma).unwrap();
        topology.add_edge(r, y, 0.0, gamma).unwrap();
        topology.add_edge(x, y, 0.0, gamma).unwrap();

        let mut dag = AnnotatedDag::from_topology(&topology);
        dag.node_mut(x).critical_path = true;
        dag.node_mut(y).critical_path = true;
        with_earliest_start(&mut dag, x, 0.0);
        with_earliest_start(&mut dag, y, 5.0);
        (dag, p, q, r, x, y)
    }

    #[test]
    fn per_cp_node_chains_assigns_a_shared_predecessor_to_the_earliest_cp_node() {
        let (dag, p, q, r, x, y) = two_stage_topology();
        let chains = per_cp_node_chains(&dag);

        assert_eq!(chains.len(), 2);
        let (first_node, first_chain) = &chains[0];
        let (second_node, second_chain) = &chains[1];
        assert_eq!(*first_node, x);
        assert_eq!(*second_node, y);

        let mut first_sorted = first_chain.clone();
        first_sorted.sort_by_key(|&n| dag.node(n).id.clone());
        assert_eq!(first_sorted, vec![p, q]);
        assert_eq!(second_chain, &vec![r]);
    }

    #[test]
    fn per_cp_node_chains_skips_a_cp_node_with_no_non_cp_predecessors() {
        let mut topology = WorkflowTopology::new();
        let gamma = GammaParams::default();
        let x = topology.add_node(TaskId::new("X"), "X", gamma);
        let y = topology.add_node(TaskId::new("Y"), "Y", gamma);
        topology.add_edge(x, y, 0.0, gamma).unwrap();

        let mut dag = AnnotatedDag::from_topology(&topology);
        dag.node_mut(x).critical_path = true;
        dag.node_mut(y).critical_path = true;

        assert!(per_cp_node_chains(&dag).is_empty());
    }
}
