use std::collections::{HashMap, HashSet};

use crate::domain::annotated::CpmAnnotation;
use crate::domain::{AnnotatedDag, NodeKey};
use crate::error::Result;

/// Tolerance used to classify a node's slack as zero.
pub const SLACK_EPSILON: f64 = 1e-3;

/// Result of a critical-path analysis pass: the canonical ordered path and
/// the DAG's total duration.
#[derive(Debug, Clone)]
pub struct CpmOutcome {
    pub critical_path: Vec<NodeKey>,
    pub total_duration: f64,
}

/// Runs forward pass, backward pass, slack/CP classification, level
/// assignment, and canonical critical-path extraction over `dag`, writing
/// the per-node `CpmAnnotation`s into `dag.cpm` and setting
/// `WorkflowNode::level` / `WorkflowNode::critical_path` as a side effect.
///
/// Returns an empty outcome for an empty DAG. Returns `Error::Cycle` if the
/// graph is not acyclic.
pub fn analyze(dag: &mut AnnotatedDag, include_transfer_times: bool) -> Result<CpmOutcome> {
    if dag.is_empty() {
        return Ok(CpmOutcome { critical_path: Vec::new(), total_duration: 0.0 });
    }

    let topo = dag.topological_sort()?;

    for &node in &topo {
        let level = dag.incoming(node).iter().map(|inc| dag.node(inc.from).level + 1).max().unwrap_or(0);
        dag.node_mut(node).level = level;
    }

    let mut es: HashMap<NodeKey, f64> = HashMap::with_capacity(topo.len());
    let mut ef: HashMap<NodeKey, f64> = HashMap::with_capacity(topo.len());
    for &node in &topo {
        let start = dag
            .incoming(node)
            .iter()
            .map(|inc| ef[&inc.from] + if include_transfer_times { inc.transfer_time } else { 0.0 })
            .fold(0.0_f64, f64::max);
        es.insert(node, start);
        ef.insert(node, start + dag.exec_time(node));
    }

    let total_duration = ef.values().copied().fold(0.0_f64, f64::max);

    let mut ls: HashMap<NodeKey, f64> = HashMap::with_capacity(topo.len());
    let mut lf: HashMap<NodeKey, f64> = HashMap::with_capacity(topo.len());
    for &node in topo.iter().rev() {
        let lf_n = if dag.is_sink(node) {
            ef[&node]
        } else {
            dag.outgoing(node)
                .iter()
                .map(|edge| ls[&edge.target] - if include_transfer_times { edge.transfer_time } else { 0.0 })
                .fold(f64::INFINITY, f64::min)
        };
        lf.insert(node, lf_n);
        ls.insert(node, lf_n - dag.exec_time(node));
    }

    for &node in &topo {
        let slack = ls[&node] - es[&node];
        let is_on_critical_path = slack.abs() < SLACK_EPSILON;
        dag.cpm.insert(
            node,
            CpmAnnotation {
                earliest_start: es[&node],
                earliest_finish: ef[&node],
                latest_start: ls[&node],
                latest_finish: lf[&node],
                slack,
                is_on_critical_path,
            },
        );
        dag.node_mut(node).critical_path = is_on_critical_path;
    }

    let critical_path = extract_canonical_path(dag, &topo);

    let on_path: HashSet<NodeKey> = critical_path.iter().copied().collect();
    for &node in &topo {
        if dag.cpm[&node].is_on_critical_path && !on_path.contains(&node) {
            dag.cpm.get_mut(&node).expect("node has a CPM annotation").is_on_critical_path = false;
            dag.node_mut(node).critical_path = false;
        }
    }

    Ok(CpmOutcome { critical_path, total_duration })
}

/// Walks from a zero-slack source forward, preferring at each step a
/// zero-slack successor exactly one level below, falling back to any
/// zero-slack successor, until reaching a sink.
fn extract_canonical_path(dag: &AnnotatedDag, topo: &[NodeKey]) -> Vec<NodeKey> {
    let start = topo.iter().copied().find(|&n| dag.cpm[&n].is_on_critical_path && dag.cpm[&n].earliest_start.abs() < SLACK_EPSILON);

    let Some(start) = start else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut current = start;
    loop {
        let current_level = dag.node(current).level;
        let preferred = dag
            .outgoing(current)
            .iter()
            .map(|e| e.target)
            .find(|&t| dag.cpm[&t].is_on_critical_path && dag.node(t).level == current_level + 1);
        let next = preferred.or_else(|| dag.outgoing(current).iter().map(|e| e.target).find(|&t| dag.cpm[&t].is_on_critical_path));

        match next {
            Some(next) => {
                path.push(next);
                current = next;
            }
            None => break,
        }
    }
    path
}

/// Recomputes total duration only (no annotation bookkeeping, no path
/// extraction) — used to compute the theoretical minimum runtime after
/// `AnnotatedDag::zero_cp_edges` has been applied to a clone.
pub fn total_duration(dag: &AnnotatedDag, include_transfer_times: bool) -> Result<f64> {
    if dag.is_empty() {
        return Ok(0.0);
    }
    let topo = dag.topological_sort()?;
    let mut ef: HashMap<NodeKey, f64> = HashMap::with_capacity(topo.len());
    let mut total = 0.0_f64;
    for &node in &topo {
        let start = dag
            .incoming(node)
            .iter()
            .map(|inc| ef[&inc.from] + if include_transfer_times { inc.transfer_time } else { 0.0 })
            .fold(0.0_f64, f64::max);
        let finish = start + dag.exec_time(node);
        ef.insert(node, finish);
        total = total.max(finish);
    }
    Ok(total)
}
