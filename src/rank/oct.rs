use std::collections::HashMap;

use crate::domain::{AnnotatedDag, NodeKey};
use crate::error::Result;

/// Optimistic Cost Table for PEFT: per-(task,
/// processor) lower bound on remaining completion time, computed bottom-up
/// over a reverse-topological order. Independent of any particular
/// schedule, so it is computed once up front exactly like upward rank.
pub fn compute_oct(dag: &AnnotatedDag, worker_count: usize) -> Result<HashMap<(NodeKey, usize), f64>> {
    let topo = dag.topological_sort()?;
    let mut oct: HashMap<(NodeKey, usize), f64> = HashMap::with_capacity(topo.len() * worker_count.max(1));

    for &node in topo.iter().rev() {
        for p in 0..worker_count {
            let value = dag
                .outgoing(node)
                .iter()
                .map(|edge| {
                    let successor = edge.target;
                    (0..worker_count)
                        .map(|p_prime| {
                            let remaining = oct[&(successor, p_prime)] + dag.exec_time(successor);
                            if p_prime == p { remaining } else { remaining + edge.transfer_time }
                        })
                        .fold(f64::INFINITY, f64::min)
                })
                .fold(0.0_f64, f64::max);
            oct.insert((node, p), value);
        }
    }

    Ok(oct)
}

/// Per-node PEFT priority: the arithmetic mean of `OCT(n, ·)` across every
/// processor.
pub fn mean_oct(oct: &HashMap<(NodeKey, usize), f64>, node: NodeKey, worker_count: usize) -> f64 {
    if worker_count == 0 {
        return 0.0;
    }
    let sum: f64 = (0..worker_count).map(|p| oct[&(node, p)]).sum();
    sum / worker_count as f64
}
