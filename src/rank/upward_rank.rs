use std::collections::HashMap;

use crate::domain::{AnnotatedDag, NodeKey};
use crate::error::Result;

/// HEFT-style upward rank:
/// `rank(n) = exec(n) + max over successors s of (transfer(n,s) + rank(s))`,
/// with `rank(n) = exec(n)` at a sink. Computed bottom-up over an explicit
/// topological order rather than memoized recursion, so a cyclic graph is
/// caught once by `AnnotatedDag::topological_sort` instead of guarded at
/// every call site.
pub fn compute_upward_rank(dag: &AnnotatedDag) -> Result<HashMap<NodeKey, f64>> {
    let topo = dag.topological_sort()?;
    let mut rank = HashMap::with_capacity(topo.len());

    for &node in topo.iter().rev() {
        let successor_term = dag.outgoing(node).iter().map(|edge| edge.transfer_time + rank[&edge.target]).fold(0.0_f64, f64::max);
        rank.insert(node, dag.exec_time(node) + successor_term);
    }

    Ok(rank)
}
