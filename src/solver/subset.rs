use crate::domain::{AnnotatedDag, NodeKey};
use crate::error::{Error, Result};

/// Hard cap on the agent count the solver will accept: `2^25 ≈ 3.4×10⁷`
/// subset values is the documented limit.
pub const MAX_AGENTS: usize = 25;

/// Which subset-value formula to feed the coalition-structure solver: two
/// incompatible formulations exist, so both are exposed and the caller
/// picks.
#[derive(Debug, Clone, Copy)]
pub enum SubsetValueFormula {
    /// `sum(exec) + transfer(fully inside) − transfer(exactly one endpoint
    /// inside)`, zeroed out when it exceeds `cp_duration`.
    Linear,
    /// `α·exp(-(t_S − goal)²) + β·(1 − exp(-c_S²))`, anchored at a CP node
    /// whose boundary edges count toward `t_S`.
    Exponential { alpha: f64, beta: f64, goal: f64, anchor: NodeKey },
}

/// The non-empty subset of `nodes` selected by `mask`'s set bits.
/// `bit_i(mask) = 1` means `nodes[i]` is a member.
pub fn mask_to_subset(mask: usize, nodes: &[NodeKey]) -> Vec<NodeKey> {
    nodes.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, &n)| n).collect()
}

/// Inverse of [`mask_to_subset`]: the bitmask whose set bits are exactly
/// the positions of `subset`'s members within `nodes`.
pub fn subset_to_mask(subset: &[NodeKey], nodes: &[NodeKey]) -> usize {
    subset.iter().fold(0usize, |mask, member| {
        let position = nodes.iter().position(|n| n == member).expect("subset member must belong to nodes");
        mask | (1 << position)
    })
}

/// Builds the `2^N`-length coalition-value vector the solver's wire
/// protocol expects, indexed by bitmask. Rejects `N >
/// MAX_AGENTS` before allocating the `2^N` vector.
pub fn build_coalition_values(dag: &AnnotatedDag, nodes: &[NodeKey], cp_duration: f64, formula: SubsetValueFormula) -> Result<Vec<f64>> {
    if nodes.len() > MAX_AGENTS {
        return Err(Error::AgentCountOutOfBounds(nodes.len()));
    }

    let size = 1usize << nodes.len();
    let mut values = Vec::with_capacity(size);
    for mask in 0..size {
        values.push(if mask == 0 { 0.0 } else { subset_value(dag, nodes, mask, cp_duration, formula) });
    }
    Ok(values)
}

fn subset_value(dag: &AnnotatedDag, nodes: &[NodeKey], mask: usize, cp_duration: f64, formula: SubsetValueFormula) -> f64 {
    match formula {
        SubsetValueFormula::Linear => linear_value(dag, nodes, mask, cp_duration),
        SubsetValueFormula::Exponential { alpha, beta, goal, anchor } => exponential_value(dag, nodes, mask, anchor, alpha, beta, goal),
    }
}

fn linear_value(dag: &AnnotatedDag, nodes: &[NodeKey], mask: usize, cp_duration: f64) -> f64 {
    let member = |node: NodeKey| -> bool {
        nodes.iter().position(|&n| n == node).is_some_and(|i| mask & (1 << i) != 0)
    };

    let exec_sum: f64 = nodes.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, &n)| dag.exec_time(n)).sum();

    let mut internal = 0.0_f64;
    let mut boundary = 0.0_f64;
    for &node in nodes.iter() {
        if !member(node) {
            continue;
        }
        for edge in dag.outgoing(node) {
            if !nodes.contains(&edge.target) {
                continue;
            }
            if member(edge.target) {
                internal += edge.transfer_time;
            } else {
                boundary += edge.transfer_time;
            }
        }
    }

    let total = exec_sum + internal - boundary;
    if total > cp_duration { 0.0 } else { total }
}

fn exponential_value(dag: &AnnotatedDag, nodes: &[NodeKey], mask: usize, anchor: NodeKey, alpha: f64, beta: f64, goal: f64) -> f64 {
    let member = |node: NodeKey| -> bool {
        nodes.iter().position(|&n| n == node).is_some_and(|i| mask & (1 << i) != 0)
    };

    let mut t_s: f64 = nodes.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, &n)| dag.exec_time(n)).sum();
    let mut c_s = 0.0_f64;

    for &node in nodes.iter() {
        if !member(node) {
            continue;
        }
        for edge in dag.outgoing(node) {
            if edge.target == anchor {
                t_s += edge.transfer_time;
            } else if nodes.contains(&edge.target) && member(edge.target) {
                c_s += edge.transfer_time;
            }
        }
        for incoming in dag.incoming(node) {
            if incoming.from == anchor {
                t_s += incoming.transfer_time;
            }
        }
    }

    alpha * (-(t_s - goal).powi(2)).exp() + beta * (1.0 - (-c_s.powi(2)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GammaParams, TaskId, WorkflowTopology};

    fn diamond() -> (AnnotatedDag, NodeKey, NodeKey, NodeKey, NodeKey) {
        let mut topology = WorkflowTopology::new();
        let gamma = GammaParams::default();
        let a = topology.add_node(TaskId::new("A"), "A", gamma);
        let b = topology.add_node(TaskId::new("B"), "B", gamma);
        let c = topology.add_node(TaskId::new("C"), "C", gamma);
        let d = topology.add_node(TaskId::new("D"), "D", gamma);
        topology.add_edge(a, b, 1.0, gamma).unwrap();
        topology.add_edge(a, c, 2.0, gamma).unwrap();
        topology.add_edge(b, d, 1.0, gamma).unwrap();
        topology.add_edge(c, d, 1.0, gamma).unwrap();

        let mut dag = AnnotatedDag::from_topology(&topology);
        for (node, exec) in [(a, 2.0), (b, 3.0), (c, 4.0), (d, 1.0)] {
            dag.set_exec_time(node, exec);
        }
        (dag, a, b, c, d)
    }

    #[test]
    fn mask_subset_round_trips_over_every_mask() {
        let (_dag, a, b, c, d) = diamond();
        let nodes = vec![a, b, c, d];
        for mask in 0..(1usize << nodes.len()) {
            let subset = mask_to_subset(mask, &nodes);
            assert_eq!(subset_to_mask(&subset, &nodes), mask);
        }
    }

    #[test]
    fn empty_mask_yields_empty_subset() {
        let (_dag, a, b, _c, _d) = diamond();
        let nodes = vec![a, b];
        assert!(mask_to_subset(0, &nodes).is_empty());
    }

    #[test]
    fn build_coalition_values_rejects_too_many_agents() {
        let (dag, a, ..) = diamond();
        let nodes = vec![a; MAX_AGENTS + 1];
        assert!(matches!(build_coalition_values(&dag, &nodes, 100.0, SubsetValueFormula::Linear), Err(Error::AgentCountOutOfBounds(_))));
    }

    #[test]
    fn linear_value_nets_out_boundary_transfer_but_keeps_internal_transfer() {
        let (dag, a, b, ..) = diamond();
        let nodes = vec![a, b];
        let values = build_coalition_values(&dag, &nodes, 100.0, SubsetValueFormula::Linear).unwrap();

        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1.0); // {A}: exec(A)=2 minus the boundary transfer to B (1.0)
        assert_eq!(values[2], 3.0); // {B}: exec(B)=3, no outgoing edge within the subset
        assert_eq!(values[3], 6.0); // {A,B}: exec(A)+exec(B)=5 plus the now-internal transfer (1.0)
    }

    #[test]
    fn linear_value_is_zeroed_once_it_exceeds_the_critical_path_duration() {
        let (dag, a, b, ..) = diamond();
        let nodes = vec![a, b];
        let values = build_coalition_values(&dag, &nodes, 0.5, SubsetValueFormula::Linear).unwrap();
        assert_eq!(values[3], 0.0);
    }
}
