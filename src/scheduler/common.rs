use std::collections::HashSet;

use crate::domain::{AnnotatedDag, NodeKey, Worker};
use crate::rank::{compute_eft, insertion_slot_start, EftResult, PlacedTasks};

/// Ready tasks: every remaining node whose predecessors have all been
/// placed.
pub fn ready_tasks(dag: &AnnotatedDag, placed: &PlacedTasks, remaining: &HashSet<NodeKey>) -> Vec<NodeKey> {
    remaining.iter().copied().filter(|&node| dag.incoming(node).iter().all(|inc| placed.contains_key(&inc.from))).collect()
}

/// Picks the candidate with the minimum `priority`, breaking ties by
/// ascending `TaskId` so that runs are reproducible bit-for-bit. Callers wanting a *descending* ordering (HEFT rank,
/// PEFT mean OCT) pass the negated value.
pub fn select_by_priority(dag: &AnnotatedDag, candidates: &[NodeKey], mut priority: impl FnMut(NodeKey) -> f64) -> NodeKey {
    *candidates
        .iter()
        .min_by(|&&a, &&b| {
            priority(a).partial_cmp(&priority(b)).unwrap_or(std::cmp::Ordering::Equal).then_with(|| dag.node(a).id.cmp(&dag.node(b).id))
        })
        .expect("candidates is non-empty")
}

/// Worker with the minimum EFT for `node`. `Iterator::min_by` keeps the
/// first of equal elements, so ties break toward ascending worker index.
pub fn best_worker_by_eft(dag: &AnnotatedDag, node: NodeKey, workers: &[Worker], placed: &PlacedTasks) -> (usize, EftResult) {
    workers
        .iter()
        .enumerate()
        .map(|(index, worker)| (index, compute_eft(dag, node, index, worker, placed)))
        .min_by(|a, b| a.1.eft.partial_cmp(&b.1.eft).unwrap())
        .expect("workers is non-empty")
}

/// Same as [`best_worker_by_eft`] but skips `excluded`: used by CP-aware
/// variants to keep the CP worker reserved for the critical-path chain
/// when placing a non-CP task.
pub fn best_worker_by_eft_excluding(dag: &AnnotatedDag, node: NodeKey, workers: &[Worker], placed: &PlacedTasks, excluded: usize) -> (usize, EftResult) {
    let candidate = workers
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != excluded)
        .map(|(index, worker)| (index, compute_eft(dag, node, index, worker, placed)))
        .min_by(|a, b| a.1.eft.partial_cmp(&b.1.eft).unwrap());

    // No worker besides the reserved one exists; using it is the only option.
    candidate.unwrap_or_else(|| best_worker_by_eft(dag, node, workers, placed))
}

/// EFT for a CP task on the CP worker, counting only its critical-path
/// predecessors toward `data_ready`.
pub fn cp_chain_eft(dag: &AnnotatedDag, node: NodeKey, cp_worker: &Worker, placed: &PlacedTasks) -> EftResult {
    let data_ready = dag
        .incoming(node)
        .iter()
        .filter(|inc| dag.node(inc.from).critical_path)
        .map(|inc| placed.get(&inc.from).expect("CP predecessor scheduled before its successor").finish_time)
        .fold(0.0_f64, f64::max);
    let exec = dag.exec_time(node);
    let start = insertion_slot_start(&cp_worker.slots, data_ready, exec);
    EftResult { start, eft: start + exec }
}

/// Index of the designated critical-path worker: the first worker with
/// `critical_path_worker` set. Falls back to worker 0 and logs a
/// warning when no worker carries the flag.
pub fn resolve_cp_worker(workers: &[Worker]) -> usize {
    match workers.iter().position(|w| w.critical_path_worker) {
        Some(index) => index,
        None => {
            log::warn!("No worker is designated critical_path_worker; falling back to worker 0");
            0
        }
    }
}

