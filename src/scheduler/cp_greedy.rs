use std::collections::{HashMap, HashSet};

use crate::domain::{AnnotatedDag, NodeKey, ScheduledTask, Worker};
use crate::error::{Error, Result};
use crate::rank::{compute_eft, EftResult, Placement, PlacedTasks};

use super::common::{best_worker_by_eft, cp_chain_eft, ready_tasks, resolve_cp_worker, select_by_priority};
use super::traits::Scheduler;

/// CP-first shortest-job-first: critical-path tasks are
/// always scheduled ahead of non-CP tasks and pinned to the designated CP
/// worker; non-CP tasks use the ordinary shortest-job-first/min-EFT rule,
/// with the CP worker excluded as a candidate whenever placing there would
/// overlap a still-unscheduled CP task's CPM-expected window.
#[derive(Debug, Default)]
pub struct CpGreedyScheduler;

impl Scheduler for CpGreedyScheduler {
    fn name(&self) -> &'static str {
        "CP-Greedy"
    }

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>> {
        let cp_worker_index = resolve_cp_worker(workers);

        let mut remaining: HashSet<NodeKey> = dag.keys().collect();
        let mut placed: PlacedTasks = HashMap::with_capacity(remaining.len());
        let mut output = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let ready = ready_tasks(dag, &placed, &remaining);
            if ready.is_empty() {
                return Err(Error::NoForwardProgress(remaining.len()));
            }

            let cp_ready: Vec<NodeKey> = ready.iter().copied().filter(|&n| dag.node(n).critical_path).collect();

            let (node, worker_index, result) = if !cp_ready.is_empty() {
                let node = select_by_priority(dag, &cp_ready, |n| dag.exec_time(n));
                let result = cp_chain_eft(dag, node, &workers[cp_worker_index], &placed);
                (node, cp_worker_index, result)
            } else {
                let node = select_by_priority(dag, &ready, |n| dag.exec_time(n));
                let (worker_index, result) = best_non_overlapping_worker(dag, node, workers, &placed, cp_worker_index, &remaining);
                (node, worker_index, result)
            };

            commit(dag, workers, &mut placed, &mut output, node, worker_index, result);
            remaining.remove(&node);
        }

        Ok(output)
    }
}

fn best_non_overlapping_worker(
    dag: &AnnotatedDag,
    node: NodeKey,
    workers: &[Worker],
    placed: &PlacedTasks,
    cp_worker_index: usize,
    remaining: &HashSet<NodeKey>,
) -> (usize, EftResult) {
    let unscheduled_cp: Vec<NodeKey> = remaining.iter().copied().filter(|&n| n != node && dag.node(n).critical_path).collect();

    let candidate = best_worker_by_eft(dag, node, workers, placed);
    if candidate.0 != cp_worker_index {
        return candidate;
    }

    if cp_worker_is_safe(dag, candidate.1, &unscheduled_cp) {
        return candidate;
    }

    workers
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != cp_worker_index)
        .map(|(index, worker)| (index, compute_eft(dag, node, index, worker, placed)))
        .min_by(|a, b| a.1.eft.partial_cmp(&b.1.eft).unwrap())
        .unwrap_or(candidate)
}

/// A candidate `(start, eft)` interval on the CP worker is safe for a
/// non-CP task only if it does not intersect the CPM-predicted
/// `[earliest_start, earliest_finish)` window of any CP task that has not
/// been scheduled yet.
fn cp_worker_is_safe(dag: &AnnotatedDag, candidate: EftResult, unscheduled_cp: &[NodeKey]) -> bool {
    unscheduled_cp.iter().all(|&cp_node| {
        let ann = &dag.cpm[&cp_node];
        !(candidate.start < ann.earliest_finish && ann.earliest_start < candidate.eft)
    })
}

fn commit(dag: &AnnotatedDag, workers: &mut [Worker], placed: &mut PlacedTasks, output: &mut Vec<ScheduledTask>, node: NodeKey, worker_index: usize, result: EftResult) {
    let task_id = dag.node(node).id.clone();
    workers[worker_index].place(task_id.clone(), result.start, result.eft);
    placed.insert(node, Placement { worker_index, finish_time: result.eft });
    output.push(ScheduledTask { node_id: task_id, worker_id: workers[worker_index].id.clone(), start_time: result.start, end_time: result.eft });
}
