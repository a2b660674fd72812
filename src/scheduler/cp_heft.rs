use std::collections::{HashMap, HashSet};

use crate::domain::{AnnotatedDag, NodeKey, ScheduledTask, Worker};
use crate::error::{Error, Result};
use crate::rank::{compute_upward_rank, Placement, PlacedTasks};

use super::common::{best_worker_by_eft_excluding, cp_chain_eft, ready_tasks, resolve_cp_worker};
use super::traits::Scheduler;

/// Two-tier HEFT: critical-path tasks are drained first,
/// ordered by ascending CPM earliest-start (ties by descending upward
/// rank), and pinned to the designated CP worker. Once no CP task is
/// ready, the remaining non-CP tasks fall back to ordinary HEFT — ranked
/// by descending upward rank, placed on whichever worker gives the
/// earliest finish time.
#[derive(Debug, Default)]
pub struct CpHeftScheduler;

impl Scheduler for CpHeftScheduler {
    fn name(&self) -> &'static str {
        "CP-HEFT"
    }

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>> {
        let rank = compute_upward_rank(dag)?;
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
                let node = select_cp_tier(dag, &cp_ready, &rank);
                let result = cp_chain_eft(dag, node, &workers[cp_worker_index], &placed);
                (node, cp_worker_index, result)
            } else {
                let node = *ready
                    .iter()
                    .max_by(|&&a, &&b| rank[&a].partial_cmp(&rank[&b]).unwrap().then_with(|| dag.node(b).id.cmp(&dag.node(a).id)))
                    .expect("ready is non-empty");
                let (worker_index, result) = best_worker_by_eft_excluding(dag, node, workers, &placed, cp_worker_index);
                (node, worker_index, result)
            };

            let task_id = dag.node(node).id.clone();
            workers[worker_index].place(task_id.clone(), result.start, result.eft);
            placed.insert(node, Placement { worker_index, finish_time: result.eft });
            output.push(ScheduledTask { node_id: task_id, worker_id: workers[worker_index].id.clone(), start_time: result.start, end_time: result.eft });
            remaining.remove(&node);
        }

        Ok(output)
    }
}

/// Selects the CP-tier node with the smallest CPM earliest-start; ties
/// broken by descending upward rank, then ascending task id.
fn select_cp_tier(dag: &AnnotatedDag, candidates: &[NodeKey], rank: &HashMap<NodeKey, f64>) -> NodeKey {
    *candidates
        .iter()
        .min_by(|&&a, &&b| {
            dag.cpm[&a]
                .earliest_start
                .partial_cmp(&dag.cpm[&b].earliest_start)
                .unwrap()
                .then_with(|| rank[&b].partial_cmp(&rank[&a]).unwrap())
                .then_with(|| dag.node(a).id.cmp(&dag.node(b).id))
        })
        .expect("candidates is non-empty")
}
