use std::collections::{HashMap, HashSet};

use crate::domain::{AnnotatedDag, NodeKey, ScheduledTask, Worker};
use crate::error::{Error, Result};
use crate::rank::{compute_eft, compute_oct, mean_oct, EftResult, Placement, PlacedTasks};

use super::common::{ready_tasks, select_by_priority};
use super::traits::Scheduler;

/// Predict Earliest Finish Time: ready tasks are
/// prioritized by descending mean Optimistic Cost Table value; placement
/// minimizes `EFT(n, p) + OCT(n, p)` rather than `EFT` alone, so a worker
/// that finishes this task soonest but leaves its successors a poor OCT
/// loses to one with a better combined score.
#[derive(Debug, Default)]
pub struct PeftScheduler;

impl Scheduler for PeftScheduler {
    fn name(&self) -> &'static str {
        "PEFT"
    }

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>> {
        let worker_count = workers.len();
        let oct = compute_oct(dag, worker_count)?;

        let mut remaining: HashSet<NodeKey> = dag.keys().collect();
        let mut placed: PlacedTasks = HashMap::with_capacity(remaining.len());
        let mut output = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let ready = ready_tasks(dag, &placed, &remaining);
            if ready.is_empty() {
                return Err(Error::NoForwardProgress(remaining.len()));
            }

            let node = select_by_priority(dag, &ready, |n| -mean_oct(&oct, n, worker_count));
            let (worker_index, result) = best_worker_by_eft_plus_oct(dag, node, workers, &placed, &oct);

            let task_id = dag.node(node).id.clone();
            workers[worker_index].place(task_id.clone(), result.start, result.eft);
            placed.insert(node, Placement { worker_index, finish_time: result.eft });
            output.push(ScheduledTask { node_id: task_id, worker_id: workers[worker_index].id.clone(), start_time: result.start, end_time: result.eft });
            remaining.remove(&node);
        }

        Ok(output)
    }
}

fn best_worker_by_eft_plus_oct(dag: &AnnotatedDag, node: NodeKey, workers: &[Worker], placed: &PlacedTasks, oct: &HashMap<(NodeKey, usize), f64>) -> (usize, EftResult) {
    workers
        .iter()
        .enumerate()
        .map(|(index, worker)| {
            let result = compute_eft(dag, node, index, worker, placed);
            let score = result.eft + oct[&(node, index)];
            (index, result, score)
        })
        .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap())
        .map(|(index, result, _)| (index, result))
        .expect("workers is non-empty")
}
