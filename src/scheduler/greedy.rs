use std::collections::{HashMap, HashSet};

use crate::domain::{AnnotatedDag, NodeKey, ScheduledTask, Worker};
use crate::error::{Error, Result};
use crate::rank::PlacedTasks;

use super::common::{best_worker_by_eft, ready_tasks, select_by_priority};
use super::traits::Scheduler;

/// Shared driver for the two variants whose priority is a plain per-node
/// score and whose placement is "minimum EFT over every worker": Greedy
/// and HEFT.
pub(super) fn run_min_eft_schedule(dag: &AnnotatedDag, workers: &mut [Worker], mut priority: impl FnMut(&AnnotatedDag, NodeKey) -> f64) -> Result<Vec<ScheduledTask>> {
    let mut remaining: HashSet<NodeKey> = dag.keys().collect();
    let mut placed: PlacedTasks = HashMap::with_capacity(remaining.len());
    let mut output = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready = ready_tasks(dag, &placed, &remaining);
        if ready.is_empty() {
            return Err(Error::NoForwardProgress(remaining.len()));
        }

        let node = select_by_priority(dag, &ready, |n| priority(dag, n));
        let (worker_index, result) = best_worker_by_eft(dag, node, workers, &placed);
        let task_id = dag.node(node).id.clone();

        workers[worker_index].place(task_id.clone(), result.start, result.eft);
        placed.insert(node, crate::rank::Placement { worker_index, finish_time: result.eft });
        output.push(ScheduledTask { node_id: task_id, worker_id: workers[worker_index].id.clone(), start_time: result.start, end_time: result.eft });
        remaining.remove(&node);
    }

    Ok(output)
}

/// Shortest-job-first list scheduling: ready tasks are prioritized by
/// ascending execution time, placed on whichever worker offers the
/// earliest finish time.
#[derive(Debug, Default)]
pub struct GreedyScheduler;

impl Scheduler for GreedyScheduler {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>> {
        run_min_eft_schedule(dag, workers, |dag, node| dag.exec_time(node))
    }
}
