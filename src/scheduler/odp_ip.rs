use std::collections::{HashMap, HashSet};

use crate::domain::{AnnotatedDag, NodeKey, ScheduledTask, TaskId, Worker, WorkerId};
use crate::error::Result;

use super::common::resolve_cp_worker;
use super::traits::Scheduler;

/// One coalition from an externally computed optimal partition: the set of
/// non-critical-path tasks that should share a single dedicated worker.
pub type Coalition = Vec<TaskId>;

/// Coalition-driven scheduler: critical-path tasks go to
/// the designated CP worker; every coalition in `partition` gets its own
/// dedicated worker, created on demand; any non-CP task the partition
/// leaves out also gets its own dedicated worker. Tasks are then placed in
/// topological order, append-only (no insertion search) — each task starts
/// at `max(data_ready, worker.next_free())`.
///
/// The partition is consumed as produced by `solver::bridge` — already
/// mapped from the wire protocol's 1-based agent indices to concrete
/// `TaskId`s and validated for completeness.
#[derive(Debug)]
pub struct OdpIpScheduler {
    pub partition: Vec<Coalition>,
}

impl OdpIpScheduler {
    pub fn new(partition: Vec<Coalition>) -> Self {
        Self { partition }
    }
}

impl Scheduler for OdpIpScheduler {
    fn name(&self) -> &'static str {
        "ODP-IP"
    }

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>> {
        let cp_worker_index = resolve_cp_worker(workers);
        let assignment = self.assign_workers(dag, workers, cp_worker_index);

        let topo = dag.topological_sort()?;
        let mut finish: HashMap<NodeKey, (usize, f64)> = HashMap::with_capacity(topo.len());
        let mut output = Vec::with_capacity(topo.len());

        for node in topo {
            let worker_index = assignment[&node];
            let data_ready = dag
                .incoming(node)
                .iter()
                .map(|inc| {
                    let &(pred_worker, pred_finish) = &finish[&inc.from];
                    if pred_worker != worker_index { pred_finish + inc.transfer_time } else { pred_finish }
                })
                .fold(0.0_f64, f64::max);

            let start = data_ready.max(workers[worker_index].next_free());
            let exec = dag.exec_time(node);
            let end = start + exec;

            let task_id = dag.node(node).id.clone();
            workers[worker_index].place(task_id.clone(), start, end);
            finish.insert(node, (worker_index, end));
            output.push(ScheduledTask { node_id: task_id, worker_id: workers[worker_index].id.clone(), start_time: start, end_time: end });
        }

        Ok(output)
    }
}

impl OdpIpScheduler {
    /// Builds the `NodeKey -> worker index` map: CP tasks to the CP
    /// worker, each coalition to a freshly appended dedicated worker, and
    /// any non-CP task the partition omits to its own freshly appended
    /// worker.
    fn assign_workers(&self, dag: &AnnotatedDag, workers: &mut Vec<Worker>, cp_worker_index: usize) -> HashMap<NodeKey, usize> {
        let mut assignment: HashMap<NodeKey, usize> = HashMap::with_capacity(dag.len());
        let mut covered: HashSet<NodeKey> = HashSet::new();

        for node in dag.keys() {
            if dag.node(node).critical_path {
                assignment.insert(node, cp_worker_index);
                covered.insert(node);
            }
        }

        for (coalition_index, coalition) in self.partition.iter().enumerate() {
            let worker_index = workers.len();
            workers.push(Worker::new(WorkerId::new(format!("odp-ip-coalition-{coalition_index}"))));
            for task_id in coalition {
                if let Some(node) = dag.key_for(task_id) {
                    assignment.insert(node, worker_index);
                    covered.insert(node);
                }
            }
        }

        for node in dag.keys() {
            if covered.contains(&node) {
                continue;
            }
            let worker_index = workers.len();
            workers.push(Worker::new(WorkerId::new(format!("odp-ip-solo-{}", dag.node(node).id))));
            assignment.insert(node, worker_index);
        }

        assignment
    }
}
