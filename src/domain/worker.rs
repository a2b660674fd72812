use serde::{Deserialize, Serialize};

use crate::domain::ids::{TaskId, WorkerId};

/// A per-worker occupied interval, maintained in start-time order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorSlot {
    pub start_time: f64,
    pub end_time: f64,
    pub task_id: TaskId,
}

/// A fixed-identity compute resource. Greedy-family
/// schedulers never create new workers; ODP-IP is the sole exception and
/// does so through `Worker::new`, the same constructor the caller uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub cumulative_time: f64,
    pub critical_path_worker: bool,
    pub slots: Vec<ProcessorSlot>,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self { id, cumulative_time: 0.0, critical_path_worker: false, slots: Vec::new() }
    }

    /// Inserts a slot at the position that keeps `slots` start-time
    /// ordered and updates `cumulative_time`. Callers are expected to have
    /// already validated non-overlap via the insertion search in
    /// `rank::eft`.
    pub fn place(&mut self, task_id: TaskId, start_time: f64, end_time: f64) {
        let position = self.slots.partition_point(|slot| slot.start_time < start_time);
        self.slots.insert(position, ProcessorSlot { start_time, end_time, task_id });
        self.cumulative_time += end_time - start_time;
    }

    pub fn next_free(&self) -> f64 {
        self.slots.last().map(|s| s.end_time).unwrap_or(0.0)
    }
}

/// Output record of a scheduling pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub node_id: TaskId,
    pub worker_id: WorkerId,
    pub start_time: f64,
    pub end_time: f64,
}

impl ScheduledTask {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
