use std::collections::HashMap;

use crate::domain::worker::ProcessorSlot;
use crate::domain::{AnnotatedDag, NodeKey, Worker};

/// Where a task already landed: which worker, and when it finishes. Kept
/// centrally by the scheduler skeleton rather than re-derived from worker
/// slot tables on every call, since a task's predecessor may live on a
/// worker other than the one currently under consideration.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub worker_index: usize,
    pub finish_time: f64,
}

pub type PlacedTasks = HashMap<NodeKey, Placement>;

/// Earliest-start / earliest-finish-time for placing `node` onto `worker`,
/// given everything already placed. All
/// predecessors of `node` must already appear in `placed` — the scheduler
/// skeleton only calls this for ready tasks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EftResult {
    pub start: f64,
    pub eft: f64,
}

pub fn compute_eft(dag: &AnnotatedDag, node: NodeKey, worker_index: usize, worker: &Worker, placed: &PlacedTasks) -> EftResult {
    let data_ready = dag
        .incoming(node)
        .iter()
        .map(|inc| {
            let predecessor = placed.get(&inc.from).expect("predecessor must be scheduled before its successor is considered");
            if predecessor.worker_index != worker_index { predecessor.finish_time + inc.transfer_time } else { predecessor.finish_time }
        })
        .fold(0.0_f64, f64::max);

    let exec = dag.exec_time(node);
    let start = insertion_slot_start(&worker.slots, data_ready, exec);
    EftResult { start, eft: start + exec }
}

/// Insertion-based slot search: the earliest gap in
/// `slots` — start-time ordered — where a task of length `exec`, not ready
/// before `data_ready`, fits. This is what distinguishes insertion-based
/// scheduling from append-only scheduling.
pub fn insertion_slot_start(slots: &[ProcessorSlot], data_ready: f64, exec: f64) -> f64 {
    let Some(first) = slots.first() else {
        return data_ready;
    };

    if data_ready + exec <= first.start_time {
        return data_ready;
    }

    for pair in slots.windows(2) {
        let gap_start = pair[0].end_time.max(data_ready);
        let gap_end = pair[1].start_time;
        if gap_end - gap_start >= exec {
            return gap_start;
        }
    }

    slots.last().expect("checked non-empty above").end_time.max(data_ready)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: f64, end: f64) -> ProcessorSlot {
        ProcessorSlot { start_time: start, end_time: end, task_id: crate::domain::TaskId::new("x") }
    }

    #[test]
    fn fits_before_first_slot() {
        let slots = vec![slot(5.0, 10.0)];
        assert_eq!(insertion_slot_start(&slots, 0.0, 3.0), 0.0);
    }

    #[test]
    fn fills_gap_between_slots() {
        // Gap before the first slot (0..5) isn't wide enough once data_ready=2 shifts it; falls to the gap after.
        let slots = vec![slot(0.0, 5.0), slot(10.0, 14.0)];
        assert_eq!(insertion_slot_start(&slots, 2.0, 3.0), 5.0);
    }

    #[test]
    fn gap_too_small_falls_through_to_end() {
        let slots = vec![slot(0.0, 5.0), slot(6.0, 10.0)];
        assert_eq!(insertion_slot_start(&slots, 0.0, 3.0), 10.0);
    }

    #[test]
    fn empty_worker_starts_at_data_ready() {
        let slots: Vec<ProcessorSlot> = Vec::new();
        assert_eq!(insertion_slot_start(&slots, 7.0, 2.0), 7.0);
    }
}
