use crate::domain::{AnnotatedDag, ScheduledTask, Worker};
use crate::error::Result;
use crate::rank::compute_upward_rank;

use super::greedy::run_min_eft_schedule;
use super::traits::Scheduler;

/// Heterogeneous Earliest Finish Time: ready tasks are prioritized by
/// descending upward rank, placed on whichever worker offers the earliest
/// finish time.
#[derive(Debug, Default)]
pub struct HeftScheduler;

impl Scheduler for HeftScheduler {
    fn name(&self) -> &'static str {
        "HEFT"
    }

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>> {
        let rank = compute_upward_rank(dag)?;
        run_min_eft_schedule(dag, workers, move |_, node| -rank[&node])
    }
}
