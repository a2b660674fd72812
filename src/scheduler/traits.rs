use crate::domain::{AnnotatedDag, ScheduledTask, Worker};
use crate::error::Result;

/// A list-scheduling algorithm over an already CPM-annotated DAG.
/// Implementations never add or remove tasks; `ODP-IP` is the only variant
/// allowed to append workers to `workers`.
pub trait Scheduler: std::fmt::Debug {
    /// Human-readable variant name, used in log lines and simulation
    /// output — not parsed by anything.
    fn name(&self) -> &'static str;

    fn schedule(&self, dag: &mut AnnotatedDag, workers: &mut Vec<Worker>) -> Result<Vec<ScheduledTask>>;
}

/// Selects a scheduler variant by value, so a caller (the Monte-Carlo
/// runner) can pick an algorithm at runtime without a hand-written match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerKind {
    Greedy,
    CpGreedy,
    Heft,
    CpHeft,
    Peft,
}

impl SchedulerKind {
    pub fn build(self) -> Box<dyn Scheduler> {
        match self {
            SchedulerKind::Greedy => Box::new(super::greedy::GreedyScheduler),
            SchedulerKind::CpGreedy => Box::new(super::cp_greedy::CpGreedyScheduler),
            SchedulerKind::Heft => Box::new(super::heft::HeftScheduler),
            SchedulerKind::CpHeft => Box::new(super::cp_heft::CpHeftScheduler),
            SchedulerKind::Peft => Box::new(super::peft::PeftScheduler),
        }
    }
}
