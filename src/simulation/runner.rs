use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::cpm;
use crate::domain::{AnnotatedDag, TaskId, WorkerId, WorkflowTopology, Worker};
use crate::error::Result;
use crate::scheduler::Scheduler;

use super::gamma_sampler::GammaSampler;

/// One Monte-Carlo trial's result: the sampled inputs that produced it,
/// alongside the actual/theoretical durations the rest of the batch
/// statistics are computed over. Kept replayable — `per_node_exec` and
/// `original_edge_transfer_times` are enough to reconstruct the sampled DAG
/// without re-running the Gamma sampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub simulation_index: usize,
    pub actual_duration: f64,
    pub theoretical_duration: f64,
    /// `R = actual / theoretical`.
    pub efficiency_ratio: f64,
    /// Sampled execution time of every task, keyed by node id.
    pub per_node_exec: HashMap<TaskId, f64>,
    /// `(source, target, transfer_time)` for every edge, as scheduled
    /// (before the theoretical-minimum pass zeroes any of them).
    pub per_edge_transfer: Vec<(TaskId, TaskId, f64)>,
    /// Node ids the canonical critical path runs through, in no particular
    /// order.
    pub cp_node_ids: Vec<TaskId>,
    /// Worker count after scheduling — may exceed the pool `fresh_workers`
    /// built if the scheduler (ODP-IP) appended any.
    pub worker_count: usize,
    /// `Scheduler::name()` of the algorithm that produced `actual_duration`.
    pub algorithm: String,
    /// `per_edge_transfer`'s values captured before `zero_cp_edges` ran on
    /// the cloned DAG used for `theoretical_duration`, so a caller can see
    /// exactly what the CP-zeroing pass started from.
    pub original_edge_transfer_times: Vec<(TaskId, TaskId, f64)>,
    /// Each worker's `cumulative_time` after scheduling, keyed by worker id.
    pub final_worker_cumulative_times: HashMap<WorkerId, f64>,
}

/// Monte-Carlo batch parameters.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub runs: usize,
    pub seed: u64,
    pub include_transfer_times: bool,
}

impl SimulationConfig {
    pub fn new(runs: usize, seed: u64) -> Self {
        Self { runs, seed, include_transfer_times: true }
    }
}

/// Runs `config.runs` independent trials over `template`, sampling each
/// task's duration from its `GammaParams`, computing the theoretical
/// minimum (CPM with CP-edge transfer times zeroed)
/// and the actual scheduled makespan under `scheduler`, and collecting an
/// order-preserving `Vec<SimulationRecord>`.
///
/// `fresh_workers` is called once per trial to build that trial's worker
/// pool, since a scheduler (ODP-IP) may append workers to it. A failed
/// trial is logged and skipped rather than aborting the batch. `cancelled` is checked between trials for cooperative,
/// batch-granularity cancellation; mid-trial cancellation is
/// not supported.
pub fn run_batch(template: &WorkflowTopology, scheduler: &dyn Scheduler, fresh_workers: impl Fn() -> Vec<Worker>, config: SimulationConfig, cancelled: &AtomicBool) -> Vec<SimulationRecord> {
    let mut records = Vec::with_capacity(config.runs);

    for simulation_index in 0..config.runs {
        if cancelled.load(Ordering::Relaxed) {
            log::info!("Monte-Carlo batch cancelled after {simulation_index}/{} trials", config.runs);
            break;
        }

        match run_one(template, scheduler, &fresh_workers, &config, simulation_index) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("Simulation {simulation_index} failed, skipping: {err}"),
        }
    }

    records
}

fn run_one(template: &WorkflowTopology, scheduler: &dyn Scheduler, fresh_workers: &impl Fn() -> Vec<Worker>, config: &SimulationConfig, simulation_index: usize) -> Result<SimulationRecord> {
    let mut dag = AnnotatedDag::from_topology(template);
    let mut sampler = GammaSampler::substream(config.seed, simulation_index as u64);

    let nodes: Vec<_> = dag.keys().collect();
    for node in nodes {
        let gamma = dag.node(node).gamma;
        let sampled = sampler.sample(gamma);
        dag.set_exec_time(node, sampled);
    }

    cpm::analyze(&mut dag, config.include_transfer_times)?;

    let per_node_exec = per_node_exec_snapshot(&dag);
    let per_edge_transfer = per_edge_transfer_snapshot(&dag);
    let original_edge_transfer_times = per_edge_transfer.clone();
    let cp_node_ids = cp_node_ids_snapshot(&dag);

    let mut theoretical_dag = dag.clone();
    theoretical_dag.zero_cp_edges();
    let theoretical_duration = cpm::total_duration(&theoretical_dag, config.include_transfer_times)?;

    let mut workers = fresh_workers();
    let scheduled = scheduler.schedule(&mut dag, &mut workers)?;
    let actual_duration = scheduled.iter().map(|task| task.end_time).fold(0.0_f64, f64::max);

    let efficiency_ratio = if theoretical_duration > 0.0 { actual_duration / theoretical_duration } else { 0.0 };
    let worker_count = workers.len();
    let final_worker_cumulative_times = workers.iter().map(|w| (w.id.clone(), w.cumulative_time)).collect();

    Ok(SimulationRecord {
        simulation_index,
        actual_duration,
        theoretical_duration,
        efficiency_ratio,
        per_node_exec,
        per_edge_transfer,
        cp_node_ids,
        worker_count,
        algorithm: scheduler.name().to_string(),
        original_edge_transfer_times,
        final_worker_cumulative_times,
    })
}

fn per_node_exec_snapshot(dag: &AnnotatedDag) -> HashMap<TaskId, f64> {
    dag.keys().map(|key| (dag.node(key).id.clone(), dag.exec_time(key))).collect()
}

fn per_edge_transfer_snapshot(dag: &AnnotatedDag) -> Vec<(TaskId, TaskId, f64)> {
    dag.keys().flat_map(|key| dag.outgoing(key).iter().map(move |edge| (dag.node(key).id.clone(), dag.node(edge.target).id.clone(), edge.transfer_time))).collect()
}

fn cp_node_ids_snapshot(dag: &AnnotatedDag) -> Vec<TaskId> {
    dag.keys().filter(|&key| dag.node(key).critical_path).map(|key| dag.node(key).id.clone()).collect()
}
