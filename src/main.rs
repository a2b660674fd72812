use workflow_schedule_core::cpm;
use workflow_schedule_core::domain::{AnnotatedDag, GammaParams, TaskId, Worker, WorkerId, WorkflowTopology};
use workflow_schedule_core::logger;
use workflow_schedule_core::scheduler::{HeftScheduler, Scheduler};

/// Builds the diamond workflow from the design notes' worked HEFT example:
/// A -> {B, C} -> D, with A/D on the critical path through C.
fn diamond_topology() -> WorkflowTopology {
    let mut topology = WorkflowTopology::new();
    let gamma = GammaParams::default();

    let a = topology.add_node(TaskId::new("A"), "A", gamma);
    let b = topology.add_node(TaskId::new("B"), "B", gamma);
    let c = topology.add_node(TaskId::new("C"), "C", gamma);
    let d = topology.add_node(TaskId::new("D"), "D", gamma);

    topology.add_edge(a, b, 1.0, gamma).expect("valid edge");
    topology.add_edge(a, c, 2.0, gamma).expect("valid edge");
    topology.add_edge(b, d, 1.0, gamma).expect("valid edge");
    topology.add_edge(c, d, 1.0, gamma).expect("valid edge");

    topology
}

fn main() {
    logger::init();

    let topology = diamond_topology();
    let mut dag = AnnotatedDag::from_topology(&topology);
    for node in dag.keys().collect::<Vec<_>>() {
        let exec = match dag.node(node).name.as_str() {
            "A" => 2.0,
            "B" => 3.0,
            "C" => 4.0,
            "D" => 1.0,
            other => {
                log::warn!("Unexpected node '{other}' in demo topology, defaulting exec time to 0");
                0.0
            }
        };
        dag.set_exec_time(node, exec);
    }

    let outcome = match cpm::analyze(&mut dag, true) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("Critical-path analysis failed: {err}");
            return;
        }
    };

    log::info!("Theoretical duration: {}", outcome.total_duration);
    let path: Vec<_> = outcome.critical_path.iter().map(|&n| dag.node(n).id.to_string()).collect();
    log::info!("Canonical critical path: {}", path.join(" -> "));

    let mut workers = vec![Worker::new(WorkerId::new("W1")), Worker::new(WorkerId::new("W2"))];
    match HeftScheduler.schedule(&mut dag, &mut workers) {
        Ok(schedule) => {
            for task in &schedule {
                log::info!("{} on {}: [{}, {}]", task.node_id, task.worker_id, task.start_time, task.end_time);
            }
            let makespan = schedule.iter().map(|t| t.end_time).fold(0.0_f64, f64::max);
            log::info!("HEFT makespan: {makespan}");
        }
        Err(err) => log::error!("HEFT scheduling failed: {err}"),
    }
}
