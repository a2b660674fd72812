use workflow_schedule_core::cpm;
use workflow_schedule_core::domain::{AnnotatedDag, GammaParams, TaskId, Worker, WorkerId, WorkflowTopology};
use workflow_schedule_core::scheduler::{CpHeftScheduler, GreedyScheduler, HeftScheduler, Scheduler};

fn diamond() -> WorkflowTopology {
    let mut topology = WorkflowTopology::new();
    let gamma = GammaParams::default();
    let a = topology.add_node(TaskId::new("A"), "A", gamma);
    let b = topology.add_node(TaskId::new("B"), "B", gamma);
    let c = topology.add_node(TaskId::new("C"), "C", gamma);
    let d = topology.add_node(TaskId::new("D"), "D", gamma);
    topology.add_edge(a, b, 1.0, gamma).unwrap();
    topology.add_edge(a, c, 2.0, gamma).unwrap();
    topology.add_edge(b, d, 1.0, gamma).unwrap();
    topology.add_edge(c, d, 1.0, gamma).unwrap();
    topology
}

fn diamond_dag() -> AnnotatedDag {
    let topology = diamond();
    let mut dag = AnnotatedDag::from_topology(&topology);
    for (name, exec) in [("A", 2.0), ("B", 3.0), ("C", 4.0), ("D", 1.0)] {
        let node = dag.key_for(&TaskId::new(name)).unwrap();
        dag.set_exec_time(node, exec);
    }
    dag
}

fn two_workers() -> Vec<Worker> {
    vec![Worker::new(WorkerId::new("W1")), Worker::new(WorkerId::new("W2"))]
}

fn find(schedule: &[workflow_schedule_core::domain::ScheduledTask], id: &str) -> &workflow_schedule_core::domain::ScheduledTask {
    schedule.iter().find(|t| t.node_id == TaskId::new(id)).unwrap_or_else(|| panic!("task '{id}' missing from schedule"))
}

/// Diamond workflow under HEFT, two workers.
#[test]
fn heft_diamond_scenario_matches_expected_makespan() {
    let mut dag = diamond_dag();
    cpm::analyze(&mut dag, true).unwrap();
    let mut workers = two_workers();

    let schedule = HeftScheduler.schedule(&mut dag, &mut workers).unwrap();

    let makespan = schedule.iter().map(|t| t.end_time).fold(0.0_f64, f64::max);
    assert_eq!(makespan, 8.0);

    let a = find(&schedule, "A");
    assert_eq!((a.start_time, a.end_time), (0.0, 2.0));
    let d = find(&schedule, "D");
    assert_eq!(d.end_time, 8.0);
}

/// CP-HEFT with a three-node CP chain plus a
/// sibling that must wait on a transfer from the CP worker.
#[test]
fn cp_heft_sibling_scenario_matches_expected_makespan() {
    let mut topology = WorkflowTopology::new();
    let gamma = GammaParams::default();
    let a = topology.add_node(TaskId::new("A"), "A", gamma);
    let b = topology.add_node(TaskId::new("B"), "B", gamma);
    let s = topology.add_node(TaskId::new("S"), "S", gamma);
    topology.add_edge(a, b, 0.0, gamma).unwrap();
    topology.add_edge(a, s, 2.0, gamma).unwrap();
    topology.add_edge(s, b, 2.0, gamma).unwrap();

    let mut dag = AnnotatedDag::from_topology(&topology);
    for (node, exec) in [(a, 5.0), (b, 5.0), (s, 3.0)] {
        dag.set_exec_time(node, exec);
    }
    cpm::analyze(&mut dag, true).unwrap();

    let mut workers = vec![Worker::new(WorkerId::new("Wcp")), Worker::new(WorkerId::new("W2"))];
    workers[0].critical_path_worker = true;

    let schedule = CpHeftScheduler.schedule(&mut dag, &mut workers).unwrap();

    let makespan = schedule.iter().map(|t| t.end_time).fold(0.0_f64, f64::max);
    assert_eq!(makespan, 10.0);

    let task_a = find(&schedule, "A");
    assert_eq!((task_a.start_time, task_a.end_time), (0.0, 5.0));
    let task_b = find(&schedule, "B");
    assert_eq!((task_b.start_time, task_b.end_time), (5.0, 10.0));
    let task_s = find(&schedule, "S");
    assert_eq!((task_s.start_time, task_s.end_time), (7.0, 10.0));
}

/// Determinism/idempotence: scheduling the same DAG twice yields identical placements.
#[test]
fn scheduling_is_idempotent() {
    let mut dag_one = diamond_dag();
    cpm::analyze(&mut dag_one, true).unwrap();
    let mut workers_one = two_workers();
    let schedule_one = GreedyScheduler.schedule(&mut dag_one, &mut workers_one).unwrap();

    let mut dag_two = diamond_dag();
    cpm::analyze(&mut dag_two, true).unwrap();
    let mut workers_two = two_workers();
    let schedule_two = GreedyScheduler.schedule(&mut dag_two, &mut workers_two).unwrap();

    let describe = |schedule: &[workflow_schedule_core::domain::ScheduledTask]| {
        schedule.iter().map(|t| (t.node_id.to_string(), t.worker_id.to_string(), t.start_time, t.end_time)).collect::<Vec<_>>()
    };
    assert_eq!(describe(&schedule_one), describe(&schedule_two));
}

/// Scheduled intervals on a single worker never overlap.
#[test]
fn single_worker_schedule_has_no_overlapping_slots() {
    let mut dag = diamond_dag();
    cpm::analyze(&mut dag, true).unwrap();
    let mut workers = vec![Worker::new(WorkerId::new("Solo"))];
    let schedule = GreedyScheduler.schedule(&mut dag, &mut workers).unwrap();

    let mut by_worker: Vec<_> = schedule.iter().collect();
    by_worker.sort_by(|a, b| a.start_time.partial_cmp(&b.start_time).unwrap());
    for pair in by_worker.windows(2) {
        assert!(pair[0].end_time <= pair[1].start_time, "overlap between {:?} and {:?}", pair[0], pair[1]);
    }

    // A single worker forces serial execution, so the makespan sums every task's execution time.
    let makespan = schedule.iter().map(|t| t.end_time).fold(0.0_f64, f64::max);
    assert_eq!(makespan, 2.0 + 3.0 + 4.0 + 1.0);
}

/// A cross-worker predecessor must respect the transfer time.
#[test]
fn cross_worker_predecessor_respects_transfer_time() {
    let mut dag = diamond_dag();
    cpm::analyze(&mut dag, true).unwrap();
    let mut workers = two_workers();
    let schedule = HeftScheduler.schedule(&mut dag, &mut workers).unwrap();

    let a = find(&schedule, "A").clone();
    let b = find(&schedule, "B").clone();
    if a.worker_id != b.worker_id {
        assert!(b.start_time >= a.end_time + 1.0);
    } else {
        assert!(b.start_time >= a.end_time);
    }
}

/// A missing CP-worker designation falls back to worker 0 rather than failing the pass.
#[test]
fn cp_heft_falls_back_to_first_worker_without_a_designated_cp_worker() {
    let mut dag = diamond_dag();
    cpm::analyze(&mut dag, true).unwrap();
    let mut workers = two_workers();
    let result = CpHeftScheduler.schedule(&mut dag, &mut workers);
    assert!(result.is_ok());
}
