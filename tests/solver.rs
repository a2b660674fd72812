use workflow_schedule_core::domain::{AnnotatedDag, GammaParams, TaskId, Worker, WorkerId, WorkflowTopology};
use workflow_schedule_core::scheduler::{OdpIpScheduler, Scheduler};
use workflow_schedule_core::solver::{build_coalition_values, SubsetValueFormula};

/// Three independent tasks, A on the critical path
/// and pinned to the CP worker, {B, C} assigned to one coalition by the
/// externally computed partition — each group lands on its own dedicated
/// worker and the CP task never shares a worker with a coalition.
#[test]
fn odp_ip_assigns_one_dedicated_worker_per_coalition_and_pins_cp_tasks() {
    let mut topology = WorkflowTopology::new();
    let gamma = GammaParams::default();
    let a = topology.add_node(TaskId::new("A"), "A", gamma);
    let b = topology.add_node(TaskId::new("B"), "B", gamma);
    let c = topology.add_node(TaskId::new("C"), "C", gamma);

    let mut dag = AnnotatedDag::from_topology(&topology);
    for (node, exec) in [(a, 5.0), (b, 2.0), (c, 3.0)] {
        dag.set_exec_time(node, exec);
    }
    dag.node_mut(a).critical_path = true;

    let partition = vec![vec![TaskId::new("B"), TaskId::new("C")]];
    let scheduler = OdpIpScheduler::new(partition);

    let mut workers = vec![Worker::new(WorkerId::new("Wcp"))];
    workers[0].critical_path_worker = true;

    let schedule = scheduler.schedule(&mut dag, &mut workers).unwrap();

    // CP worker plus one freshly appended worker for the {B, C} coalition.
    assert_eq!(workers.len(), 2);

    let task_a = schedule.iter().find(|t| t.node_id == TaskId::new("A")).unwrap();
    assert_eq!(task_a.worker_id, WorkerId::new("Wcp"));

    let task_b = schedule.iter().find(|t| t.node_id == TaskId::new("B")).unwrap();
    let task_c = schedule.iter().find(|t| t.node_id == TaskId::new("C")).unwrap();
    assert_eq!(task_b.worker_id, task_c.worker_id);
    assert_ne!(task_b.worker_id, task_a.worker_id);

    // B and C share a worker and must not overlap on it.
    let (first, second) = if task_b.start_time <= task_c.start_time { (task_b, task_c) } else { (task_c, task_b) };
    assert!(first.end_time <= second.start_time);
}

/// A non-CP task the partition leaves uncovered
/// gets its own solo dedicated worker.
#[test]
fn odp_ip_gives_uncovered_tasks_their_own_solo_worker() {
    let mut topology = WorkflowTopology::new();
    let gamma = GammaParams::default();
    let a = topology.add_node(TaskId::new("A"), "A", gamma);
    let b = topology.add_node(TaskId::new("B"), "B", gamma);

    let mut dag = AnnotatedDag::from_topology(&topology);
    for (node, exec) in [(a, 5.0), (b, 2.0)] {
        dag.set_exec_time(node, exec);
    }

    let scheduler = OdpIpScheduler::new(vec![]);
    let mut workers = vec![Worker::new(WorkerId::new("W0"))];

    let schedule = scheduler.schedule(&mut dag, &mut workers).unwrap();

    assert_eq!(workers.len(), 3); // W0 (fallback CP worker) + one solo worker per task
    let task_a = schedule.iter().find(|t| t.node_id == TaskId::new("A")).unwrap();
    let task_b = schedule.iter().find(|t| t.node_id == TaskId::new("B")).unwrap();
    assert_ne!(task_a.worker_id, task_b.worker_id);
}

/// The `2^N`-length coalition-value vector
/// handed to the solver, built with the linear formula over three
/// independent tasks.
#[test]
fn coalition_values_cover_every_subset_of_three_agents() {
    let mut topology = WorkflowTopology::new();
    let gamma = GammaParams::default();
    let a = topology.add_node(TaskId::new("A"), "A", gamma);
    let b = topology.add_node(TaskId::new("B"), "B", gamma);
    let c = topology.add_node(TaskId::new("C"), "C", gamma);

    let mut dag = AnnotatedDag::from_topology(&topology);
    for (node, exec) in [(a, 10.0), (b, 20.0), (c, 30.0)] {
        dag.set_exec_time(node, exec);
    }

    let nodes = vec![a, b, c];
    let values = build_coalition_values(&dag, &nodes, 1000.0, SubsetValueFormula::Linear).unwrap();

    assert_eq!(values.len(), 8);
    assert_eq!(values[0], 0.0); // empty coalition
    assert_eq!(values[0b111], 60.0); // {A, B, C}, no edges between them
}
