use std::collections::{HashMap, HashSet};

use pedigree::dag::{DagGraph, RunState, Scheduler, TaskName};
use pedigree::engine::TaskOutcome;
use proptest::prelude::*;

fn graph(decls: &[(&str, &[&str])]) -> DagGraph {
    let owned: Vec<(String, Vec<TaskName>)> = decls
        .iter()
        .map(|(name, deps)| (name.to_string(), deps.iter().map(|d| d.to_string()).collect()))
        .collect();
    DagGraph::from_declarations(owned.iter().map(|(n, d)| (n.as_str(), d.as_slice())))
        .expect("valid graph")
}

fn sorted(mut names: Vec<TaskName>) -> Vec<TaskName> {
    names.sort();
    names
}

#[test]
fn test_start_schedules_only_roots() {
    let mut scheduler = Scheduler::new(graph(&[
        ("ancestry", &[]),
        ("children", &[]),
        ("portraits", &["ancestry", "children"]),
    ]));

    let step = scheduler.start();
    assert_eq!(
        sorted(step.newly_scheduled),
        vec!["ancestry".to_string(), "children".to_string()]
    );
    assert_eq!(scheduler.run_state_of("portraits"), Some(RunState::Pending));
    assert_eq!(
        scheduler.unmet_dependencies("portraits"),
        Some(vec!["ancestry".to_string(), "children".to_string()])
    );
    assert!(!scheduler.is_finished());
}

#[test]
fn test_second_start_is_a_noop() {
    let mut scheduler = Scheduler::new(graph(&[("A", &[])]));
    assert_eq!(scheduler.start().newly_scheduled, vec!["A".to_string()]);
    assert!(scheduler.start().newly_scheduled.is_empty());
}

#[test]
fn test_dependent_waits_for_every_dependency() {
    let mut scheduler = Scheduler::new(graph(&[
        ("ancestry", &[]),
        ("children", &[]),
        ("portraits", &["ancestry", "children"]),
    ]));
    scheduler.start();

    let step = scheduler.handle_completion("ancestry", TaskOutcome::Success);
    assert!(step.newly_scheduled.is_empty());
    assert_eq!(
        scheduler.unmet_dependencies("portraits"),
        Some(vec!["children".to_string()])
    );

    let step = scheduler.handle_completion("children", TaskOutcome::Success);
    assert_eq!(step.newly_scheduled, vec!["portraits".to_string()]);
    assert_eq!(scheduler.running_tasks(), vec!["portraits".to_string()]);

    let step = scheduler.handle_completion("portraits", TaskOutcome::Success);
    assert!(step.run_just_finished);
    assert!(scheduler.is_finished());
    assert!(!scheduler.has_failed());
}

#[test]
fn test_failure_blocks_dependents_transitively_and_halts() {
    let mut scheduler = Scheduler::new(graph(&[
        ("A", &[]),
        ("B", &[]),
        ("C", &["A"]),
        ("D", &["C"]),
        ("E", &["B"]),
    ]));
    scheduler.start();

    let step = scheduler.handle_completion("A", TaskOutcome::Failed);
    assert_eq!(
        sorted(step.newly_failed),
        vec!["A".to_string(), "C".to_string(), "D".to_string()]
    );
    assert!(step.run_just_finished);
    assert_eq!(scheduler.first_failure(), Some("A"));
    assert_eq!(scheduler.run_state_of("C"), Some(RunState::Blocked));
    assert_eq!(scheduler.run_state_of("D"), Some(RunState::Blocked));

    // B was already running; its success must not start E.
    let step = scheduler.handle_completion("B", TaskOutcome::Success);
    assert!(step.newly_scheduled.is_empty());
    assert_eq!(scheduler.run_state_of("B"), Some(RunState::DoneSuccess));
    assert_eq!(scheduler.run_state_of("E"), Some(RunState::Pending));
}

#[test]
fn test_unknown_or_idle_completion_is_ignored() {
    let mut scheduler = Scheduler::new(graph(&[("A", &[]), ("B", &["A"])]));
    scheduler.start();

    let step = scheduler.handle_completion("nope", TaskOutcome::Success);
    assert!(step.newly_scheduled.is_empty());

    let step = scheduler.handle_completion("B", TaskOutcome::Success);
    assert!(step.newly_scheduled.is_empty());
    assert_eq!(scheduler.run_state_of("B"), Some(RunState::Pending));
}

#[test]
fn test_empty_graph_finishes_on_start() {
    let mut scheduler = Scheduler::new(graph(&[]));
    let step = scheduler.start();
    assert!(step.newly_scheduled.is_empty());
    assert!(step.run_just_finished);
    assert!(scheduler.is_finished());
}

// Acyclic by construction: task N may only depend on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<(TaskName, Vec<TaskName>)>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let deps: HashSet<usize> = if i == 0 {
                        HashSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    };
                    let mut deps: Vec<TaskName> =
                        deps.into_iter().map(|d| format!("task_{d}")).collect();
                    deps.sort();
                    (format!("task_{i}"), deps)
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn test_scheduler_respects_dependencies_and_halts_on_failure(
        decls in dag_strategy(10),
        failing in proptest::collection::hash_set(0..10usize, 0..3),
    ) {
        let dag = DagGraph::from_declarations(
            decls.iter().map(|(n, d)| (n.as_str(), d.as_slice())),
        ).expect("strategy only produces DAGs");
        let deps: HashMap<&str, &[TaskName]> =
            decls.iter().map(|(n, d)| (n.as_str(), d.as_slice())).collect();
        let failing: HashSet<String> = failing.into_iter().map(|i| format!("task_{i}")).collect();

        let mut scheduler = Scheduler::new(dag);
        let mut executing: Vec<TaskName> = scheduler.start().newly_scheduled;
        let mut succeeded: HashSet<TaskName> = HashSet::new();
        let mut failed_seen = false;
        let mut steps = 0;

        while let Some(task) = executing.pop() {
            steps += 1;
            prop_assert!(steps <= 100, "simulation did not terminate");

            // Every dependency of a started task already succeeded.
            for dep in deps[task.as_str()] {
                prop_assert!(succeeded.contains(dep), "{} started before {}", task, dep);
            }

            let outcome = if failing.contains(&task) {
                TaskOutcome::Failed
            } else {
                TaskOutcome::Success
            };
            let step = scheduler.handle_completion(&task, outcome);

            match outcome {
                TaskOutcome::Success => { succeeded.insert(task.clone()); }
                TaskOutcome::Failed => failed_seen = true,
            }

            if failed_seen {
                prop_assert!(step.newly_scheduled.is_empty(), "task started after a failure");
            }
            executing.extend(step.newly_scheduled);
        }

        prop_assert!(scheduler.is_finished());
        prop_assert_eq!(scheduler.has_failed(), failed_seen);
        if !failed_seen {
            prop_assert_eq!(succeeded.len(), decls.len());
        }
    }
}
