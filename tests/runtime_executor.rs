mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use pedigree::dag::{TaskGraph, TaskInputs};
use pedigree::engine::execute;
use pedigree::errors::PedigreeError;

#[tokio::test]
async fn test_independent_tasks_run_concurrently() -> TestResult {
    with_timeout(async {
        init_tracing();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut builder = TaskGraph::<u32>::builder();
        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            builder = builder.task(name, &[], move |_| async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, PedigreeError>(i as u32)
            });
        }

        let results = execute(builder.build()?).await?;

        assert_eq!(results.len(), 3);
        assert_eq!(results["c"], 2);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_dependent_receives_exactly_its_dependencies() -> TestResult {
    with_timeout(async {
        init_tracing();

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_in_task = Arc::clone(&seen);

        let graph = TaskGraph::<u32>::builder()
            .task("ancestry", &[], |_| async { Ok::<_, PedigreeError>(4) })
            .task("children", &[], |_| async { Ok::<_, PedigreeError>(3) })
            .task("unrelated", &[], |_| async { Ok::<_, PedigreeError>(100) })
            .task(
                "portraits",
                &["ancestry", "children"],
                move |inputs: TaskInputs<u32>| async move {
                    let mut keys: Vec<String> = inputs.keys().cloned().collect();
                    keys.sort();
                    *seen_in_task.lock().unwrap() = keys;
                    Ok::<_, PedigreeError>(inputs.values().sum())
                },
            )
            .build()?;

        let results = execute(graph).await?;

        assert_eq!(results["portraits"], 7);
        assert_eq!(results["unrelated"], 100);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["ancestry".to_string(), "children".to_string()]
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_dependent_starts_only_after_dependencies_finish() -> TestResult {
    with_timeout(async {
        init_tracing();

        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));

        let graph = TaskGraph::<()>::builder()
            .task("slow", &[], move |_| async move {
                tokio::time::sleep(Duration::from_millis(80)).await;
                l1.lock().unwrap().push("slow done");
                Ok::<_, PedigreeError>(())
            })
            .task("fast", &[], move |_| async move {
                l2.lock().unwrap().push("fast done");
                Ok::<_, PedigreeError>(())
            })
            .task("after", &["slow", "fast"], move |_| async move {
                l3.lock().unwrap().push("after started");
                Ok::<_, PedigreeError>(())
            })
            .build()?;

        execute(graph).await?;

        let log = log.lock().unwrap().clone();
        assert_eq!(log.len(), 3);
        assert_eq!(log[2], "after started");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_first_failure_short_circuits_the_run() -> TestResult {
    with_timeout(async {
        init_tracing();

        let dependent_ran = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&dependent_ran);

        let graph = TaskGraph::<()>::builder()
            .task("children", &[], |_| async {
                Err::<(), _>(PedigreeError::RemoteStatus {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                    body: String::new(),
                })
            })
            .task("ancestry", &[], |_| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok::<_, PedigreeError>(())
            })
            .task("portraits", &["ancestry", "children"], move |_| async move {
                flag.fetch_add(1, Ordering::SeqCst);
                Ok::<_, PedigreeError>(())
            })
            .build()?;

        let started = tokio::time::Instant::now();
        let err = execute(graph).await.expect_err("run must fail");

        assert_eq!(err.status(), Some(500));
        // Returned without waiting for the slow sibling.
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(dependent_ran.load(Ordering::SeqCst), 0);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_abandoned_sibling_still_finishes() -> TestResult {
    with_timeout(async {
        init_tracing();

        let finished = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&finished);

        let graph = TaskGraph::<()>::builder()
            .task("fails", &[], |_| async { Err::<(), _>(PedigreeError::Other(anyhow!("boom"))) })
            .task("sibling", &[], move |_| async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                flag.fetch_add(1, Ordering::SeqCst);
                Ok::<_, PedigreeError>(())
            })
            .build()?;

        let err = execute(graph).await.expect_err("run must fail");
        assert!(matches!(err, PedigreeError::Other(_)));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        Ok(())
    })
    .await
}

async fn explode() -> Result<(), PedigreeError> {
    panic!("task body panicked")
}

#[tokio::test]
async fn test_panicking_task_is_reported_as_failure() -> TestResult {
    with_timeout(async {
        init_tracing();

        let graph = TaskGraph::<()>::builder()
            .task("explodes", &[], |_| explode())
            .task("after", &["explodes"], |_| async { Ok::<_, PedigreeError>(()) })
            .build()?;

        match execute(graph).await {
            Err(PedigreeError::TaskPanicked(name)) => assert_eq!(name, "explodes"),
            other => panic!("Expected TaskPanicked, got: {:?}", other),
        }
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_empty_graph_yields_empty_results() -> TestResult {
    with_timeout(async {
        init_tracing();

        let results = execute(TaskGraph::<()>::builder().build()?).await?;
        assert!(results.is_empty());
        Ok(())
    })
    .await
}
