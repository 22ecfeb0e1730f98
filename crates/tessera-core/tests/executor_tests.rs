mod common;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use common::{create_test_store, FailingDispatcher, RecordingDispatcher};
use tessera_core::{
    AgentRegistry, AgentType, ExecutionLoop, HumanFeedbackStatus, LoggingAgent, LoopConfig, Plan,
    PlanStore, Step, StepStatus, SweepReport, TesseraError,
};
use tokio::sync::watch;

fn fast_loop() -> LoopConfig {
    LoopConfig {
        poll_interval: Duration::from_millis(20),
        failure_backoff: Duration::from_millis(20),
    }
}

async fn seed_plan(store: &dyn PlanStore, session: &str, steps: &[(&str, AgentType)]) -> (Plan, Vec<Step>) {
    let plan = Plan::in_progress(session, "user-1", "Analyze AAPL earnings", "summary", None);
    let steps: Vec<Step> = steps
        .iter()
        .zip(0u32..)
        .map(|((action, agent), order)| Step::planned(&plan, order, *action, *agent))
        .collect();
    store.add_plan_with_steps(&plan, &steps).await.unwrap();
    (plan, steps)
}

async fn approve(store: &dyn PlanStore, step: &Step) -> Step {
    let mut step = step.clone();
    step.record_feedback(true, None).unwrap();
    store.update_step(&step).await.unwrap();
    step
}

#[tokio::test]
async fn test_sweep_completes_approved_step() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(
        store.as_ref(),
        "session-1",
        &[("Pull latest earnings call transcript", AgentType::EarningCallsAnalystAgent)],
    )
    .await;
    let step = approve(store.as_ref(), &steps[0]).await;

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());

    let report = executor.run_sweep().await.unwrap();
    assert_eq!(
        report,
        SweepReport {
            plans_scanned: 1,
            steps_dispatched: 1
        }
    );
    assert_eq!(
        dispatcher.sent(),
        vec![(
            "earningcallsanalystagent".to_string(),
            "session-1".to_string(),
            step.id
        )]
    );

    let stored = store.get_step(step.id).await.unwrap().unwrap();
    assert_eq!(stored.status, StepStatus::Completed);
    assert_eq!(stored.human_approval_status, HumanFeedbackStatus::Approved);
}

#[tokio::test]
async fn test_sweep_skips_steps_without_approval() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(
        store.as_ref(),
        "session-1",
        &[
            ("Await approval", AgentType::GenericAgent),
            ("Rejected work", AgentType::SecAnalystAgent),
        ],
    )
    .await;
    let mut rejected = steps[1].clone();
    rejected
        .record_feedback(false, Some("not needed".to_string()))
        .unwrap();
    store.update_step(&rejected).await.unwrap();

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());

    let report = executor.run_sweep().await.unwrap();
    assert_eq!(report.steps_dispatched, 0);
    assert!(dispatcher.sent().is_empty());
    assert_eq!(
        store.get_step(steps[0].id).await.unwrap().unwrap().status,
        StepStatus::Planned
    );
    assert_eq!(
        store.get_step(rejected.id).await.unwrap().unwrap().status,
        StepStatus::Rejected
    );
}

#[tokio::test]
async fn test_completed_step_is_not_dispatched_twice() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "s", &[("Summarize", AgentType::GenericAgent)]).await;
    approve(store.as_ref(), &steps[0]).await;

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());

    assert_eq!(executor.run_sweep().await.unwrap().steps_dispatched, 1);
    assert_eq!(executor.run_sweep().await.unwrap().steps_dispatched, 0);
    assert_eq!(dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn test_reapproving_completed_step_does_not_redispatch() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "s", &[("Summarize", AgentType::GenericAgent)]).await;
    approve(store.as_ref(), &steps[0]).await;

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());
    executor.run_sweep().await.unwrap();

    let mut completed = store.get_step(steps[0].id).await.unwrap().unwrap();
    assert_eq!(completed.status, StepStatus::Completed);
    let err = completed
        .record_feedback(true, Some("run it again".to_string()))
        .unwrap_err();
    assert!(matches!(err, TesseraError::InvalidInput { .. }));
    store.update_step(&completed).await.unwrap();

    assert_eq!(executor.run_sweep().await.unwrap().steps_dispatched, 0);
    assert_eq!(dispatcher.sent().len(), 1);
    let stored = store.get_step(steps[0].id).await.unwrap().unwrap();
    assert_eq!(stored.status, StepStatus::Completed);
    assert_eq!(stored.human_feedback, None);
}

#[tokio::test]
async fn test_rejecting_completed_step_keeps_it_completed() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "s", &[("Summarize", AgentType::GenericAgent)]).await;
    approve(store.as_ref(), &steps[0]).await;

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());
    executor.run_sweep().await.unwrap();

    let mut completed = store.get_step(steps[0].id).await.unwrap().unwrap();
    assert!(completed.record_feedback(false, None).is_err());
    store.update_step(&completed).await.unwrap();

    // A later approval attempt is refused as well.
    assert!(completed.record_feedback(true, None).is_err());
    store.update_step(&completed).await.unwrap();

    assert_eq!(executor.run_sweep().await.unwrap().steps_dispatched, 0);
    assert_eq!(dispatcher.sent().len(), 1);
    let stored = store.get_step(steps[0].id).await.unwrap().unwrap();
    assert_eq!(stored.status, StepStatus::Completed);
    assert_eq!(stored.human_approval_status, HumanFeedbackStatus::Approved);
}

#[tokio::test]
async fn test_sweep_visits_plans_and_steps_in_order() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, first) = seed_plan(
        store.as_ref(),
        "s-1",
        &[("a", AgentType::GenericAgent), ("b", AgentType::HumanAgent)],
    )
    .await;
    let (_, second) = seed_plan(store.as_ref(), "s-2", &[("c", AgentType::CompanyAnalystAgent)]).await;
    for step in first.iter().rev().chain(second.iter()) {
        approve(store.as_ref(), step).await;
    }

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());
    let report = executor.run_sweep().await.unwrap();

    assert_eq!(report.plans_scanned, 2);
    let order: Vec<_> = dispatcher.sent().into_iter().map(|(_, _, id)| id).collect();
    assert_eq!(order, vec![first[0].id, first[1].id, second[0].id]);
}

#[tokio::test]
async fn test_failed_dispatch_leaves_step_unfinished() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(
        store.as_ref(),
        "s",
        &[
            ("first", AgentType::GenericAgent),
            ("second", AgentType::GenericAgent),
        ],
    )
    .await;
    for step in &steps {
        approve(store.as_ref(), step).await;
    }

    let dispatcher = Arc::new(FailingDispatcher {
        store: store.clone(),
        attempts: Mutex::new(0),
    });
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());

    assert!(executor.run_sweep().await.is_err());
    assert_eq!(*dispatcher.attempts.lock().unwrap(), 1);
    for step in &steps {
        let stored = store.get_step(step.id).await.unwrap().unwrap();
        assert_eq!(stored.status, StepStatus::Approved);
    }
}

#[tokio::test]
async fn test_registry_with_logging_agent_records_receipt() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "session-9", &[("Chart RSI", AgentType::TechnicalAnalysisAgent)]).await;
    approve(store.as_ref(), &steps[0]).await;

    let mut registry = AgentRegistry::new();
    registry.register(
        AgentType::TechnicalAnalysisAgent,
        Arc::new(LoggingAgent::new(AgentType::TechnicalAnalysisAgent, store.clone())),
    );
    let executor = ExecutionLoop::new(store.clone(), Arc::new(registry), fast_loop());

    executor.run_sweep().await.unwrap();

    let messages = store.get_messages_by_session("session-9").await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].step_id, Some(steps[0].id));
    assert_eq!(
        store.get_step(steps[0].id).await.unwrap().unwrap().status,
        StepStatus::Completed
    );
}

#[tokio::test]
async fn test_unregistered_agent_aborts_sweep() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "s", &[("Ask the user", AgentType::HumanAgent)]).await;
    approve(store.as_ref(), &steps[0]).await;

    let executor = ExecutionLoop::new(store.clone(), Arc::new(AgentRegistry::new()), fast_loop());

    assert!(executor.run_sweep().await.is_err());
    assert_eq!(
        store.get_step(steps[0].id).await.unwrap().unwrap().status,
        StepStatus::Approved
    );
}

#[tokio::test]
async fn test_run_picks_up_late_approval_and_stops_on_shutdown() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "s", &[("Summarize", AgentType::GenericAgent)]).await;

    let dispatcher = Arc::new(RecordingDispatcher::default());
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { executor.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(dispatcher.sent().is_empty());

    approve(store.as_ref(), &steps[0]).await;
    let mut completed = false;
    for _ in 0..100 {
        let status = store.get_step(steps[0].id).await.unwrap().unwrap().status;
        if status == StepStatus::Completed {
            completed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(completed, "approved step was never completed by the loop");

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should stop after shutdown")
        .unwrap();
    assert_eq!(dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn test_run_survives_failed_sweeps() {
    let (_temp_dir, store) = create_test_store().await;
    let (_, steps) = seed_plan(store.as_ref(), "s", &[("Summarize", AgentType::GenericAgent)]).await;
    approve(store.as_ref(), &steps[0]).await;

    let dispatcher = Arc::new(FailingDispatcher {
        store: store.clone(),
        attempts: Mutex::new(0),
    });
    let executor = ExecutionLoop::new(store.clone(), dispatcher.clone(), fast_loop());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { executor.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(shutdown_tx);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should stop once the shutdown sender is gone")
        .unwrap();

    assert!(*dispatcher.attempts.lock().unwrap() >= 2);
    assert_eq!(
        store.get_step(steps[0].id).await.unwrap().unwrap().status,
        StepStatus::Approved
    );
}
