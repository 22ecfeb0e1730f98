//! Integration tests comparing CLI output with the core Display
//! implementations.
//!
//! With `--no-color` the CLI must print exactly the markdown the library
//! formats, so both paths are checked against the same stored records.

use std::process::Command;

use tempfile::TempDir;
use tessera_core::{
    display::{Messages, PlanDetails, Plans},
    AgentMessage, AgentType, Plan, PlanStore, SqliteStore, Step, StoreBuilder,
};

/// Helper function to create a store over a temporary database
async fn create_test_store() -> (SqliteStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let store = StoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to create store");
    (store, temp_dir)
}

/// Run a CLI command and capture its output
fn run_cli_command(db_path: &str, args: &[&str]) -> String {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tessera"));
    cmd.arg("--no-color").arg("--database-file").arg(db_path);
    cmd.args(args);

    let output = cmd.output().expect("Failed to execute CLI command");
    assert!(
        output.status.success(),
        "CLI command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("CLI output is not UTF-8")
}

async fn seed(store: &SqliteStore) -> (Plan, Vec<Step>) {
    let plan = Plan::in_progress(
        "desk-7",
        "analyst",
        "Compare AMD and NVDA",
        "Collect fundamentals for both, then compare.",
        Some("Over which time horizon?".to_string()),
    );
    let steps = vec![
        Step::planned(&plan, 0, "Summarize AMD fundamentals", AgentType::CompanyAnalystAgent),
        Step::planned(&plan, 1, "Summarize NVDA fundamentals", AgentType::CompanyAnalystAgent),
        Step::planned(&plan, 2, "Write the comparison", AgentType::GenericAgent),
    ];
    store.add_plan_with_steps(&plan, &steps).await.unwrap();
    store
        .add_message(&AgentMessage::new(
            "desk-7",
            "analyst",
            plan.id,
            "PlannerAgent",
            "Generated a plan with 3 steps.",
        ))
        .await
        .unwrap();
    (plan, steps)
}

#[tokio::test]
async fn test_plan_show_matches_display() {
    let (store, temp_dir) = create_test_store().await;
    let (plan, steps) = seed(&store).await;
    let db_path = temp_dir.path().join("test.db");

    let cli_output = run_cli_command(
        db_path.to_str().unwrap(),
        &["plan", "show", &plan.id.to_string()],
    );
    let stored = store.get_plan(plan.id).await.unwrap().unwrap();
    let expected = PlanDetails::new(&stored, &steps).to_string();

    assert_eq!(cli_output, expected);
}

#[tokio::test]
async fn test_plan_list_matches_display() {
    let (store, temp_dir) = create_test_store().await;
    seed(&store).await;
    let db_path = temp_dir.path().join("test.db");

    let cli_output = run_cli_command(
        db_path.to_str().unwrap(),
        &["--session", "desk-7", "plan", "list"],
    );
    let expected = Plans(store.get_plans_by_session("desk-7").await.unwrap()).to_string();

    assert_eq!(cli_output, expected);
}

#[tokio::test]
async fn test_messages_match_display() {
    let (store, temp_dir) = create_test_store().await;
    seed(&store).await;
    let db_path = temp_dir.path().join("test.db");

    let cli_output = run_cli_command(db_path.to_str().unwrap(), &["--session", "desk-7", "messages"]);
    let expected = Messages(store.get_messages_by_session("desk-7").await.unwrap()).to_string();

    assert_eq!(cli_output, expected);
    assert!(cli_output.contains("Generated a plan with 3 steps."));
}
