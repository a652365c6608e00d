//! Integration tests for edge cases.
//!
//! Tests boundary values, unicode handling, and unusual inputs.

mod common;

use common::TestEnv;
use taches::{Gateway, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, TaskCounts};

// =============================================================================
// Empty Store Operations
// =============================================================================

#[test]
fn test_empty_store_list() {
    let env = TestEnv::new();
    assert!(env.all().is_empty());
    assert!(env.pending().is_empty());
}

#[test]
fn test_empty_store_counts() {
    let env = TestEnv::new();
    assert_eq!(env.store.counts().unwrap(), TaskCounts::default());
}

#[test]
fn test_reset_empty_store() {
    let mut env = TestEnv::new();
    assert_eq!(env.store.reset().unwrap(), 0);
}

#[test]
fn test_pending_empty_when_all_completed() {
    let mut env = TestEnv::new();

    let a = env.create_task("A");
    let b = env.create_task("B");
    env.toggle(&a);
    env.toggle(&b);

    assert!(env.pending().is_empty());
    assert_eq!(env.all().len(), 2);
}

// =============================================================================
// Unicode and Special Characters
// =============================================================================

#[test]
fn test_unicode_title_emoji() {
    let mut env = TestEnv::new();

    let task = env.create_task("Task with emoji: \u{1F680}");
    assert!(task.title.contains('\u{1F680}'));
    assert_eq!(env.fetch(&task).title, task.title);
}

#[test]
fn test_accented_sample_like_text() {
    let mut env = TestEnv::new();

    let task = env.create_task_with_desc("Réviser", "Séance de révision, chapitre « deux »");
    let fetched = env.fetch(&task);
    assert_eq!(fetched.description, "Séance de révision, chapitre « deux »");
}

#[test]
fn test_sql_metacharacters_are_stored_verbatim() {
    let mut env = TestEnv::new();

    let title = "Robert'); DROP TABLE tasks;--";
    let task = env.create_task_with_desc(title, "100% \"quoted\" _under_");
    let fetched = env.fetch(&task);

    assert_eq!(fetched.title, title);
    assert_eq!(fetched.description, "100% \"quoted\" _under_");
    assert_eq!(env.total_count(), 1);
}

#[test]
fn test_description_may_span_lines() {
    let mut env = TestEnv::new();

    let task = env.create_task_with_desc("Notes", "line one\nline two");
    assert_eq!(env.fetch(&task).description, "line one\nline two");
}

// =============================================================================
// Boundary Values
// =============================================================================

#[test]
fn test_title_at_max_length() {
    let mut env = TestEnv::new();

    let title = "x".repeat(MAX_TITLE_LEN);
    let task = env.create_task(&title);
    assert_eq!(env.fetch(&task).title.len(), MAX_TITLE_LEN);
}

#[test]
fn test_title_one_over_max_length_is_rejected() {
    let mut env = TestEnv::new();
    assert!(env.store.create(&"x".repeat(MAX_TITLE_LEN + 1), "").is_err());
}

#[test]
fn test_description_at_max_length() {
    let mut env = TestEnv::new();

    let description = "é".repeat(MAX_DESCRIPTION_LEN);
    let task = env.create_task_with_desc("Long notes", &description);
    assert_eq!(env.fetch(&task).description.chars().count(), MAX_DESCRIPTION_LEN);
}

#[test]
fn test_padded_title_at_max_length_is_trimmed() {
    let mut env = TestEnv::new();

    let title = format!("  {}  ", "y".repeat(MAX_TITLE_LEN));
    let task = env.create_task(&title);
    assert_eq!(task.title, "y".repeat(MAX_TITLE_LEN));
}

#[test]
fn test_single_character_title() {
    let mut env = TestEnv::new();
    let task = env.create_task("x");
    assert_eq!(task.title, "x");
}

#[test]
fn test_negative_and_zero_ids_are_missing() {
    let mut env = TestEnv::new();
    env.create_task("Real");

    for id in [0, -1, i64::MIN] {
        assert!(env.store.get(id).unwrap().is_none());
        assert!(env.store.toggle(id).is_err());
        assert!(!env.store.delete(id).unwrap());
    }
}

#[test]
fn test_many_tasks_keep_insertion_order() {
    let mut env = TestEnv::new();

    let ids: Vec<i64> = (0..50).map(|i| env.create_task(&format!("Task {}", i)).id).collect();
    let listed: Vec<i64> = env.all().iter().map(|t| t.id).collect();

    // Same-millisecond timestamps fall back to id order
    assert_eq!(listed, ids);
}

// =============================================================================
// Gateway
// =============================================================================

#[tokio::test]
async fn test_gateway_round_trip() {
    let env = TestEnv::new();
    let gateway = Gateway::connect(env.db_path()).await.unwrap();

    let task = gateway.create_task("Via gateway", "async").await.unwrap();
    assert!(gateway.update_task(task.id, "Renamed", "async").await.unwrap());

    let done = gateway.toggle_completion(task.id).await.unwrap();
    assert!(done.completed);
    assert!(gateway.list_tasks(false).await.unwrap().is_empty());

    let seeded = gateway.seed_sample_data().await.unwrap();
    assert_eq!(seeded.len(), 5);
    assert_eq!(gateway.counts().await.unwrap().total, 6);

    assert!(gateway.delete_task(task.id).await.unwrap());
    assert_eq!(gateway.reset_all().await.unwrap(), 5);
    assert!(gateway.list_tasks(true).await.unwrap().is_empty());

    // The synchronous store sees the same file
    assert!(env.all().is_empty());
}
