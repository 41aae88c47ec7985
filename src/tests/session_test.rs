use std::sync::Arc;

use crate::services::SessionState;

#[tokio::test]
async fn starts_with_the_seeded_default() {
    let session = SessionState::new("SELECT 1 LIMIT 1;".to_string());
    assert_eq!(session.last().await, "SELECT 1 LIMIT 1;");
}

#[tokio::test]
async fn submit_replaces_the_slot() {
    let session = SessionState::new("SELECT 1 LIMIT 1;".to_string());

    session.submit("SELECT cpu_usage FROM stats LIMIT 10;".to_string()).await;
    assert_eq!(session.last().await, "SELECT cpu_usage FROM stats LIMIT 10;");

    session.submit("SELECT memory_usage FROM stats LIMIT 10;".to_string()).await;
    assert_eq!(session.last().await, "SELECT memory_usage FROM stats LIMIT 10;");
}

#[tokio::test]
async fn concurrent_submissions_leave_exactly_one_winner() {
    let session = Arc::new(SessionState::new("SELECT 1 LIMIT 1;".to_string()));

    let a = "SELECT 'a' LIMIT 1;".to_string();
    let b = "SELECT 'b' LIMIT 1;".to_string();

    let s1 = Arc::clone(&session);
    let s2 = Arc::clone(&session);
    let (sql_a, sql_b) = (a.clone(), b.clone());
    let t1 = tokio::spawn(async move { s1.submit(sql_a).await });
    let t2 = tokio::spawn(async move { s2.submit(sql_b).await });
    t1.await.unwrap();
    t2.await.unwrap();

    // Last writer wins; either order is fine but the slot must hold one of
    // the two complete statements, never an interleaving.
    let last = session.last().await;
    assert!(last == a || last == b, "unexpected slot content: {}", last);
}
