mod common;

use axum::http::StatusCode;
use common::*;
use paywebhook::application::outcome::WebhookOutcome;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_submissions_admit_one() {
    let dispatcher = RecordingDispatcher::new();
    let processor = Arc::new(processor_with(dispatcher.clone()));
    let body = serde_json::to_vec(&valid_payload()).unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let processor = Arc::clone(&processor);
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            processor.handle(Some(TOKEN), &body).await
        }));
    }

    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            WebhookOutcome::Accepted => accepted += 1,
            WebhookOutcome::Duplicate => duplicates += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 49);
    assert_eq!(dispatcher.confirmed().len(), 1);
    assert_eq!(processor.processed_count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_ids_proceed_independently() {
    let dispatcher = RecordingDispatcher::new();
    let router = router_with(dispatcher.clone());

    let mut handles = Vec::new();
    for i in 0..20 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let body = payload_with_id(&format!("tx-{i}")).to_string();
            post_webhook(&router, Some(TOKEN), &body).await.0
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let (_, health) = get_health(&router).await;
    assert_eq!(health["processed_transactions"], 20);
    assert_eq!(dispatcher.confirmed().len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_requests_through_router() {
    let dispatcher = RecordingDispatcher::with_confirm_result(false);
    let router = router_with(dispatcher.clone());
    let body = payload_with_id("race").to_string();

    let mut handles = Vec::new();
    for _ in 0..25 {
        let router = router.clone();
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            post_webhook(&router, Some(TOKEN), &body).await.0
        }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    let first_seen = statuses
        .iter()
        .filter(|s| **s == StatusCode::INTERNAL_SERVER_ERROR)
        .count();
    assert_eq!(first_seen, 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::BAD_REQUEST)
            .count(),
        24
    );
}
