//! Workout sessions and trainer statistics.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

async fn start(app: &TestApp, token: &str, day: i32) -> (StatusCode, serde_json::Value) {
    app.json(
        Method::POST,
        "/api/workouts/start",
        Some(token),
        Some(json!({"edition_id": 1, "day_number": day})),
    )
    .await
}

#[tokio::test]
async fn start_complete_and_count_in_stats() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, session) = start(&app, &token, 1).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["status"], json!("in_progress"));
    let id = session["id"].as_i64().unwrap();

    let (status, session) = app
        .json(
            Method::POST,
            &format!("/api/workouts/{}/complete", id),
            Some(&token),
            Some(json!({
                "duration_seconds": 1830,
                "exercises_completed": 2,
                "total_reps": 40,
                "total_weight": "1200.5",
                "total_calories": 250
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", session);
    assert_eq!(session["status"], json!("completed"));
    assert!(session["duration_display"].as_str().is_some());

    let (status, stats) = app
        .json(Method::GET, "/api/workouts/stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_workouts"], json!(1));
    assert_eq!(stats["total_calories"], json!(250));

    let (_, history) = app
        .json(Method::GET, "/api/workouts/history?limit=5", Some(&token), None)
        .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unscheduled_day_is_rejected() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = start(&app, &token, 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_FAILED"));
}

#[tokio::test]
async fn finished_session_cannot_change_again() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (_, session) = start(&app, &token, 2).await;
    let id = session["id"].as_i64().unwrap();

    let (status, body) = app
        .json(Method::POST, &format!("/api/workouts/{}/abandon", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("abandoned"));

    let (status, body) = app
        .json(
            Method::POST,
            &format!("/api/workouts/{}/complete", id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("INVALID_STATE_TRANSITION"));
}

#[tokio::test]
async fn sessions_belong_to_their_owner() {
    let app = TestApp::new();
    let owner = app.sign_in(1).await;
    let other = app.sign_in(2).await;

    let (_, session) = start(&app, &owner, 1).await;
    let id = session["id"].as_i64().unwrap();

    let (status, _) = app
        .json(Method::POST, &format!("/api/workouts/{}/abandon", id), Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn workouts_require_session() {
    let app = TestApp::new();
    let (status, _) = app
        .json(
            Method::POST,
            "/api/workouts/start",
            None,
            Some(json!({"edition_id": 1, "day_number": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
