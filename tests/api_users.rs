//! Sign-in, onboarding and profile endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn first_sign_in_creates_profile_and_points_to_questionnaire() {
    let app = TestApp::new();

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/auth",
            None,
            Some(json!({"telegram_id": 42, "first_name": "Aziz"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], json!(true));
    assert_eq!(body["onboarding_completed"], json!(false));
    assert_eq!(body["redirect_url"], json!("/miniapp/questionnaire/"));
    assert_eq!(body["user"]["telegram_id"], json!(42));
    assert!(body["token"].as_str().is_some());

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/auth",
            None,
            Some(json!({"telegram_id": 42})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], json!(false));
}

#[tokio::test]
async fn sign_in_without_identity_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .json(Method::POST, "/api/users/auth", None, Some(json!({})))
        .await;
    assert!(status.is_client_error());
    assert!(body["code"].as_str().is_some());
}

#[tokio::test]
async fn onboarding_steps_then_completion() {
    let app = TestApp::new();

    for (step, value) in [
        ("gender", json!("female")),
        ("experience", json!("beginner")),
        ("goal", json!("lose_weight")),
        ("motivation", json!(["healthy_lifestyle", "get_stronger"])),
        ("days", json!(4)),
        ("weight", json!(61.5)),
        ("height", json!(168)),
    ] {
        let (status, body) = app
            .json(
                Method::POST,
                "/api/users/onboarding/save",
                None,
                Some(json!({"telegram_id": 7, "step": step, "value": value})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "step {} failed: {}", step, body);
    }

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/onboarding/complete",
            None,
            Some(json!({"telegram_id": 7})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["onboarding_completed"], json!(true));
    assert_eq!(body["workout_days_per_week"], json!(4));
    assert_eq!(body["gender"], json!("female"));

    let (_, body) = app
        .json(Method::POST, "/api/users/auth", None, Some(json!({"telegram_id": 7})))
        .await;
    assert_eq!(body["redirect_url"], json!("/workouts/"));
}

#[tokio::test]
async fn unknown_onboarding_step_is_400() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/onboarding/save",
            None,
            Some(json!({"telegram_id": 7, "step": "favourite_colour", "value": "blue"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_FAILED"));
}

#[tokio::test]
async fn out_of_range_days_is_400() {
    let app = TestApp::new();
    let (status, _) = app
        .json(
            Method::POST,
            "/api/users/onboarding/save",
            None,
            Some(json!({"telegram_id": 7, "step": "days", "value": 9})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn questionnaire_submit_completes_onboarding() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            Method::POST,
            "/api/questionnaire/submit",
            None,
            Some(json!({
                "telegram_id": 55,
                "first_name": "Dilnoza",
                "gender": "female",
                "experience": "intermediate",
                "goal": "gain_muscle",
                "motivations": ["improve_physique"],
                "workout_days": 3,
                "weight": "58.25",
                "height": 165
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["onboarding_completed"], json!(true));
    assert_eq!(body["experience_level"], json!("intermediate"));
}

#[tokio::test]
async fn profile_requires_session() {
    let app = TestApp::new();
    let (status, body) = app.json(Method::GET, "/api/users/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("UNAUTHORIZED"));

    let (status, _) = app
        .json(Method::GET, "/api/users/profile", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_and_language() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = app
        .json(
            Method::PATCH,
            "/api/users/profile",
            Some(&token),
            Some(json!({"name": "Aziz K", "birth_date": "1995-04-12", "weight": 80, "height": 180})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["name"], json!("Aziz K"));
    assert!(body["age"].as_u64().is_some());
    assert!(!body["bmi"].is_null());

    let (status, body) = app
        .json(
            Method::PATCH,
            "/api/users/profile",
            Some(&token),
            Some(json!({"gender": "robot"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/settings/language",
            Some(&token),
            Some(json!({"language": "ru"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], json!("ru"));

    let (status, _) = app
        .json(
            Method::POST,
            "/api/users/settings/language",
            Some(&token),
            Some(json!({"language": "de"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
