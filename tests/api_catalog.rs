//! Catalog browsing and favorites.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn catalog_is_public() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::GET, "/api/exercises", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|e| e["is_favorited"] == json!(false)));

    let (status, body) = app
        .json(Method::GET, "/api/exercises/muscle-groups", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn exercises_filter_by_muscle_name() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::GET, "/api/exercises/by-muscle/legs", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], json!("Squat"));

    let (status, _) = app
        .json(Method::GET, "/api/exercises/by-muscle/tail", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exercise_detail_has_instructions() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::GET, "/api/exercises/1?lang=en", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["instructions"].as_array().unwrap().len(), 2);

    let (status, body) = app.json(Method::GET, "/api/exercises/404", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("EXERCISE_NOT_FOUND"));
}

#[tokio::test]
async fn only_active_programs_are_listed() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::GET, "/api/programs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let programs = body.as_array().unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0]["edition_count"], json!(2));

    let (status, _) = app.json(Method::GET, "/api/programs/2", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.json(Method::GET, "/api/editions/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_days"], json!(2));
    assert_eq!(body["total_exercises"], json!(3));
}

#[tokio::test]
async fn favorites_require_session() {
    let app = TestApp::new();
    let (status, _) = app.json(Method::GET, "/api/favorites", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn toggling_twice_removes_the_favorite() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = app
        .json(Method::POST, "/api/favorites/toggle/2", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_favorited"], json!(true));

    let (_, body) = app.json(Method::GET, "/api/exercises", Some(&token), None).await;
    let push_up = body
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == json!(2))
        .unwrap();
    assert_eq!(push_up["is_favorited"], json!(true));

    let (_, body) = app.json(Method::GET, "/api/favorites", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["exercise"]["name"], json!("Push Up"));

    let (status, body) = app
        .json(Method::POST, "/api/favorites/toggle/2", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_favorited"], json!(false));
    assert!(body["favorite"].is_null());

    let (_, body) = app.json(Method::GET, "/api/favorites", Some(&token), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn toggling_unknown_exercise_is_404() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;
    let (status, _) = app
        .json(Method::POST, "/api/favorites/toggle/999", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn collections_group_favorites() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, collection) = app
        .json(
            Method::POST,
            "/api/favorites/collections",
            Some(&token),
            Some(json!({"name": "Push day"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let collection_id = collection["id"].as_i64().unwrap();

    let (status, body) = app
        .json(
            Method::POST,
            "/api/favorites/collections",
            Some(&token),
            Some(json!({"name": "Push day"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("COLLECTION_EXISTS"));

    let (_, toggled) = app
        .json(Method::POST, "/api/favorites/toggle/1", Some(&token), None)
        .await;
    let favorite_id = toggled["favorite"]["id"].as_i64().unwrap();

    let (status, moved) = app
        .json(
            Method::PUT,
            &format!("/api/favorites/{}/collection", favorite_id),
            Some(&token),
            Some(json!({"collection_id": collection_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["collection_id"], json!(collection_id));

    let (_, collections) = app
        .json(Method::GET, "/api/favorites/collections", Some(&token), None)
        .await;
    assert_eq!(collections[0]["exercise_count"], json!(1));

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/favorites/collections/{}", collection_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The favorite survives its collection.
    let (_, favorites) = app.json(Method::GET, "/api/favorites", Some(&token), None).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    assert!(favorites[0]["collection_id"].is_null());
}

#[tokio::test]
async fn favorites_are_private_to_their_owner() {
    let app = TestApp::new();
    let owner = app.sign_in(1).await;
    let other = app.sign_in(2).await;

    let (_, toggled) = app
        .json(Method::POST, "/api/favorites/toggle/3", Some(&owner), None)
        .await;
    let favorite_id = toggled["favorite"]["id"].as_i64().unwrap();

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/favorites/{}", favorite_id),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/favorites/{}", favorite_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
