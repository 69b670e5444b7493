//! Integration tests for the submission lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, login_admin, post_json, post_json_auth, put_json_auth,
};
use serde_json::json;

const VIDEO_A: &str = "1700000000000-aaaaaaa.webm";
const VIDEO_B: &str = "1700000000001-bbbbbbb.webm";

fn candidate(name: &str, videos: &[&str]) -> serde_json::Value {
    let answers: Vec<_> = videos
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "questionId": format!("q{}", i + 1), "videoUrl": format!("/api/files/{v}") }))
        .collect();
    json!({
        "candidateInfo": { "name": name, "email": "candidate@example.com" },
        "answers": answers,
    })
}

async fn create(test: &common::TestApp, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(test.router(), "/api/submissions", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    json["submission"].clone()
}

#[tokio::test]
async fn candidate_can_submit_without_a_session() {
    let test = common::build_test_app().await;

    let submission = create(&test, candidate("Rin Tanaka", &[VIDEO_A, VIDEO_B])).await;

    assert!(submission["id"].is_string());
    assert!(submission["createdAt"].is_string());
    assert_eq!(submission["candidateName"], "Rin Tanaka");
    assert_eq!(submission["candidateInfo"]["email"], "candidate@example.com");
    assert_eq!(submission["answers"].as_array().unwrap().len(), 2);
    assert_eq!(submission["evaluation"]["status"], "unreviewed");
    assert_eq!(submission["evaluation"]["rating"], serde_json::Value::Null);
}

#[tokio::test]
async fn explicit_candidate_name_wins() {
    let test = common::build_test_app().await;
    let mut body = candidate("From Form", &[]);
    body["candidateName"] = json!("Explicit Name");

    let submission = create(&test, body).await;

    assert_eq!(submission["candidateName"], "Explicit Name");
}

#[tokio::test]
async fn missing_required_intake_field_is_rejected() {
    let test = common::build_test_app().await;
    let body = json!({ "candidateInfo": { "email": "x@example.com" }, "answers": [] });

    let response = post_json(test.router(), "/api/submissions", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Required field 'Name' is missing");
}

#[tokio::test]
async fn listing_and_fetching_require_a_session() {
    let test = common::build_test_app().await;
    let submission = create(&test, candidate("Rin", &[])).await;
    let id = submission["id"].as_str().unwrap();

    assert_eq!(get(test.router(), "/api/submissions").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        get(test.router(), &format!("/api/submissions/{id}")).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let cookie = login_admin(test.router()).await;
    let listed = body_json(get_auth(test.router(), "/api/submissions", &cookie).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let fetched =
        body_json(get_auth(test.router(), &format!("/api/submissions/{id}"), &cookie).await).await;
    assert_eq!(fetched, submission);
}

#[tokio::test]
async fn unknown_submission_is_404() {
    let test = common::build_test_app().await;
    let cookie = login_admin(test.router()).await;

    let response = get_auth(test.router(), "/api/submissions/does-not-exist", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Submission with id does-not-exist not found");

    let patch = json!({ "evaluation": { "status": "passed" } });
    let response =
        put_json_auth(test.router(), "/api/submissions/does-not-exist", patch, &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(test.router(), "/api/submissions/does-not-exist", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluation_patches_merge_field_by_field() {
    let test = common::build_test_app().await;
    let submission = create(&test, candidate("Rin", &[])).await;
    let uri = format!("/api/submissions/{}", submission["id"].as_str().unwrap());
    let cookie = login_admin(test.router()).await;

    let rated = put_json_auth(
        test.router(),
        &uri,
        json!({ "evaluation": { "rating": 4, "notes": "Confident" } }),
        &cookie,
    )
    .await;
    assert_eq!(rated.status(), StatusCode::OK);

    let passed = put_json_auth(
        test.router(),
        &uri,
        json!({ "evaluation": { "status": "passed" } }),
        &cookie,
    )
    .await;
    let json = body_json(passed).await;
    assert_eq!(json["evaluation"]["status"], "passed");
    assert_eq!(json["evaluation"]["rating"], 4);
    assert_eq!(json["evaluation"]["notes"], "Confident");
    assert_eq!(json["candidateName"], "Rin");
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let test = common::build_test_app().await;
    let submission = create(&test, candidate("Rin", &[])).await;
    let uri = format!("/api/submissions/{}", submission["id"].as_str().unwrap());
    let cookie = login_admin(test.router()).await;

    let response = put_json_auth(
        test.router(),
        &uri,
        json!({ "evaluation": { "rating": 9 } }),
        &cookie,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mistyped_patch_fields_are_rejected_with_the_error_envelope() {
    let test = common::build_test_app().await;
    let submission = create(&test, candidate("Rin", &[])).await;
    let uri = format!("/api/submissions/{}", submission["id"].as_str().unwrap());
    let cookie = login_admin(test.router()).await;

    for evaluation in [
        json!({ "status": "maybe" }),
        json!({ "rating": -1 }),
        json!({ "rating": 300 }),
    ] {
        let body = json!({ "evaluation": evaluation });
        let response = put_json_auth(test.router(), &uri, body, &cookie).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{evaluation}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn answer_videos_must_be_fresh_uploads() {
    let test = common::build_test_app().await;

    for name in ["merged-1-1700000000000.webm", "users.json", "notes.txt"] {
        let response =
            post_json(test.router(), "/api/submissions", candidate("Rin", &[name])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"], "Invalid video reference for question 'q1'");
    }
}

#[tokio::test]
async fn answer_video_of_another_submission_is_rejected() {
    let test = common::build_test_app().await;
    create(&test, candidate("Rin", &[VIDEO_A])).await;

    let response =
        post_json(test.router(), "/api/submissions", candidate("Mallory", &[VIDEO_B, VIDEO_A])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Video is already in use");
}

#[tokio::test]
async fn branding_asset_cannot_be_an_answer_video() {
    let test = common::build_test_app().await;
    let logo = "1700000000002-logo123.png";
    let cookie = login_admin(test.router()).await;
    let terms = json!({ "title": "Interview", "logoUrl": format!("/api/files/{logo}") });
    let response = post_json_auth(test.router(), "/api/terms", terms, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        post_json(test.router(), "/api/submissions", candidate("Mallory", &[logo])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Video is already in use");
}

#[tokio::test]
async fn delete_removes_record_and_media() {
    let test = common::build_test_app().await;
    test.put_upload(VIDEO_A, b"first");
    test.put_upload(VIDEO_B, b"second");
    let submission = create(&test, candidate("Rin", &[VIDEO_A, VIDEO_B])).await;
    let id = submission["id"].as_str().unwrap();
    let cookie = login_admin(test.router()).await;

    let response = delete_auth(test.router(), &format!("/api/submissions/{id}"), &cookie).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    assert!(!test.uploads_dir().join(VIDEO_A).exists());
    assert!(!test.uploads_dir().join(VIDEO_B).exists());

    let response = get_auth(test.router(), &format!("/api/submissions/{id}"), &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
