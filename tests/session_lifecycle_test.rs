mod common;

use common::{bearer_token, request_json, scoring, test_app, StubAnalyzer};
use serde_json::json;
use uuid::Uuid;

async fn create_interview(router: &axum::Router, token: &str) -> (Uuid, String) {
    let (status, body) = request_json(
        router,
        "POST",
        "/api/interviews",
        Some(token),
        Some(json!({
            "interviewData": {
                "name": "Backend Engineer Loop",
                "objective": "Assess API design depth",
                "questions": ["Tell me about a system you designed."],
                "questionCount": 1
            }
        })),
    )
    .await;
    assert_eq!(status, 201, "create interview: {body}");
    let id = body["interview"]["id"].as_str().unwrap().parse().unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    (id, url)
}

#[tokio::test]
async fn full_session_lifecycle_aggregates_and_counts() {
    let (router, _store) = test_app(StubAnalyzer::with_verdicts(vec![
        scoring(8.0, 8.0, 7.0, 8.0, 7.0),
        scoring(6.0, 6.0, 5.0, 7.0, 6.0),
    ]));
    let token = bearer_token("user_1");

    let (interview_id, share_url) = create_interview(&router, &token).await;
    assert!(share_url.starts_with("http://localhost:3000/call/"));

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({ "action": "start_session", "interviewId": interview_id })),
    )
    .await;
    assert_eq!(status, 200, "start: {body}");
    assert_eq!(body["session"]["status"], "ACTIVE");
    let session_id = body["session"]["id"].as_str().unwrap().to_string();

    for (question, answer) in [("Q1", "A1"), ("Q2", "A2")] {
        let (status, body) = request_json(
            &router,
            "POST",
            "/api/interview-session",
            Some(&token),
            Some(json!({
                "action": "submit_response",
                "responseData": { "sessionId": session_id, "question": question, "answer": answer }
            })),
        )
        .await;
        assert_eq!(status, 200, "submit: {body}");
        assert_eq!(body["message"], "Response submitted and analyzed");
    }

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({
            "action": "end_session",
            "sessionData": { "sessionId": session_id, "duration": 540 }
        })),
    )
    .await;
    assert_eq!(status, 200, "end: {body}");
    assert_eq!(body["overallScore"], 7.0);
    let session = &body["session"];
    assert_eq!(session["status"], "COMPLETED");
    assert_eq!(session["communication_score"], 7.0);
    assert_eq!(session["technical_score"], 6.0);
    assert_eq!(session["problem_solving_score"], 7.5);
    assert_eq!(session["confidence_score"], 6.5);
    assert_eq!(session["duration_seconds"], 540);

    // Counter moves exactly once, at session end.
    let (status, body) = request_json(
        &router,
        "GET",
        &format!("/api/interviews/{interview_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["interview"]["response_count"], 1);
}

#[tokio::test]
async fn submit_to_unknown_session_is_not_found() {
    let (router, _store) =
        test_app(StubAnalyzer::with_verdicts(vec![scoring(7.0, 7.0, 7.0, 7.0, 7.0)]));
    let token = bearer_token("user_1");

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({
            "action": "submit_response",
            "responseData": { "sessionId": Uuid::new_v4(), "question": "Q", "answer": "A" }
        })),
    )
    .await;
    assert_eq!(status, 404, "{body}");
}

#[tokio::test]
async fn analyzer_failure_fails_the_submission() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let token = bearer_token("user_1");
    let (interview_id, _) = create_interview(&router, &token).await;

    let (_, body) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({ "action": "start_session", "interviewId": interview_id })),
    )
    .await;
    let session_id = body["session"]["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({
            "action": "submit_response",
            "responseData": { "sessionId": session_id, "question": "Q", "answer": "A" }
        })),
    )
    .await;
    assert_ne!(status, 200);

    // Nothing was recorded, so ending the session aggregates to zeros.
    let (status, body) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({ "action": "end_session", "sessionData": { "sessionId": session_id } })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["overallScore"], 0.0);
    assert_eq!(body["session"]["communication_score"], 0.0);
}

#[tokio::test]
async fn unknown_action_is_bad_request() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let token = bearer_token("user_1");

    let (status, _) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&token),
        Some(json!({ "action": "pause_session" })),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let (status, _) = request_json(&router, "GET", "/api/interviews", None, None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn session_detail_is_owner_scoped() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let owner = bearer_token("user_owner");
    let intruder = bearer_token("user_intruder");
    let (interview_id, _) = create_interview(&router, &owner).await;

    let (_, body) = request_json(
        &router,
        "POST",
        "/api/interview-session",
        Some(&owner),
        Some(json!({ "action": "start_session", "interviewId": interview_id })),
    )
    .await;
    let session_id = body["session"]["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &router,
        "GET",
        &format!("/api/interview-session?sessionId={session_id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, 404);

    let (status, body) = request_json(
        &router,
        "GET",
        &format!("/api/interview-session?sessionId={session_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["session"]["id"], session_id.as_str());
}
