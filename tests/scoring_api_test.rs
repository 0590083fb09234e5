mod common;

use common::{bearer_token, request_json, scoring, test_app, StubAnalyzer};
use serde_json::json;
use uuid::Uuid;

async fn seeded_session(router: &axum::Router, token: &str) -> String {
    let (_, body) = request_json(
        router,
        "POST",
        "/api/interviews",
        Some(token),
        Some(json!({ "interviewData": { "name": "Scoring Drill" } })),
    )
    .await;
    let interview_id = body["interview"]["id"].as_str().unwrap().to_string();

    let (_, body) = request_json(
        router,
        "POST",
        "/api/interview-session",
        Some(token),
        Some(json!({ "action": "start_session", "interviewId": interview_id })),
    )
    .await;
    body["session"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn scoring_reports_breakdown_with_derived_relevance() {
    let (router, _store) =
        test_app(StubAnalyzer::with_verdicts(vec![scoring(8.0, 9.0, 6.0, 7.0, 8.0)]));
    let token = bearer_token("user_s1");

    let (status, body) = request_json(
        &router,
        "POST",
        "/api/scoring",
        Some(&token),
        Some(json!({ "question": "Q", "answer": "A" })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    let scoring = &body["scoring"];
    assert_eq!(scoring["overallScore"], 8.0);
    assert_eq!(scoring["breakdown"]["communication"], 9.0);
    assert_eq!(scoring["breakdown"]["relevance"], 7.0);
}

#[tokio::test]
async fn analyzer_failure_degrades_to_heuristic_and_persists() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let token = bearer_token("user_s2");
    let session_id = seeded_session(&router, &token).await;

    let answer = "In my experience we improved deploy time by 30%, for example by \
                  caching builds across the pipeline stages.";
    let (status, body) = request_json(
        &router,
        "POST",
        "/api/scoring",
        Some(&token),
        Some(json!({ "question": "Q", "answer": answer, "sessionId": session_id })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    // 4 base + 2 examples + 2 metrics, answer is under 50 words.
    assert_eq!(body["scoring"]["overallScore"], 8.0);
    assert_eq!(body["scoring"]["breakdown"]["technical"], 7.0);

    let (_, body) = request_json(
        &router,
        "GET",
        &format!("/api/interview-session?sessionId={session_id}"),
        Some(&token),
        None,
    )
    .await;
    let responses = body["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["score"], 8.0);
}

#[tokio::test]
async fn scoring_against_unknown_session_still_succeeds() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let token = bearer_token("user_s3");

    // Persistence is best-effort; a bogus session id only skips storage.
    let (status, body) = request_json(
        &router,
        "POST",
        "/api/scoring",
        Some(&token),
        Some(json!({ "question": "Q", "answer": "short", "sessionId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["scoring"]["overallScore"], 4.0);
}

#[tokio::test]
async fn history_summarizes_completed_sessions() {
    let (router, _store) = test_app(StubAnalyzer::with_verdicts(vec![
        scoring(6.0, 6.0, 6.0, 6.0, 6.0),
        scoring(9.0, 9.0, 9.0, 9.0, 9.0),
    ]));
    let token = bearer_token("user_s4");

    for _ in 0..2 {
        let session_id = seeded_session(&router, &token).await;
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
        assert_eq!(status, 200);
        let (status, _) = request_json(
            &router,
            "POST",
            "/api/interview-session",
            Some(&token),
            Some(json!({ "action": "end_session", "sessionData": { "sessionId": session_id } })),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, body) = request_json(&router, "GET", "/api/scoring", Some(&token), None).await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["summary"]["totalSessions"], 2);
    assert_eq!(body["summary"]["averageScore"], 7.5);
    assert_eq!(body["scores"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_history_summary_is_zeroed() {
    let (router, _store) = test_app(StubAnalyzer::failing());
    let token = bearer_token("user_s5");

    let (status, body) = request_json(&router, "GET", "/api/scoring", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["summary"]["averageScore"], 0.0);
    assert_eq!(body["summary"]["improvementTrend"], "stable");
}
