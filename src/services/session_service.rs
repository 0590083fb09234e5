use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::response::CandidateResponse;
use crate::models::session::Session;
use crate::services::aggregator;
use crate::services::groq_service::ResponseAnalyzer;
use crate::store::{NewResponse, NewSession, SessionOutcome, Store};

/// Orchestrates the session lifecycle: start, per-answer submission with
/// analysis, and the final aggregation that closes the session.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn Store>,
    analyzer: Arc<dyn ResponseAnalyzer>,
}

impl SessionService {
    pub fn new(store: Arc<dyn Store>, analyzer: Arc<dyn ResponseAnalyzer>) -> Self {
        Self { store, analyzer }
    }

    pub async fn start_session(
        &self,
        interview_id: Uuid,
        user_id: &str,
        candidate_name: Option<String>,
        candidate_email: Option<String>,
        call_id: Option<String>,
    ) -> Result<Session> {
        self.store
            .create_session(NewSession {
                interview_id,
                user_id: user_id.to_string(),
                candidate_name,
                candidate_email,
                call_id,
            })
            .await
    }

    /// Analyze one answer and record it. The response insert and the
    /// session's running sub-score update land together; an analyzer failure
    /// propagates and nothing is persisted.
    pub async fn submit_response(
        &self,
        session_id: Uuid,
        question: &str,
        answer: &str,
    ) -> Result<CandidateResponse> {
        let scoring = self.analyzer.analyze(question, answer, None).await?;

        self.store
            .record_response(NewResponse {
                session_id,
                question: question.to_string(),
                answer: answer.to_string(),
                score: scoring.score,
                feedback: scoring.feedback,
                strengths: scoring.strengths,
                improvements: scoring.improvements,
                analysis: scoring.analysis,
            })
            .await
    }

    /// Close the session: recompute all five scores from the recorded
    /// responses, mark it COMPLETED and bump the interview's counter. The
    /// recomputation is authoritative regardless of what the running
    /// sub-scores currently hold.
    pub async fn end_session(
        &self,
        session_id: Uuid,
        duration_seconds: Option<i32>,
    ) -> Result<Session> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;

        let responses = self.store.list_responses(session.id).await?;
        let scores = aggregator::aggregate(&responses);

        self.store
            .finalize_session(
                session.id,
                SessionOutcome {
                    end_time: Utc::now(),
                    duration_seconds,
                    scores,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::response::ResponseAnalysis;
    use crate::services::groq_service::{MockResponseAnalyzer, ResponseScoring};
    use crate::store::{MemoryStore, NewInterview};

    async fn seeded_store() -> (Arc<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let interview = store
            .create_interview(NewInterview {
                user_id: "user_1".into(),
                org_id: None,
                name: "Backend Loop".into(),
                description: None,
                objective: None,
                questions: serde_json::json!([]),
                question_count: 2,
                time_duration: "30".into(),
                is_anonymous: false,
                theme_color: None,
                logo_url: None,
                url_slug: "abc123defg-backend-loop".into(),
                interviewer_id: None,
            })
            .await
            .unwrap();
        (store, interview.id)
    }

    fn scoring(score: f64, comm: f64, tech: f64, ps: f64, conf: f64) -> ResponseScoring {
        ResponseScoring {
            score,
            feedback: "ok".into(),
            strengths: vec![],
            improvements: vec![],
            analysis: ResponseAnalysis {
                communication_score: comm,
                technical_score: tech,
                problem_solving_score: ps,
                confidence_score: conf,
            },
        }
    }

    #[tokio::test]
    async fn end_session_recomputes_from_all_responses() {
        let (store, interview_id) = seeded_store().await;
        let mut analyzer = MockResponseAnalyzer::new();
        let mut verdicts = vec![
            scoring(8.0, 8.0, 7.0, 8.0, 7.0),
            scoring(6.0, 6.0, 5.0, 7.0, 6.0),
        ]
        .into_iter();
        analyzer
            .expect_analyze()
            .times(2)
            .returning(move |_, _, _| Ok(verdicts.next().unwrap()));

        let service = SessionService::new(store.clone(), Arc::new(analyzer));
        let session = service
            .start_session(interview_id, "user_1", None, None, None)
            .await
            .unwrap();

        service
            .submit_response(session.id, "Q1", "A1")
            .await
            .unwrap();
        service
            .submit_response(session.id, "Q2", "A2")
            .await
            .unwrap();

        let ended = service.end_session(session.id, Some(600)).await.unwrap();
        assert_eq!(ended.status, "COMPLETED");
        assert_eq!(ended.overall_score, Some(7.0));
        assert_eq!(ended.communication_score, Some(7.0));
        assert_eq!(ended.technical_score, Some(6.0));
        assert_eq!(ended.problem_solving_score, Some(7.5));
        assert_eq!(ended.confidence_score, Some(6.5));
        assert_eq!(ended.duration_seconds, Some(600));

        let interview = store.get_interview(interview_id).await.unwrap().unwrap();
        assert_eq!(interview.response_count, 1);
    }

    #[tokio::test]
    async fn submit_to_unknown_session_persists_nothing() {
        let (store, _) = seeded_store().await;
        let mut analyzer = MockResponseAnalyzer::new();
        analyzer
            .expect_analyze()
            .returning(|_, _, _| Ok(scoring(7.0, 7.0, 7.0, 7.0, 7.0)));

        let service = SessionService::new(store.clone(), Arc::new(analyzer));
        let missing = Uuid::new_v4();
        let err = service
            .submit_response(missing, "Q", "A")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.list_responses(missing).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyzer_failure_propagates_and_persists_nothing() {
        let (store, interview_id) = seeded_store().await;
        let mut analyzer = MockResponseAnalyzer::new();
        analyzer
            .expect_analyze()
            .returning(|_, _, _| Err(anyhow::anyhow!("provider down").into()));

        let service = SessionService::new(store.clone(), Arc::new(analyzer));
        let session = service
            .start_session(interview_id, "user_1", None, None, None)
            .await
            .unwrap();

        assert!(service.submit_response(session.id, "Q", "A").await.is_err());
        assert!(store.list_responses(session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ending_with_no_responses_yields_zero_scores() {
        let (store, interview_id) = seeded_store().await;
        let analyzer = MockResponseAnalyzer::new();
        let service = SessionService::new(store.clone(), Arc::new(analyzer));

        let session = service
            .start_session(interview_id, "user_1", None, None, None)
            .await
            .unwrap();
        let ended = service.end_session(session.id, None).await.unwrap();

        assert_eq!(ended.overall_score, Some(0.0));
        assert_eq!(ended.communication_score, Some(0.0));
        assert_eq!(ended.status, "COMPLETED");
    }

    #[tokio::test]
    async fn running_sub_scores_track_latest_submission() {
        let (store, interview_id) = seeded_store().await;
        let mut analyzer = MockResponseAnalyzer::new();
        let mut verdicts = vec![
            scoring(9.0, 9.0, 9.0, 9.0, 9.0),
            scoring(3.0, 3.0, 3.0, 3.0, 3.0),
        ]
        .into_iter();
        analyzer
            .expect_analyze()
            .times(2)
            .returning(move |_, _, _| Ok(verdicts.next().unwrap()));

        let service = SessionService::new(store.clone(), Arc::new(analyzer));
        let session = service
            .start_session(interview_id, "user_1", None, None, None)
            .await
            .unwrap();
        service
            .submit_response(session.id, "Q1", "A1")
            .await
            .unwrap();
        service
            .submit_response(session.id, "Q2", "A2")
            .await
            .unwrap();

        let current = store.get_session(session.id).await.unwrap().unwrap();
        assert_eq!(current.communication_score, Some(3.0));
        assert_eq!(current.overall_score, None);
    }
}
