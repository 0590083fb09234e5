//! In-process simulation of the persistence layer.
//!
//! Used when no `DATABASE_URL` is configured and throughout the test suites.
//! It lives behind the same [`Store`] trait as the Postgres adapter and is
//! injected through `AppState`; nothing in the crate reaches for it as a
//! global. Single-process only.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::interview::Interview;
use crate::models::interviewer::Interviewer;
use crate::models::response::CandidateResponse;
use crate::models::session::Session;

use super::{
    InterviewPatch, NewInterview, NewInterviewer, NewResponse, NewSession, SessionOutcome,
    SessionPatch, Store,
};

#[derive(Default)]
struct Inner {
    interviewers: HashMap<Uuid, Interviewer>,
    interviews: HashMap<Uuid, Interview>,
    sessions: HashMap<Uuid, Session>,
    responses: HashMap<Uuid, Vec<CandidateResponse>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(user_id: &str, org_id: Option<&str>, row_user: &str, row_org: Option<&str>) -> bool {
    row_user == user_id || (org_id.is_some() && row_org == org_id)
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_interviewer(&self, new: NewInterviewer) -> Result<Interviewer> {
        let interviewer = Interviewer {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            org_id: new.org_id,
            name: new.name,
            description: new.description,
            personality: new.personality,
            expertise: new.expertise,
            avatar_url: new.avatar_url,
            agent_id: new.agent_id,
            rapport: new.rapport,
            exploration: new.exploration,
            empathy: new.empathy,
            speed: new.speed,
            created_at: Some(Utc::now()),
        };
        self.inner
            .write()
            .await
            .interviewers
            .insert(interviewer.id, interviewer.clone());
        Ok(interviewer)
    }

    async fn list_interviewers(
        &self,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Vec<Interviewer>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Interviewer> = inner
            .interviewers
            .values()
            .filter(|i| owned_by(user_id, org_id, &i.user_id, i.org_id.as_deref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_interviewer(&self, id: Uuid) -> Result<Option<Interviewer>> {
        Ok(self.inner.read().await.interviewers.get(&id).cloned())
    }

    async fn create_interview(&self, new: NewInterview) -> Result<Interview> {
        let mut inner = self.inner.write().await;
        if inner.interviews.values().any(|i| i.url_slug == new.url_slug) {
            return Err(Error::Conflict("Resource already exists".to_string()));
        }
        let interview = Interview {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            org_id: new.org_id,
            name: new.name,
            description: new.description,
            objective: new.objective,
            questions: new.questions,
            question_count: new.question_count,
            time_duration: new.time_duration,
            is_anonymous: new.is_anonymous,
            theme_color: new.theme_color,
            logo_url: new.logo_url,
            url_slug: new.url_slug,
            interviewer_id: new.interviewer_id,
            response_count: 0,
            is_active: true,
            respondents: Vec::new(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        inner.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn list_interviews(
        &self,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Vec<Interview>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Interview> = inner
            .interviews
            .values()
            .filter(|i| owned_by(user_id, org_id, &i.user_id, i.org_id.as_deref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        Ok(self.inner.read().await.interviews.get(&id).cloned())
    }

    async fn get_interview_by_slug(&self, slug: &str) -> Result<Option<Interview>> {
        let inner = self.inner.read().await;
        Ok(inner
            .interviews
            .values()
            .find(|i| i.url_slug == slug)
            .cloned())
    }

    async fn update_interview(&self, id: Uuid, patch: InterviewPatch) -> Result<Interview> {
        let mut inner = self.inner.write().await;
        let interview = inner
            .interviews
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        if let Some(name) = patch.name {
            interview.name = name;
        }
        if let Some(description) = patch.description {
            interview.description = Some(description);
        }
        if let Some(objective) = patch.objective {
            interview.objective = Some(objective);
        }
        if let Some(questions) = patch.questions {
            interview.questions = questions;
        }
        if let Some(question_count) = patch.question_count {
            interview.question_count = question_count;
        }
        if let Some(time_duration) = patch.time_duration {
            interview.time_duration = time_duration;
        }
        if let Some(is_anonymous) = patch.is_anonymous {
            interview.is_anonymous = is_anonymous;
        }
        if let Some(theme_color) = patch.theme_color {
            interview.theme_color = Some(theme_color);
        }
        if let Some(logo_url) = patch.logo_url {
            interview.logo_url = Some(logo_url);
        }
        if let Some(interviewer_id) = patch.interviewer_id {
            interview.interviewer_id = Some(interviewer_id);
        }
        if let Some(is_active) = patch.is_active {
            interview.is_active = is_active;
        }
        interview.updated_at = Some(Utc::now());
        Ok(interview.clone())
    }

    async fn create_session(&self, new: NewSession) -> Result<Session> {
        let mut inner = self.inner.write().await;
        if !inner.interviews.contains_key(&new.interview_id) {
            return Err(Error::NotFound("Interview not found".to_string()));
        }
        if let Some(ref call_id) = new.call_id {
            if inner
                .sessions
                .values()
                .any(|s| s.call_id.as_deref() == Some(call_id))
            {
                return Err(Error::Conflict("Resource already exists".to_string()));
            }
        }
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            interview_id: new.interview_id,
            user_id: new.user_id,
            status: "ACTIVE".to_string(),
            candidate_name: new.candidate_name,
            candidate_email: new.candidate_email,
            call_id: new.call_id,
            start_time: Some(now),
            end_time: None,
            duration_seconds: None,
            overall_score: None,
            communication_score: None,
            technical_score: None,
            problem_solving_score: None,
            confidence_score: None,
            transcript: None,
            feedback: None,
            insights: None,
            metadata: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn get_session_by_call_id(&self, call_id: &str) -> Result<Option<Session>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .values()
            .find(|s| s.call_id.as_deref() == Some(call_id))
            .cloned())
    }

    async fn list_sessions_by_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Session> = inner
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_sessions_by_interview(&self, interview_id: Uuid) -> Result<Vec<Session>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Session> = inner
            .sessions
            .values()
            .filter(|s| s.interview_id == interview_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_session(&self, id: Uuid, patch: SessionPatch) -> Result<Session> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;
        apply_session_patch(session, patch);
        Ok(session.clone())
    }

    async fn create_response(&self, new: NewResponse) -> Result<CandidateResponse> {
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&new.session_id) {
            return Err(Error::NotFound("Session not found".to_string()));
        }
        let response = build_response(new);
        inner
            .responses
            .entry(response.session_id)
            .or_default()
            .push(response.clone());
        Ok(response)
    }

    async fn record_response(&self, new: NewResponse) -> Result<CandidateResponse> {
        let mut inner = self.inner.write().await;
        let Some(session) = inner.sessions.get_mut(&new.session_id) else {
            return Err(Error::NotFound("Session not found".to_string()));
        };
        // Last writer wins on the running sub-scores; finalize_session is
        // the authoritative recomputation.
        session.communication_score = Some(new.analysis.communication_score);
        session.technical_score = Some(new.analysis.technical_score);
        session.problem_solving_score = Some(new.analysis.problem_solving_score);
        session.confidence_score = Some(new.analysis.confidence_score);
        session.updated_at = Some(Utc::now());

        let response = build_response(new);
        inner
            .responses
            .entry(response.session_id)
            .or_default()
            .push(response.clone());
        Ok(response)
    }

    async fn list_responses(&self, session_id: Uuid) -> Result<Vec<CandidateResponse>> {
        let inner = self.inner.read().await;
        Ok(inner.responses.get(&session_id).cloned().unwrap_or_default())
    }

    async fn finalize_session(&self, id: Uuid, outcome: SessionOutcome) -> Result<Session> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;

        session.status = "COMPLETED".to_string();
        session.end_time = Some(outcome.end_time);
        session.duration_seconds = outcome.duration_seconds;
        session.overall_score = Some(outcome.scores.overall);
        session.communication_score = Some(outcome.scores.communication);
        session.technical_score = Some(outcome.scores.technical);
        session.problem_solving_score = Some(outcome.scores.problem_solving);
        session.confidence_score = Some(outcome.scores.confidence);
        session.updated_at = Some(Utc::now());
        let finalized = session.clone();

        let interview = inner
            .interviews
            .get_mut(&finalized.interview_id)
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        interview.response_count += 1;
        interview.updated_at = Some(Utc::now());

        Ok(finalized)
    }

    async fn count_interviews(&self, user_id: &str, org_id: Option<&str>) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .interviews
            .values()
            .filter(|i| owned_by(user_id, org_id, &i.user_id, i.org_id.as_deref()))
            .count() as i64)
    }
}

fn build_response(new: NewResponse) -> CandidateResponse {
    CandidateResponse {
        id: Uuid::new_v4(),
        session_id: new.session_id,
        question: new.question,
        answer: new.answer,
        score: new.score,
        feedback: new.feedback,
        strengths: new.strengths,
        improvements: new.improvements,
        analysis: Json(new.analysis),
        created_at: Some(Utc::now()),
    }
}

fn apply_session_patch(session: &mut Session, patch: SessionPatch) {
    if let Some(status) = patch.status {
        session.status = status;
    }
    if let Some(start_time) = patch.start_time {
        session.start_time = Some(start_time);
    }
    if let Some(end_time) = patch.end_time {
        session.end_time = Some(end_time);
    }
    if let Some(duration) = patch.duration_seconds {
        session.duration_seconds = Some(duration);
    }
    if let Some(transcript) = patch.transcript {
        session.transcript = Some(transcript);
    }
    if let Some(feedback) = patch.feedback {
        session.feedback = Some(feedback);
    }
    if let Some(insights) = patch.insights {
        session.insights = Some(insights);
    }
    if let Some(metadata) = patch.metadata {
        session.metadata = Some(Json(metadata));
    }
    session.updated_at = Some(Utc::now());
}
