//! Postgres implementation of the [`Store`] trait.
//!
//! Queries go through the runtime API so the crate builds without a database
//! reachable at compile time. Ownership filters accept either the creating
//! user or, when present, the user's organization.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
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

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_interviewer(&self, new: NewInterviewer) -> Result<Interviewer> {
        let row = sqlx::query_as::<_, Interviewer>(
            r#"
            INSERT INTO interviewers
                (user_id, org_id, name, description, personality, expertise,
                 avatar_url, agent_id, rapport, exploration, empathy, speed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.org_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.personality)
        .bind(&new.expertise)
        .bind(&new.avatar_url)
        .bind(&new.agent_id)
        .bind(new.rapport)
        .bind(new.exploration)
        .bind(new.empathy)
        .bind(new.speed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_interviewers(
        &self,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Vec<Interviewer>> {
        let rows = sqlx::query_as::<_, Interviewer>(
            r#"
            SELECT * FROM interviewers
            WHERE user_id = $1 OR ($2::text IS NOT NULL AND org_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_interviewer(&self, id: Uuid) -> Result<Option<Interviewer>> {
        let row = sqlx::query_as::<_, Interviewer>("SELECT * FROM interviewers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_interview(&self, new: NewInterview) -> Result<Interview> {
        let row = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews
                (user_id, org_id, name, description, objective, questions,
                 question_count, time_duration, is_anonymous, theme_color,
                 logo_url, url_slug, interviewer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.org_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.objective)
        .bind(&new.questions)
        .bind(new.question_count)
        .bind(&new.time_duration)
        .bind(new.is_anonymous)
        .bind(&new.theme_color)
        .bind(&new.logo_url)
        .bind(&new.url_slug)
        .bind(new.interviewer_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_interviews(
        &self,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, Interview>(
            r#"
            SELECT * FROM interviews
            WHERE user_id = $1 OR ($2::text IS NOT NULL AND org_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_interview_by_slug(&self, slug: &str) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE url_slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_interview(&self, id: Uuid, patch: InterviewPatch) -> Result<Interview> {
        let row = sqlx::query_as::<_, Interview>(
            r#"
            UPDATE interviews SET
                name           = COALESCE($2, name),
                description    = COALESCE($3, description),
                objective      = COALESCE($4, objective),
                questions      = COALESCE($5, questions),
                question_count = COALESCE($6, question_count),
                time_duration  = COALESCE($7, time_duration),
                is_anonymous   = COALESCE($8, is_anonymous),
                theme_color    = COALESCE($9, theme_color),
                logo_url       = COALESCE($10, logo_url),
                interviewer_id = COALESCE($11, interviewer_id),
                is_active      = COALESCE($12, is_active),
                updated_at     = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(&patch.objective)
        .bind(&patch.questions)
        .bind(patch.question_count)
        .bind(&patch.time_duration)
        .bind(patch.is_anonymous)
        .bind(&patch.theme_color)
        .bind(&patch.logo_url)
        .bind(patch.interviewer_id)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        Ok(row)
    }

    async fn create_session(&self, new: NewSession) -> Result<Session> {
        let result = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions
                (interview_id, user_id, status, candidate_name, candidate_email,
                 call_id, start_time)
            VALUES ($1, $2, 'ACTIVE', $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(new.interview_id)
        .bind(&new.user_id)
        .bind(&new.candidate_name)
        .bind(&new.candidate_email)
        .bind(&new.call_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(Error::NotFound("Interview not found".to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_session_by_call_id(&self, call_id: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE call_id = $1")
            .bind(call_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_sessions_by_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_sessions_by_interview(&self, interview_id: Uuid) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE interview_id = $1 ORDER BY created_at DESC",
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_session(&self, id: Uuid, patch: SessionPatch) -> Result<Session> {
        let metadata = patch.metadata.map(Json);
        let row = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions SET
                status           = COALESCE($2, status),
                start_time       = COALESCE($3, start_time),
                end_time         = COALESCE($4, end_time),
                duration_seconds = COALESCE($5, duration_seconds),
                transcript       = COALESCE($6, transcript),
                feedback         = COALESCE($7, feedback),
                insights         = COALESCE($8, insights),
                metadata         = COALESCE($9, metadata),
                updated_at       = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.status)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.duration_seconds)
        .bind(&patch.transcript)
        .bind(&patch.feedback)
        .bind(&patch.insights)
        .bind(metadata)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;
        Ok(row)
    }

    async fn create_response(&self, new: NewResponse) -> Result<CandidateResponse> {
        let result = insert_response(&self.pool, &new).await;
        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(Error::NotFound("Session not found".to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn record_response(&self, new: NewResponse) -> Result<CandidateResponse> {
        let mut tx = self.pool.begin().await?;

        // Overwrite the running sub-scores first; zero rows means the
        // session does not exist and nothing gets inserted.
        let updated = sqlx::query(
            r#"
            UPDATE sessions SET
                communication_score   = $2,
                technical_score       = $3,
                problem_solving_score = $4,
                confidence_score      = $5,
                updated_at            = NOW()
            WHERE id = $1
            "#,
        )
        .bind(new.session_id)
        .bind(new.analysis.communication_score)
        .bind(new.analysis.technical_score)
        .bind(new.analysis.problem_solving_score)
        .bind(new.analysis.confidence_score)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("Session not found".to_string()));
        }

        let row = insert_response(&mut *tx, &new).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn list_responses(&self, session_id: Uuid) -> Result<Vec<CandidateResponse>> {
        let rows = sqlx::query_as::<_, CandidateResponse>(
            "SELECT * FROM responses WHERE session_id = $1 ORDER BY created_at ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn finalize_session(&self, id: Uuid, outcome: SessionOutcome) -> Result<Session> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions SET
                status                = 'COMPLETED',
                end_time              = $2,
                duration_seconds      = $3,
                overall_score         = $4,
                communication_score   = $5,
                technical_score       = $6,
                problem_solving_score = $7,
                confidence_score      = $8,
                updated_at            = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(outcome.end_time)
        .bind(outcome.duration_seconds)
        .bind(outcome.scores.overall)
        .bind(outcome.scores.communication)
        .bind(outcome.scores.technical)
        .bind(outcome.scores.problem_solving)
        .bind(outcome.scores.confidence)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;

        sqlx::query(
            "UPDATE interviews SET response_count = response_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(session.interview_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(session)
    }

    async fn count_interviews(&self, user_id: &str, org_id: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM interviews
            WHERE user_id = $1 OR ($2::text IS NOT NULL AND org_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

async fn insert_response<'e, E>(
    executor: E,
    new: &NewResponse,
) -> std::result::Result<CandidateResponse, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query_as::<_, CandidateResponse>(
        r#"
        INSERT INTO responses
            (session_id, question, answer, score, feedback, strengths,
             improvements, analysis)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new.session_id)
    .bind(&new.question)
    .bind(&new.answer)
    .bind(new.score)
    .bind(&new.feedback)
    .bind(&new.strengths)
    .bind(&new.improvements)
    .bind(Json(new.analysis))
    .fetch_one(executor)
    .await
}
