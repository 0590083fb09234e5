use std::sync::Arc;

use uuid::Uuid;

use crate::config::get_config;
use crate::dto::interview_dto::{
    CreateInterviewPayload, CreateInterviewResponse, UpdateInterviewPayload,
};
use crate::error::{Error, Result};
use crate::models::interview::Interview;
use crate::store::{InterviewPatch, NewInterview, Store};
use crate::utils::slug;

#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn Store>,
}

impl InterviewService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an interview with a fresh sharing slug. A slug collision is a
    /// conflict the client retries; the random prefix makes it rare.
    pub async fn create(
        &self,
        user_id: &str,
        org_id: Option<&str>,
        payload: CreateInterviewPayload,
        organization_name: Option<&str>,
    ) -> Result<CreateInterviewResponse> {
        let url_slug = match organization_name {
            Some(org) => slug::org_interview_slug(&payload.name, org),
            None => slug::interview_slug(&payload.name),
        };

        let questions = payload.questions.unwrap_or_else(|| serde_json::json!([]));
        let question_count = payload.question_count.unwrap_or_else(|| {
            questions.as_array().map(|a| a.len() as i32).unwrap_or(5)
        });

        let interview = self
            .store
            .create_interview(NewInterview {
                user_id: user_id.to_string(),
                org_id: org_id.map(String::from),
                name: payload.name,
                description: payload.description,
                objective: payload.objective,
                questions,
                question_count,
                time_duration: payload.time_duration.unwrap_or_else(|| "30".to_string()),
                is_anonymous: payload.is_anonymous.unwrap_or(false),
                theme_color: payload.theme_color,
                logo_url: payload.logo_url,
                url_slug: url_slug.clone(),
                interviewer_id: payload.interviewer_id,
            })
            .await?;

        let url = format!("{}/call/{}", get_config().public_base_url, url_slug);
        Ok(CreateInterviewResponse {
            response: "Interview created successfully".to_string(),
            interview,
            url,
            url_slug,
        })
    }

    pub async fn list(&self, user_id: &str, org_id: Option<&str>) -> Result<Vec<Interview>> {
        self.store.list_interviews(user_id, org_id).await
    }

    pub async fn get_owned(
        &self,
        id: Uuid,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Interview> {
        let interview = self
            .store
            .get_interview(id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        if interview.user_id != user_id
            && !(org_id.is_some() && interview.org_id.as_deref() == org_id)
        {
            return Err(Error::NotFound("Interview not found".to_string()));
        }
        Ok(interview)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Interview> {
        self.store
            .get_interview_by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: &str,
        org_id: Option<&str>,
        payload: UpdateInterviewPayload,
    ) -> Result<Interview> {
        self.get_owned(id, user_id, org_id).await?;
        self.store
            .update_interview(
                id,
                InterviewPatch {
                    name: payload.name,
                    description: payload.description,
                    objective: payload.objective,
                    questions: payload.questions,
                    question_count: payload.question_count,
                    time_duration: payload.time_duration,
                    is_anonymous: payload.is_anonymous,
                    theme_color: payload.theme_color,
                    logo_url: payload.logo_url,
                    interviewer_id: payload.interviewer_id,
                    is_active: payload.is_active,
                },
            )
            .await
    }
}
