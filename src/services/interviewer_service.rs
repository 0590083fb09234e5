use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::interviewer_dto::CreateInterviewerPayload;
use crate::error::{Error, Result};
use crate::models::interviewer::Interviewer;
use crate::store::{NewInterviewer, Store};

#[derive(Clone)]
pub struct InterviewerService {
    store: Arc<dyn Store>,
}

impl InterviewerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        user_id: &str,
        org_id: Option<&str>,
        payload: CreateInterviewerPayload,
    ) -> Result<Interviewer> {
        self.store
            .create_interviewer(NewInterviewer {
                user_id: user_id.to_string(),
                org_id: org_id.map(String::from),
                name: payload.name,
                description: payload.description,
                personality: payload.personality,
                expertise: payload.expertise.unwrap_or_default(),
                avatar_url: payload.avatar_url,
                agent_id: payload.agent_id,
                rapport: payload.rapport.unwrap_or(5),
                exploration: payload.exploration.unwrap_or(5),
                empathy: payload.empathy.unwrap_or(5),
                speed: payload.speed.unwrap_or(1.0),
            })
            .await
    }

    pub async fn list(&self, user_id: &str, org_id: Option<&str>) -> Result<Vec<Interviewer>> {
        self.store.list_interviewers(user_id, org_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Interviewer> {
        self.store
            .get_interviewer(id)
            .await?
            .ok_or_else(|| Error::NotFound("Interviewer not found".to_string()))
    }

    /// Seed the two stock personas for a user. Idempotent per name: calling
    /// again creates only what is missing.
    pub async fn create_defaults(
        &self,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Vec<Interviewer>> {
        let existing = self.store.list_interviewers(user_id, org_id).await?;
        let has = |name: &str| {
            existing
                .iter()
                .any(|i| i.name == name && i.user_id == user_id)
        };

        let mut created = Vec::new();
        let now = Utc::now().timestamp_millis();

        if !has("Lisa") {
            let lisa = self
                .store
                .create_interviewer(NewInterviewer {
                    user_id: user_id.to_string(),
                    org_id: org_id.map(String::from),
                    name: "Lisa".to_string(),
                    description: "Friendly and encouraging interviewer perfect for beginners"
                        .to_string(),
                    personality: "Supportive and patient, helps candidates feel comfortable"
                        .to_string(),
                    expertise: vec![
                        "Behavioral Questions".to_string(),
                        "Communication Skills".to_string(),
                        "General Interview Prep".to_string(),
                    ],
                    avatar_url: None,
                    agent_id: Some(format!("agent_lisa_{}", now)),
                    rapport: 8,
                    exploration: 6,
                    empathy: 9,
                    speed: 0.9,
                })
                .await?;
            created.push(lisa);
        }

        if !has("Bob") {
            let bob = self
                .store
                .create_interviewer(NewInterviewer {
                    user_id: user_id.to_string(),
                    org_id: org_id.map(String::from),
                    name: "Bob".to_string(),
                    description: "Professional technical interviewer for advanced candidates"
                        .to_string(),
                    personality: "Direct and thorough, focuses on technical competency"
                        .to_string(),
                    expertise: vec![
                        "Technical Questions".to_string(),
                        "System Design".to_string(),
                        "Problem Solving".to_string(),
                        "Coding".to_string(),
                    ],
                    avatar_url: None,
                    agent_id: Some(format!("agent_bob_{}", now)),
                    rapport: 6,
                    exploration: 8,
                    empathy: 5,
                    speed: 1.1,
                })
                .await?;
            created.push(bob);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn default_personas_are_created_once() {
        let store = Arc::new(MemoryStore::new());
        let service = InterviewerService::new(store);

        let first = service.create_defaults("user_1", None).await.unwrap();
        assert_eq!(first.len(), 2);
        let names: Vec<_> = first.iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"Lisa"));
        assert!(names.contains(&"Bob"));

        let second = service.create_defaults("user_1", None).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn defaults_are_per_user() {
        let store = Arc::new(MemoryStore::new());
        let service = InterviewerService::new(store);

        service.create_defaults("user_1", None).await.unwrap();
        let other = service.create_defaults("user_2", None).await.unwrap();
        assert_eq!(other.len(), 2);
    }
}
