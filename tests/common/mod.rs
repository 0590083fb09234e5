use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use interview_backend::config::init_config;
use interview_backend::middleware::auth::Claims;
use interview_backend::services::groq_service::{
    ResponseAnalyzer, ResponseScoring, SessionInsights,
};
use interview_backend::store::MemoryStore;
use interview_backend::{app, AppState};

pub const JWT_SECRET: &str = "test_jwt_secret";

/// Environment and config are process-wide; every test entry point funnels
/// through here and only the first call wins the OnceLock.
pub fn init_test_config() {
    std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    std::env::set_var("JWT_SECRET", JWT_SECRET);
    std::env::set_var("GROQ_API_KEY", "gsk_test");
    std::env::set_var("VOICE_API_KEY", "key_test");
    // Unroutable on purpose: provider fetches must fail fast, not hang.
    std::env::set_var("VOICE_API_URL", "http://127.0.0.1:9");
    std::env::set_var("PUBLIC_BASE_URL", "http://localhost:3000");
    std::env::set_var("API_RPS", "1000");
    std::env::set_var("PUBLIC_RPS", "1000");
    std::env::remove_var("DATABASE_URL");
    let _ = init_config();
}

/// Scripted analyzer: pops one verdict per call, errors once the script is
/// exhausted. Insights and communication analysis are scripted separately
/// and error unless set.
pub struct StubAnalyzer {
    verdicts: Mutex<VecDeque<ResponseScoring>>,
    insights: Mutex<Option<SessionInsights>>,
    communication: Mutex<Option<Value>>,
}

impl StubAnalyzer {
    pub fn with_verdicts(verdicts: Vec<ResponseScoring>) -> Self {
        Self {
            verdicts: Mutex::new(verdicts.into()),
            insights: Mutex::new(None),
            communication: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self::with_verdicts(Vec::new())
    }

    #[allow(dead_code)]
    pub fn with_insights(self, insights: SessionInsights) -> Self {
        *self.insights.lock().expect("insights poisoned") = Some(insights);
        self
    }

    #[allow(dead_code)]
    pub fn with_communication(self, analysis: Value) -> Self {
        *self.communication.lock().expect("communication poisoned") = Some(analysis);
        self
    }
}

#[async_trait]
impl ResponseAnalyzer for StubAnalyzer {
    async fn analyze<'a>(
        &self,
        _question: &str,
        _answer: &str,
        _context: Option<&'a str>,
    ) -> interview_backend::error::Result<ResponseScoring> {
        self.verdicts
            .lock()
            .expect("verdict queue poisoned")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("analyzer unavailable").into())
    }

    async fn generate_questions<'a>(
        &self,
        _role: &str,
        _objective: &str,
        _count: usize,
        _context: Option<&'a str>,
        _skills: &[String],
    ) -> interview_backend::error::Result<Vec<String>> {
        Err(anyhow::anyhow!("analyzer unavailable").into())
    }

    async fn generate_insights(
        &self,
        _responses: &[interview_backend::models::response::CandidateResponse],
        _overall_score: f64,
    ) -> interview_backend::error::Result<SessionInsights> {
        self.insights
            .lock()
            .expect("insights poisoned")
            .clone()
            .ok_or_else(|| anyhow::anyhow!("analyzer unavailable").into())
    }

    async fn analyze_communication(
        &self,
        _transcript: &str,
    ) -> interview_backend::error::Result<Value> {
        self.communication
            .lock()
            .expect("communication poisoned")
            .clone()
            .ok_or_else(|| anyhow::anyhow!("analyzer unavailable").into())
    }
}

pub fn scoring(score: f64, comm: f64, tech: f64, ps: f64, conf: f64) -> ResponseScoring {
    ResponseScoring {
        score,
        feedback: "Solid answer.".to_string(),
        strengths: vec!["Clear communication".to_string()],
        improvements: vec!["Add more detail".to_string()],
        analysis: interview_backend::models::response::ResponseAnalysis {
            communication_score: comm,
            technical_score: tech,
            problem_solving_score: ps,
            confidence_score: conf,
        },
    }
}

pub fn test_app(analyzer: StubAnalyzer) -> (Router, Arc<MemoryStore>) {
    init_test_config();
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(store.clone(), Arc::new(analyzer));
    (app(state), store)
}

pub fn bearer_token(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        org: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request build");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
