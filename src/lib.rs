pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use reqwest::Client;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{
    analytics_service::AnalyticsService, call_events::CallEventService,
    call_service::CallService, groq_service::GroqAnalyzer, groq_service::ResponseAnalyzer,
    interview_service::InterviewService, interviewer_service::InterviewerService,
    session_service::SessionService,
};
use crate::store::{PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub session_service: SessionService,
    pub interview_service: InterviewService,
    pub interviewer_service: InterviewerService,
    pub analytics_service: AnalyticsService,
    pub call_service: CallService,
    pub call_event_service: CallEventService,
    pub analyzer: Arc<dyn ResponseAnalyzer>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        let analyzer = Arc::new(GroqAnalyzer::new(
            config.groq_api_key.clone(),
            config.groq_model.clone(),
            http_client,
        ));
        Self::with_store(Arc::new(PgStore::new(pool)), analyzer)
    }

    /// Assemble the state around any store/analyzer pair. Used for the
    /// in-memory fallback and by the test suites.
    pub fn with_store(store: Arc<dyn Store>, analyzer: Arc<dyn ResponseAnalyzer>) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        let call_service = CallService::new(
            config.voice_api_key.clone(),
            config.voice_api_url.clone(),
            config.public_base_url.clone(),
            http_client,
        );

        Self {
            session_service: SessionService::new(store.clone(), analyzer.clone()),
            interview_service: InterviewService::new(store.clone()),
            interviewer_service: InterviewerService::new(store.clone()),
            analytics_service: AnalyticsService::new(store.clone()),
            call_event_service: CallEventService::new(store.clone(), call_service.clone()),
            call_service,
            analyzer,
            store,
        }
    }
}

/// Build the full application router. Shared between `main` and the router
/// tests so both exercise the same middleware stack.
pub fn app(state: AppState) -> Router {
    let config = crate::config::get_config();

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route(
            "/api/interviews",
            get(routes::interview::list_interviews).post(routes::interview::create_interview),
        )
        .route(
            "/api/interviews/:id",
            get(routes::interview::get_interview).patch(routes::interview::update_interview),
        )
        .route(
            "/api/interviewers",
            get(routes::interviewer::list_interviewers)
                .post(routes::interviewer::create_interviewer),
        )
        .route(
            "/api/interviewers/defaults",
            post(routes::interviewer::create_default_interviewers),
        )
        .route(
            "/api/interview-session",
            get(routes::session::get_sessions).post(routes::session::session_action),
        )
        .route(
            "/api/scoring",
            get(routes::scoring::get_scores).post(routes::scoring::score_response),
        )
        .route("/api/register-call", post(routes::call::register_call))
        .route("/api/get-call", post(routes::call::get_call))
        .route(
            "/api/generate-questions",
            post(routes::questions::generate_questions),
        )
        .route(
            "/api/generate-insights",
            post(routes::insights::generate_insights),
        )
        .route(
            "/api/analyze-communication",
            post(routes::insights::analyze_communication),
        )
        .route("/api/analytics", get(routes::analytics::get_analytics))
        .route("/api/feedback", post(routes::feedback::submit_feedback))
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.api_rps),
            middleware::rate_limit::rps_middleware,
        ));

    // No bearer auth here: the webhook is signature-verified and the slug
    // lookup serves unauthenticated candidates.
    let public = Router::new()
        .route(
            "/api/response-webhook",
            post(routes::webhook::handle_call_event),
        )
        .route(
            "/api/public/interviews/:slug",
            get(routes::interview::get_interview_by_slug),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    base_routes
        .merge(api)
        .merge(public)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
