pub mod aggregator;
pub mod analytics_service;
pub mod call_events;
pub mod call_service;
pub mod groq_service;
pub mod interview_service;
pub mod interviewer_service;
pub mod session_service;
