pub mod analytics;
pub mod call;
pub mod feedback;
pub mod health;
pub mod insights;
pub mod interview;
pub mod interviewer;
pub mod questions;
pub mod scoring;
pub mod session;
pub mod webhook;
