pub mod call_dto;
pub mod insights_dto;
pub mod interview_dto;
pub mod interviewer_dto;
pub mod scoring_dto;
pub mod session_dto;
pub mod webhook_dto;
