pub mod interview;
pub mod interviewer;
pub mod response;
pub mod session;
