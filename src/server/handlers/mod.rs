//! REST endpoint handlers

pub mod analysis;
pub mod interviewers;
pub mod interviews;
pub mod outline;
pub mod status;
