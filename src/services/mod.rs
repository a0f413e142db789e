//! 服务层 - 面向HTTP与CLI的业务操作

pub mod analysis;
pub mod context;
pub mod interviewers;
pub mod interviews;
pub mod outline;
pub mod synthesis;
pub mod task;

pub use context::ServiceContext;

// Include tests
#[cfg(test)]
mod tests;
