pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod llm;
pub mod prompts;
pub mod server;
pub mod services;
pub mod store;
pub mod types;
pub mod utils;
pub mod voice;
pub mod wizard;

// Re-export commonly used types
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use server::create_router;
pub use services::ServiceContext;
