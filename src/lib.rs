//! Payment provider settings library

// Public modules
pub mod config;
pub mod error;
pub mod health;
pub mod logging;

// Re-export commonly used types
pub use config::Settings;
pub use error::ConfigError;
