//! Configuration management module
//!
//! This module handles loading and validating payment provider credentials
//! from environment variables and .env files.

pub mod settings;

pub use settings::{
    process_env, Overrides, PaypalConfig, PaypalMode, Settings, StripeConfig, DEFAULT_ENV_FILE,
    PAYPAL_MODE,
};
