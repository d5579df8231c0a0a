//! Payment Settings
//!
//! Loads Stripe and PayPal credentials once at startup and runs the
//! verification check. Exits non-zero when the configuration is incomplete.

use anyhow::{Context, Result};
use clap::Parser;
use payment_settings::{
    config::{Overrides, PaypalMode, Settings, DEFAULT_ENV_FILE},
    health,
    logging::{init_tracing, LogFormat},
};
use std::path::PathBuf;

/// Payment Settings
///
/// Validates payment provider credentials from the environment.
#[derive(Parser, Debug)]
#[command(name = "payment-settings")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fallback environment file for variables not set in the environment
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Log level: trace, debug, info, warn, error (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// PayPal environment (overrides PAYPAL_MODE)
    #[arg(long, value_enum)]
    paypal_mode: Option<PaypalMode>,

    /// Print the loaded settings, secrets omitted, as JSON
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_format);

    let overrides = Overrides {
        paypal_mode: args.paypal_mode,
    };

    let settings = Settings::load_with_overrides(&args.env_file, overrides).with_context(|| {
        format!(
            "Failed to load payment settings (env file: {})",
            args.env_file.display()
        )
    })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        paypal_mode = %settings.paypal().mode(),
        paypal_api = settings.paypal().mode().api_base_url(),
        "Payment settings loaded"
    );

    if args.print_config {
        let json = serde_json::to_string_pretty(&settings).context("Failed to serialize settings")?;
        println!("{}", json);
    }

    if !health::verify() {
        anyhow::bail!("Verification failed");
    }

    Ok(())
}
