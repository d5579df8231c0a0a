//! Payment provider settings
//!
//! This module binds the Stripe and PayPal credentials the application needs
//! to typed settings. Values come from the process environment, with an
//! optional `.env` file filling in any variable the environment leaves unset.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
pub const STRIPE_PUBLISHABLE_KEY: &str = "STRIPE_PUBLISHABLE_KEY";
pub const PAYPAL_CLIENT_ID: &str = "PAYPAL_CLIENT_ID";
pub const PAYPAL_CLIENT_SECRET: &str = "PAYPAL_CLIENT_SECRET";
pub const PAYPAL_MODE: &str = "PAYPAL_MODE";

/// Variables that must be set, in the order they are checked
pub const REQUIRED_KEYS: [&str; 4] = [
    STRIPE_SECRET_KEY,
    STRIPE_PUBLISHABLE_KEY,
    PAYPAL_CLIENT_ID,
    PAYPAL_CLIENT_SECRET,
];

/// Default fallback environment file
pub const DEFAULT_ENV_FILE: &str = ".env";

const REDACTED: &str = "[REDACTED]";

/// PayPal environment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaypalMode {
    #[default]
    Sandbox,
    Live,
}

impl PaypalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaypalMode::Sandbox => "sandbox",
            PaypalMode::Live => "live",
        }
    }

    pub fn is_live(&self) -> bool {
        *self == PaypalMode::Live
    }

    /// REST API host for this environment
    pub fn api_base_url(&self) -> &'static str {
        match self {
            PaypalMode::Sandbox => "https://api-m.sandbox.paypal.com",
            PaypalMode::Live => "https://api-m.paypal.com",
        }
    }
}

impl fmt::Display for PaypalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaypalMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(PaypalMode::Sandbox),
            "live" => Ok(PaypalMode::Live),
            _ => Err(ConfigError::InvalidField {
                key: PAYPAL_MODE,
                value: s.to_string(),
                expected: "sandbox or live",
            }),
        }
    }
}

/// Values supplied on the command line, applied above every other source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub paypal_mode: Option<PaypalMode>,
}

impl Overrides {
    fn into_pairs(self) -> Vec<(String, String)> {
        self.paypal_mode
            .map(|mode| (PAYPAL_MODE.to_string(), mode.to_string()))
            .into_iter()
            .collect()
    }
}

/// Stripe API keys
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct StripeConfig {
    #[serde(skip_serializing)]
    secret_key: String,
    publishable_key: String,
}

impl StripeConfig {
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &REDACTED)
            .field("publishable_key", &self.publishable_key)
            .finish()
    }
}

/// PayPal REST app credentials
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PaypalConfig {
    client_id: String,
    #[serde(skip_serializing)]
    client_secret: String,
    mode: PaypalMode,
}

impl PaypalConfig {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn mode(&self) -> PaypalMode {
        self.mode
    }
}

impl fmt::Debug for PaypalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaypalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Main application settings
///
/// Built once at startup and handed to whatever needs it. There are no
/// setters; a new environment means a new `Settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    stripe: StripeConfig,
    paypal: PaypalConfig,
}

impl Settings {
    /// Load settings from the process environment and `./.env`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_ENV_FILE)
    }

    /// Load settings from the process environment, falling back to `env_file`
    pub fn load_from(env_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_overrides(env_file, Overrides::default())
    }

    /// Like [`Settings::load_from`], with command-line overrides on top
    pub fn load_with_overrides(
        env_file: impl AsRef<Path>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        Self::from_sources_with_overrides(Some(env_file.as_ref()), process_env()?, overrides)
    }

    /// Merge an optional env file with explicit environment pairs
    ///
    /// Pairs from `process_env` win over values read from the file. The
    /// file is parsed, never loaded into the process environment.
    pub fn from_sources<I>(env_file: Option<&Path>, process_env: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::from_sources_with_overrides(env_file, process_env, Overrides::default())
    }

    /// Merge env file, environment pairs and overrides, lowest to highest precedence
    pub fn from_sources_with_overrides<I>(
        env_file: Option<&Path>,
        process_env: I,
        overrides: Overrides,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars = match env_file {
            Some(path) => read_env_file(path)?,
            None => HashMap::new(),
        };
        let file_count = vars.len();
        vars.extend(process_env);
        vars.extend(overrides.into_pairs());

        tracing::debug!(
            env_file = ?env_file.map(Path::display),
            file_vars = file_count,
            total_vars = vars.len(),
            "Resolved configuration sources"
        );

        let settings = Self::from_map(&vars)?;
        settings.validate();

        Ok(settings)
    }

    /// Build settings from a key/value mapping
    ///
    /// Touches no process state and emits no log records.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let stripe = StripeConfig {
            secret_key: required(vars, STRIPE_SECRET_KEY)?,
            publishable_key: required(vars, STRIPE_PUBLISHABLE_KEY)?,
        };

        let paypal = PaypalConfig {
            client_id: required(vars, PAYPAL_CLIENT_ID)?,
            client_secret: required(vars, PAYPAL_CLIENT_SECRET)?,
            mode: match optional(vars, PAYPAL_MODE) {
                Some(value) => value.parse()?,
                None => PaypalMode::default(),
            },
        };

        Ok(Self { stripe, paypal })
    }

    /// Log any suspicious-but-usable credential combinations
    fn validate(&self) {
        for warning in self.warnings() {
            tracing::warn!(paypal_mode = %self.paypal.mode, "{}", warning);
        }
    }

    /// Consistency checks that do not prevent startup
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !has_prefix(&self.stripe.secret_key, &["sk_", "rk_"]) {
            warnings.push(format!(
                "{} does not look like a Stripe secret key (expected sk_ or rk_ prefix)",
                STRIPE_SECRET_KEY
            ));
        }
        if !has_prefix(&self.stripe.publishable_key, &["pk_"]) {
            warnings.push(format!(
                "{} does not look like a Stripe publishable key (expected pk_ prefix)",
                STRIPE_PUBLISHABLE_KEY
            ));
        }

        let secret_live = stripe_key_is_live(&self.stripe.secret_key);
        let publishable_live = stripe_key_is_live(&self.stripe.publishable_key);

        if let (Some(secret), Some(publishable)) = (secret_live, publishable_live) {
            if secret != publishable {
                warnings.push(
                    "Stripe secret and publishable keys belong to different environments"
                        .to_string(),
                );
            }
        }

        if let Some(stripe_live) = secret_live.or(publishable_live) {
            if stripe_live != self.paypal.mode.is_live() {
                warnings.push(format!(
                    "Stripe keys are {} keys but PayPal is in {} mode",
                    if stripe_live { "live" } else { "test" },
                    self.paypal.mode
                ));
            }
        }

        warnings
    }

    pub fn stripe(&self) -> &StripeConfig {
        &self.stripe
    }

    pub fn paypal(&self) -> &PaypalConfig {
        &self.paypal
    }

    /// Check if PayPal is pointed at the live environment
    pub fn is_live(&self) -> bool {
        self.paypal.mode.is_live()
    }
}

/// Read the variables this crate cares about from the process environment
///
/// A variable that is set but not valid Unicode is an error rather than
/// absent, so it can never fall through to the env file.
pub fn process_env() -> Result<Vec<(String, String)>, ConfigError> {
    let mut pairs = Vec::new();
    for key in REQUIRED_KEYS.into_iter().chain(std::iter::once(PAYPAL_MODE)) {
        if let Some(pair) = env_pair(key, env::var_os(key))? {
            pairs.push(pair);
        }
    }
    Ok(pairs)
}

fn env_pair(
    key: &'static str,
    value: Option<OsString>,
) -> Result<Option<(String, String)>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => value
            .into_string()
            .map(|value| Some((key.to_string(), value)))
            .map_err(|raw| ConfigError::InvalidField {
                key,
                value: raw.to_string_lossy().into_owned(),
                expected: "valid Unicode",
            }),
    }
}

/// Parse an env file into a map; a missing file yields an empty map
fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => {
            tracing::debug!(path = %path.display(), "Environment file not found, skipping");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    iter.map(|item| {
        item.map_err(|source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        })
    })
    .collect()
}

fn optional<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn required(vars: &HashMap<String, String>, key: &'static str) -> Result<String, ConfigError> {
    optional(vars, key)
        .map(str::to_string)
        .ok_or(ConfigError::MissingField { key })
}

fn has_prefix(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| value.starts_with(prefix))
}

/// `Some(true)` for live keys, `Some(false)` for test keys
fn stripe_key_is_live(key: &str) -> Option<bool> {
    if key.contains("_live_") {
        Some(true)
    } else if key.contains("_test_") {
        Some(false)
    } else {
        None
    }
}
