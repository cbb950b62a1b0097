//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` variants into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use motionbridge_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(motionbridge::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(motionbridge::no_config),
        help("Pass --config <FILE> or create one at: {path}")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(motionbridge::config),
        help("Check the config file syntax and MOTIONBRIDGE_* environment variables.")
    )]
    Config(Box<ConfigError>),

    // ── Serialization ────────────────────────────────────────────────
    #[error("Failed to render output: {0}")]
    #[diagnostic(code(motionbridge::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::NoConfig { .. } => exit_code::NOT_FOUND,
            Self::Config(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => CliError::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other @ ConfigError::Figment(_) => CliError::Config(Box::new(other)),
        }
    }
}
