//! CLI-specific error types and exit code mapping

use dspm_core::error::DspmError;
use dspm_engine::EngineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The overall risk score reached the `--fail-on-score` threshold.
    #[error("risk score {score} reached threshold {threshold}")]
    RiskThreshold { score: u32, threshold: u32 },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from dspm-core.
    #[error("{0}")]
    Core(#[from] DspmError),

    /// Scan pipeline error from dspm-engine.
    #[error("scan error: {0}")]
    Scan(#[from] EngineError),

    /// PII rule validation error.
    #[error("rule error: {0}")]
    Rule(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command / scan error       |
    /// | 2    | Configuration error                  |
    /// | 4    | Risk score reached the threshold     |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::RiskThreshold { .. } => 4,
            Self::Io(_) => 10,
            Self::Core(DspmError::Config(_)) => 2,
            Self::Core(DspmError::Io(_)) => 10,
            Self::Scan(EngineError::Config { .. }) => 2,
            Self::Scan(EngineError::Io { .. }) => 10,
            Self::JsonSerialize(_)
            | Self::Command(_)
            | Self::Core(_)
            | Self::Scan(_)
            | Self::Rule(_) => 1,
        }
    }
}
