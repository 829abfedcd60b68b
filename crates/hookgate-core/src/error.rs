//! Error types for the HookGate core.

/// Core error type for HookGate infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum HookGateError {
    /// The configured URL scheme is not `http` or `https`.
    #[error("invalid URL scheme: {0} (must be http or https)")]
    InvalidScheme(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for HookGate operations.
pub type HookGateResult<T> = Result<T, HookGateError>;
