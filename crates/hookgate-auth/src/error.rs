//! Error types for webhook signature validation.
//!
//! Every variant of [`ValidationError`] is a rejection: the boolean entry
//! points collapse all of them to `false`.

/// Reasons a webhook request fails signature validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No shared secret is configured.
    #[error("Missing shared secret")]
    MissingCredential,

    /// The request carried no signature.
    #[error("Missing request signature")]
    MissingSignature,

    /// The request URL is empty.
    #[error("Invalid request URL")]
    InvalidUrl,

    /// The keyed hash could not be computed with the configured secret.
    #[error("Signature computation failed: {0}")]
    HashComputation(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureMismatch,
}
