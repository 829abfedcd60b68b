//! Opaque wrapper for the shared signing secret.

use std::fmt;

/// The shared secret used to key the request signature.
///
/// The value is only reachable through [`Secret::expose`]; `Debug` output is
/// redacted so the secret cannot end up in logs by accident.
///
/// # Examples
///
/// ```
/// use hookgate_auth::Secret;
///
/// let secret = Secret::from("12345");
/// assert_eq!(secret.expose(), "12345");
/// assert_eq!(format!("{secret:?}"), "Secret(***)");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty, i.e. effectively unconfigured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
