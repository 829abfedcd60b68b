//! Webhook request signature verification (HMAC-SHA1).
//!
//! The sender signs every request with:
//!
//! ```text
//! Signature = Base64(HMAC-SHA1(Secret, CanonicalString))
//! ```
//!
//! and sends the result in the `X-Twilio-Signature` header. Verification
//! rebuilds the canonical string (see [`crate::canonical`]), recomputes the
//! signature and compares the two with [`constant_time_eq`].
//!
//! All failure modes are reported as [`ValidationError`] by
//! [`RequestValidator::validate`] and collapse to `false` in the boolean
//! entry points. Nothing in this module panics on malformed input.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::debug;

use crate::canonical::{Parameters, SignedRequest, canonicalize};
use crate::compare::constant_time_eq;
use crate::error::ValidationError;
use crate::secret::Secret;

/// Header carrying the sender's signature.
pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

type HmacSha1 = Hmac<Sha1>;

/// Compute the signature: Base64(HMAC-SHA1(secret, data)).
///
/// # Examples
///
/// ```
/// use hookgate_auth::compute_signature;
///
/// // RFC 2202 test case 2.
/// let sig = compute_signature("Jefe", "what do ya want for nothing?").unwrap();
/// assert_eq!(sig, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
/// ```
pub fn compute_signature(secret: &str, data: &str) -> Result<String, ValidationError> {
    let mut mac = <HmacSha1 as KeyInit>::new_from_slice(secret.as_bytes())
        .map_err(|e| ValidationError::HashComputation(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Verify a signature over `url` and `parameters` with `secret`.
///
/// Returns `false` for an empty URL, signature or secret, for a hash
/// failure and for a mismatch.
#[must_use]
pub fn verify(url: &str, parameters: &Parameters, secret: &str, signature: &str) -> bool {
    check(url, parameters, &Secret::from(secret), signature).is_ok()
}

/// Validates webhook requests against a shared secret fixed at construction.
///
/// The validator holds no other state and can be shared freely between
/// threads.
///
/// # Examples
///
/// ```
/// use hookgate_auth::{RequestValidator, SignedRequest, ValidationError};
///
/// let validator = RequestValidator::new("12345");
/// let request = SignedRequest::new("https://example.com/hook").with_parameter("Body", "hello");
///
/// assert_eq!(
///     validator.validate(&request, ""),
///     Err(ValidationError::MissingSignature)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RequestValidator {
    secret: Secret,
}

impl RequestValidator {
    /// Create a validator for the given shared secret.
    ///
    /// An empty secret is accepted here; every validation then fails with
    /// [`ValidationError::MissingCredential`].
    #[must_use]
    pub fn new(secret: impl Into<Secret>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Validate `request` against the provided `signature`.
    pub fn validate(
        &self,
        request: &SignedRequest,
        signature: &str,
    ) -> Result<(), ValidationError> {
        check(request.url(), request.parameters(), &self.secret, signature)
    }

    /// Whether `signature` is valid for `request`.
    #[must_use]
    pub fn is_valid(&self, request: &SignedRequest, signature: &str) -> bool {
        self.validate(request, signature).is_ok()
    }
}

/// Run every validation step, reporting the first rule that fails.
fn check(
    url: &str,
    parameters: &Parameters,
    secret: &Secret,
    signature: &str,
) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::InvalidUrl);
    }
    if signature.is_empty() {
        return Err(ValidationError::MissingSignature);
    }
    if secret.is_empty() {
        return Err(ValidationError::MissingCredential);
    }

    let canonical = canonicalize(url, parameters);
    let expected = compute_signature(secret.expose(), &canonical)?;

    if constant_time_eq(&expected, signature) {
        debug!(url, parameters = parameters.len(), "webhook signature verified");
        Ok(())
    } else {
        debug!(url, parameters = parameters.len(), "webhook signature mismatch");
        Err(ValidationError::SignatureMismatch)
    }
}
