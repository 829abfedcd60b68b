//! Webhook request signature verification for HookGate.
//!
//! This crate verifies that an incoming webhook request was signed by a sender
//! holding the shared secret, following the Twilio request-signing scheme:
//!
//! ```text
//! Signature = Base64(HMAC-SHA1(Secret, URL + Key1 + Value1 + Key2 + Value2 ...))
//! ```
//!
//! where the keys are the form-body parameter names sorted by byte value and
//! the URL is the externally visible request URL including its query string.
//!
//! # Usage
//!
//! ```rust
//! use hookgate_auth::{RequestValidator, SignedRequest, compute_signature};
//!
//! let request = SignedRequest::new("https://example.com/hook")
//!     .with_parameter("From", "+15551234567")
//!     .with_parameter("Body", "hello");
//!
//! let signature = compute_signature("12345", &request.canonical_string()).unwrap();
//!
//! let validator = RequestValidator::new("12345");
//! assert!(validator.is_valid(&request, &signature));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Effective URL and canonical string construction
//! - [`compare`] - Constant-time signature comparison
//! - [`error`] - Validation error types
//! - [`query`] - Best-effort query string parsing
//! - [`secret`] - Opaque shared secret wrapper
//! - [`signature`] - HMAC-SHA1 signature computation and verification

pub mod canonical;
pub mod compare;
pub mod error;
pub mod query;
pub mod secret;
pub mod signature;

pub use canonical::{Parameters, SignedRequest, build_effective_url, canonicalize};
pub use compare::constant_time_eq;
pub use error::ValidationError;
pub use query::{QueryMap, parse_query_string};
pub use secret::Secret;
pub use signature::{RequestValidator, SIGNATURE_HEADER, compute_signature, verify};
