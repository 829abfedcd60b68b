//! HTTP request gate for HookGate.
//!
//! This crate wraps an application [`WebhookHandler`] in a hyper
//! [`Service`](hyper::service::Service) that verifies the sender's signature
//! before the handler ever sees the request:
//!
//! 1. Health check interception (`GET /health`)
//! 2. Request body collection
//! 3. Signed request extraction (URL, query string, form parameters, signature header)
//! 4. Signature validation via [`hookgate_auth::RequestValidator`]
//! 5. Rejection with `403 Forbidden`, or dispatch of the unchanged request to the handler
//!
//! # Modules
//!
//! - [`body`] - Response body type
//! - [`extract`] - Signed request extraction from HTTP request parts
//! - [`handler`] - Application handler trait
//! - [`service`] - The gating hyper service

pub mod body;
pub mod extract;
pub mod handler;
pub mod service;

pub use body::GateResponseBody;
pub use handler::WebhookHandler;
pub use service::{GateHttpConfig, SignatureGateService};
