//! Application handler boundary.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::body::GateResponseBody;

/// Trait that the application behind the gate must implement.
///
/// Only requests whose signature has been verified reach the handler. It
/// receives the original request parts and the collected body unchanged.
///
/// # Object Safety
///
/// The returned future is boxed so the trait can be used behind
/// `Arc<dyn WebhookHandler>`.
pub trait WebhookHandler: Send + Sync + 'static {
    /// Handle a verified webhook request and produce an HTTP response.
    fn handle(
        &self,
        parts: http::request::Parts,
        body: Bytes,
    ) -> Pin<Box<dyn Future<Output = http::Response<GateResponseBody>> + Send>>;
}
