//! Default handler for verified webhook requests.
//!
//! The gate itself carries no business logic; this handler acknowledges each
//! verified request with an empty TwiML document so the sender considers the
//! delivery successful.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use hookgate_http::{GateResponseBody, WebhookHandler};
use tracing::info;

/// Empty TwiML reply: "received, nothing to do".
const EMPTY_TWIML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

/// Acknowledges every verified webhook request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcknowledgeHandler;

impl WebhookHandler for AcknowledgeHandler {
    fn handle(
        &self,
        parts: http::request::Parts,
        body: Bytes,
    ) -> Pin<Box<dyn Future<Output = http::Response<GateResponseBody>> + Send>> {
        Box::pin(async move {
            info!(
                method = %parts.method,
                path = parts.uri.path(),
                body_len = body.len(),
                "acknowledging webhook"
            );

            let mut response = http::Response::new(GateResponseBody::from_string(EMPTY_TWIML));
            response.headers_mut().insert(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("text/xml"),
            );
            response
        })
    }
}
