//! The gating HTTP service implementing hyper's `Service` trait.
//!
//! [`SignatureGateService`] ties together body collection, signed request
//! extraction, signature validation and handler dispatch:
//!
//! 1. Health check interception (`GET /health`)
//! 2. Request body collection
//! 3. Signed request extraction
//! 4. Signature validation (every failure is rejected with `deny_status`)
//! 5. Dispatch of the unchanged request to the [`WebhookHandler`]
//! 6. Common response headers (`x-request-id`, `Server`)

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use hookgate_auth::{RequestValidator, Secret};
use http_body_util::BodyExt;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::body::GateResponseBody;
use crate::extract::extract_signed_request;
use crate::handler::WebhookHandler;

/// Configuration for the gate service.
#[derive(Debug, Clone)]
pub struct GateHttpConfig {
    /// Shared secret. When `None` every request is rejected.
    pub secret: Option<Secret>,
    /// Substring removed from the request URL before signing.
    pub remove_url_part: Option<String>,
    /// Scheme used to rebuild URLs of origin-form requests.
    pub url_scheme: String,
    /// Status returned for requests that fail validation.
    pub deny_status: http::StatusCode,
}

impl Default for GateHttpConfig {
    fn default() -> Self {
        Self {
            secret: None,
            remove_url_part: None,
            url_scheme: "https".to_owned(),
            deny_status: http::StatusCode::FORBIDDEN,
        }
    }
}

/// The gate service that implements hyper's `Service` trait.
///
/// # Type Parameters
///
/// - `H`: The application handler implementing [`WebhookHandler`].
pub struct SignatureGateService<H: WebhookHandler> {
    handler: Arc<H>,
    validator: Arc<RequestValidator>,
    config: Arc<GateHttpConfig>,
}

impl<H: WebhookHandler> fmt::Debug for SignatureGateService<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureGateService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<H: WebhookHandler> SignatureGateService<H> {
    /// Create a new gate service with the given handler and configuration.
    #[must_use]
    pub fn new(handler: H, config: GateHttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a new gate service from an `Arc<H>` handler and configuration.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: GateHttpConfig) -> Self {
        if config.secret.as_ref().is_none_or(Secret::is_empty) {
            warn!("no shared secret configured, every webhook request will be rejected");
        }
        let validator = RequestValidator::new(config.secret.clone().unwrap_or_default());
        Self {
            handler,
            validator: Arc::new(validator),
            config: Arc::new(config),
        }
    }
}

impl<H: WebhookHandler> Clone for SignatureGateService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            validator: Arc::clone(&self.validator),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> Service<http::Request<B>> for SignatureGateService<H>
where
    H: WebhookHandler,
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display + Send,
{
    type Response = http::Response<GateResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let validator = Arc::clone(&self.validator);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();

            let response =
                process_request(req, handler.as_ref(), &validator, &config, &request_id).await;

            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process an incoming HTTP request through the gate.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    validator: &RequestValidator,
    config: &GateHttpConfig,
    request_id: &str,
) -> http::Response<GateResponseBody>
where
    H: WebhookHandler,
    B: http_body::Body,
    B::Error: fmt::Display,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing webhook request");

    // 1. Health check interception.
    if method == http::Method::GET && uri.path() == "/health" {
        return health_check_response();
    }

    // 2. Collect body.
    let (parts, incoming) = req.into_parts();
    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return status_response(http::StatusCode::BAD_REQUEST);
        }
    };

    // 3. Extract what the sender signed.
    let extracted = match extract_signed_request(
        &parts,
        &body,
        &config.url_scheme,
        config.remove_url_part.as_deref(),
    ) {
        Ok(extracted) => extracted,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "rejected webhook request");
            return status_response(config.deny_status);
        }
    };

    // 4. Validate the signature.
    let signature = extracted.signature.as_deref().unwrap_or_default();
    if let Err(err) = validator.validate(&extracted.request, signature) {
        warn!(
            %method,
            url = %extracted.request.url(),
            error = %err,
            request_id,
            "rejected webhook request"
        );
        return status_response(config.deny_status);
    }

    info!(
        %method,
        url = %extracted.request.url(),
        parameters = extracted.request.parameters().len(),
        request_id,
        "verified webhook request"
    );

    // 5. Dispatch to handler.
    handler.handle(parts, body).await
}

/// Produce a health check response.
fn health_check_response() -> http::Response<GateResponseBody> {
    let mut response = http::Response::new(GateResponseBody::from_bytes(Bytes::from_static(
        br#"{"status":"running"}"#,
    )));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

/// Produce an empty response with the given status.
fn status_response(status: http::StatusCode) -> http::Response<GateResponseBody> {
    let mut response = http::Response::new(GateResponseBody::empty());
    *response.status_mut() = status;
    response
}

/// Add headers common to every gate response.
fn add_common_headers(
    mut response: http::Response<GateResponseBody>,
    request_id: &str,
) -> http::Response<GateResponseBody> {
    let headers = response.headers_mut();
    if let Ok(value) = http::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", value);
    }
    headers.insert(
        http::header::SERVER,
        http::HeaderValue::from_static("HookGate"),
    );
    response
}
