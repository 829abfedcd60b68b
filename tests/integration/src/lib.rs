//! Integration tests for HookGate server.
//!
//! These tests require a running HookGate server at `localhost:8080` started
//! with a matching auth token and plain-HTTP URL scheme:
//!
//! ```text
//! TWILIO_AUTH_TOKEN=12345 HOOKGATE_URL_SCHEME=http hookgate-server
//! ```
//!
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p hookgate-integration -- --ignored
//! ```

use std::sync::Once;

use hookgate_auth::{SIGNATURE_HEADER, SignedRequest, compute_signature};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("HOOKGATE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Auth token the server was started with.
#[must_use]
pub fn auth_token() -> String {
    std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_else(|_| "12345".to_owned())
}

/// Create an HTTP client for the tests.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Encode form pairs as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Sign `path_and_query` plus `pairs` the way the sender does.
#[must_use]
pub fn sign(path_and_query: &str, pairs: &[(&str, &str)]) -> String {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };
    let url = format!("{}{path}", endpoint_url());
    let request = SignedRequest::from_components(
        &url,
        query,
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
        None,
    );
    compute_signature(&auth_token(), &request.canonical_string())
        .unwrap_or_else(|e| panic!("failed to sign request: {e}"))
}

/// POST a form to the server with an optional signature header.
pub async fn post_form(
    client: &reqwest::Client,
    path_and_query: &str,
    pairs: &[(&str, &str)],
    signature: Option<&str>,
) -> reqwest::Response {
    let mut request = client
        .post(format!("{}{path_and_query}", endpoint_url()))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(encode_form(pairs));
    if let Some(signature) = signature {
        request = request.header(SIGNATURE_HEADER, signature);
    }
    request
        .send()
        .await
        .unwrap_or_else(|e| panic!("request to {path_and_query} failed: {e}"))
}

mod test_gate;
