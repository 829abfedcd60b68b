//! Signed request extraction from HTTP request parts.
//!
//! Rebuilds what the sender signed from what the server observes:
//!
//! - the request URL (`scheme://host/path`), with the configured substring
//!   removed and the raw query string appended,
//! - the form-body parameters, minus any name that is also a query key,
//! - the `X-Twilio-Signature` header.

use bytes::Bytes;
use hookgate_auth::{SIGNATURE_HEADER, SignedRequest, ValidationError};

/// A request ready for signature validation.
#[derive(Debug, Clone)]
pub struct ExtractedRequest {
    /// URL and form parameters as signed by the sender.
    pub request: SignedRequest,
    /// The provided signature, if the header was present and readable.
    pub signature: Option<String>,
}

/// Extract the signed request from the request parts and collected body.
///
/// `default_scheme` is used when the request line carries only a path, which
/// is the normal case for HTTP/1.1 origin-form requests.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidUrl`] if neither the request URI nor the
/// `Host` header names the authority.
pub fn extract_signed_request(
    parts: &http::request::Parts,
    body: &Bytes,
    default_scheme: &str,
    remove_url_part: Option<&str>,
) -> Result<ExtractedRequest, ValidationError> {
    let url = request_url(parts, default_scheme).ok_or(ValidationError::InvalidUrl)?;
    let request = SignedRequest::from_components(
        &url,
        parts.uri.query(),
        form_parameters(parts, body),
        remove_url_part,
    );

    Ok(ExtractedRequest {
        request,
        signature: signature_header(parts).map(ToOwned::to_owned),
    })
}

/// Rebuild `scheme://authority/path` without the query string.
#[must_use]
pub fn request_url(parts: &http::request::Parts, default_scheme: &str) -> Option<String> {
    let scheme = parts.uri.scheme_str().unwrap_or(default_scheme);
    let authority = match parts.uri.authority() {
        Some(authority) => authority.as_str(),
        None => parts
            .headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())?,
    };
    Some(format!("{scheme}://{authority}{}", parts.uri.path()))
}

/// Decode the body as form parameters when the content type says so.
///
/// Any other content type yields no parameters; only the URL is signed then.
#[must_use]
pub fn form_parameters(parts: &http::request::Parts, body: &Bytes) -> Vec<(String, String)> {
    if !is_form_encoded(parts) {
        return Vec::new();
    }
    form_urlencoded::parse(body).into_owned().collect()
}

/// The signature header value, if present and valid UTF-8.
#[must_use]
pub fn signature_header(parts: &http::request::Parts) -> Option<&str> {
    parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
}

fn is_form_encoded(parts: &http::request::Parts) -> bool {
    parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
}
