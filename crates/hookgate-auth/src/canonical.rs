//! Canonical string construction for webhook request signatures.
//!
//! The signed string is the request URL followed by every form parameter,
//! sorted by name, with each name immediately followed by its value:
//!
//! ```text
//! https://example.com/hook?x=1 + Body + hello + From + +15551234567
//! ```
//!
//! No delimiters are inserted anywhere. Query string parameters are part of
//! the URL and are never repeated in the parameter list.

use std::collections::BTreeMap;

use crate::query::{QueryMap, parse_query_string};

/// Form parameters keyed by name. `BTreeMap` keeps the keys in byte order,
/// which is the order they are signed in.
pub type Parameters = BTreeMap<String, Option<String>>;

/// Remove every occurrence of `remove_part` from `raw_url`.
///
/// Used when the server sits behind a reverse proxy and the URL it observes
/// differs from the one the sender signed. An absent or empty `remove_part`
/// leaves the URL unchanged. No other normalization is applied.
///
/// # Examples
///
/// ```
/// use hookgate_auth::build_effective_url;
///
/// assert_eq!(build_effective_url("https://host/proxy/hook", Some("/proxy")), "https://host/hook");
/// assert_eq!(build_effective_url("https://host/hook", None), "https://host/hook");
/// ```
#[must_use]
pub fn build_effective_url(raw_url: &str, remove_part: Option<&str>) -> String {
    match remove_part {
        Some(part) if !part.is_empty() => raw_url.replace(part, ""),
        _ => raw_url.to_owned(),
    }
}

/// Build the canonical string: `url` followed by each key and its value.
///
/// # Examples
///
/// ```
/// use hookgate_auth::{Parameters, canonicalize};
///
/// let mut params = Parameters::new();
/// params.insert("From".to_owned(), Some("+15551234567".to_owned()));
/// params.insert("Body".to_owned(), Some("hello".to_owned()));
///
/// assert_eq!(
///     canonicalize("https://example.com/hook", &params),
///     "https://example.com/hookBodyhelloFrom+15551234567"
/// );
/// ```
#[must_use]
pub fn canonicalize(url: &str, parameters: &Parameters) -> String {
    let capacity = url.len()
        + parameters
            .iter()
            .map(|(k, v)| k.len() + v.as_ref().map_or(0, String::len))
            .sum::<usize>();

    let mut canonical = String::with_capacity(capacity);
    canonical.push_str(url);
    for (key, value) in parameters {
        canonical.push_str(key);
        if let Some(value) = value {
            canonical.push_str(value);
        }
    }
    canonical
}

/// A request as seen by the signature check: the signed URL and its form
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedRequest {
    url: String,
    parameters: Parameters,
}

impl SignedRequest {
    /// Create a request for `url` with no parameters.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            parameters: Parameters::new(),
        }
    }

    /// Assemble a request from the pieces an HTTP server observes.
    ///
    /// 1. `remove_url_part` is stripped from `request_url` (scheme, host and path).
    /// 2. A present query string is appended as `?query`, even when empty.
    /// 3. Form parameters whose name also appears in the query string are
    ///    skipped. For repeated names the last value wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use hookgate_auth::SignedRequest;
    ///
    /// let request = SignedRequest::from_components(
    ///     "https://host/proxy/hook",
    ///     Some("id=7"),
    ///     vec![("id".to_owned(), "7".to_owned()), ("Body".to_owned(), "hi".to_owned())],
    ///     Some("/proxy"),
    /// );
    /// assert_eq!(request.url(), "https://host/hook?id=7");
    /// assert_eq!(request.canonical_string(), "https://host/hook?id=7Bodyhi");
    /// ```
    #[must_use]
    pub fn from_components(
        request_url: &str,
        query: Option<&str>,
        form: impl IntoIterator<Item = (String, String)>,
        remove_url_part: Option<&str>,
    ) -> Self {
        let mut url = build_effective_url(request_url, remove_url_part);
        let query_map = match query {
            Some(query) => {
                url.push('?');
                url.push_str(query);
                parse_query_string(query)
            }
            None => QueryMap::new(),
        };

        let mut request = Self::new(url);
        for (key, value) in form {
            request.insert(key, Some(value));
        }
        request.exclude_query_keys(&query_map);
        request
    }

    /// Add a parameter, consuming and returning the request.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    /// Set a parameter, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.parameters.insert(key.into(), value);
    }

    /// Drop every parameter whose name appears in `query`.
    pub fn exclude_query_keys(&mut self, query: &QueryMap) {
        if !query.is_empty() {
            self.parameters.retain(|key, _| !query.contains_key(key));
        }
    }

    /// The signed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The form parameters in signing order.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The exact string the sender signed.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        canonicalize(&self.url, &self.parameters)
    }
}
