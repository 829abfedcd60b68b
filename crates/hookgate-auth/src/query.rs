//! Best-effort query string parsing.
//!
//! The gate only needs the query string to learn which parameter names belong
//! to the URL rather than to the form body, so parsing is lenient: a pair that
//! cannot be decoded is dropped instead of failing the request.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Query parameters in first-seen key order.
///
/// Each key maps to every value seen for it, in order. A pair without `=`
/// (or with nothing after it) contributes an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, Vec<Option<String>>)>,
}

impl QueryMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`, creating the key at the end if it is new.
    pub fn append(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// All values for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Option<String>]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Whether `key` appears in the query string.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a raw query string (without the leading `?`).
///
/// Pairs are separated by `&` and split on the first `=`. Keys and values are
/// decoded independently using form rules (`+` is a space); bytes that are not
/// valid UTF-8 become U+FFFD. Trailing empty segments are ignored, while an
/// interior empty segment yields the empty key with no value. A pair with an
/// invalid `%` escape is dropped.
///
/// # Examples
///
/// ```
/// use hookgate_auth::parse_query_string;
///
/// let query = parse_query_string("a=1&a=2&flag");
/// assert_eq!(query.get("a"), Some(&[Some("1".to_owned()), Some("2".to_owned())][..]));
/// assert_eq!(query.get("flag"), Some(&[None][..]));
/// ```
#[must_use]
pub fn parse_query_string(query: &str) -> QueryMap {
    let mut map = QueryMap::new();

    let mut segments: Vec<&str> = query.split('&').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    for pair in segments {
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (pair, None),
        };

        let Some(key) = decode_component(raw_key) else {
            continue;
        };
        let value = match raw_value.filter(|v| !v.is_empty()) {
            Some(v) => match decode_component(v) {
                Some(decoded) => Some(decoded),
                None => continue,
            },
            None => None,
        };

        map.append(key, value);
    }

    map
}

/// Decode one form-encoded component, or `None` if it is malformed.
fn decode_component(raw: &str) -> Option<String> {
    if !has_valid_escapes(raw) {
        return None;
    }
    let spaced = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    Some(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
}

/// Check that every `%` is followed by two hex digits.
fn has_valid_escapes(raw: &str) -> bool {
    let mut bytes = raw.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let escape_ok = matches!(
                (bytes.next(), bytes.next()),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            );
            if !escape_ok {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|v| Some((*v).to_owned())).collect()
    }

    #[test]
    fn test_should_parse_simple_pairs() {
        let query = parse_query_string("a=1&b=2");
        assert_eq!(query.len(), 2);
        assert_eq!(query.get("a"), Some(values(&["1"]).as_slice()));
        assert_eq!(query.get("b"), Some(values(&["2"]).as_slice()));
    }

    #[test]
    fn test_should_collect_repeated_keys_in_order() {
        let query = parse_query_string("a=1&a=2");
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("a"), Some(values(&["1", "2"]).as_slice()));
    }

    #[test]
    fn test_should_preserve_first_seen_key_order() {
        let query = parse_query_string("z=1&a=2&m=3&a=4");
        let keys: Vec<&str> = query.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_should_treat_missing_equals_as_absent_value() {
        let query = parse_query_string("flag&a=1");
        assert_eq!(query.get("flag"), Some(&[None][..]));
        assert!(query.contains_key("a"));
    }

    #[test]
    fn test_should_treat_empty_value_as_absent() {
        let query = parse_query_string("a=");
        assert_eq!(query.get("a"), Some(&[None][..]));
    }

    #[test]
    fn test_should_split_on_first_equals_only() {
        let query = parse_query_string("expr=a=b");
        assert_eq!(query.get("expr"), Some(values(&["a=b"]).as_slice()));
    }

    #[test]
    fn test_should_percent_decode_keys_and_values() {
        let query = parse_query_string("first%20name=J%C3%BCrgen&to=%2B1555+0100");
        assert_eq!(query.get("first name"), Some(values(&["Jürgen"]).as_slice()));
        assert_eq!(query.get("to"), Some(values(&["+1555 0100"]).as_slice()));
    }

    #[test]
    fn test_should_drop_malformed_pairs() {
        let query = parse_query_string("good=1&bad=%zz&worse%=2&trunc=%4&tail=3");
        let keys: Vec<&str> = query.keys().collect();
        assert_eq!(keys, vec!["good", "tail"]);
    }

    #[test]
    fn test_should_replace_invalid_utf8_instead_of_dropping() {
        let query = parse_query_string("utf=%FF&%FE=1");
        assert_eq!(query.get("utf"), Some(values(&["\u{FFFD}"]).as_slice()));
        assert!(query.contains_key("\u{FFFD}"));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_should_key_interior_empty_segments_as_empty() {
        let query = parse_query_string("a=1&&b=2&&");
        let keys: Vec<&str> = query.keys().collect();
        assert_eq!(keys, vec!["a", "", "b"]);
        assert_eq!(query.get(""), Some(&[None][..]));
    }

    #[test]
    fn test_should_key_leading_empty_segment_as_empty() {
        let query = parse_query_string("&a=1");
        assert!(query.contains_key(""));
        assert!(query.contains_key("a"));
    }

    #[test]
    fn test_should_return_empty_map_for_empty_query() {
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn test_should_iterate_entries() {
        let query = parse_query_string("a=1&b");
        let collected: Vec<(&str, usize)> = query.iter().map(|(k, v)| (k, v.len())).collect();
        assert_eq!(collected, vec![("a", 1), ("b", 1)]);
    }
}
