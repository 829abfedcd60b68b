//! Constant-time signature comparison.
//!
//! A length mismatch returns early: signature length is fixed by the protocol
//! and reveals nothing about the secret. For equal lengths every byte is
//! compared and folded into a [`subtle::Choice`], so the work done does not
//! depend on where the inputs first differ.

use subtle::{Choice, ConstantTimeEq};

/// Compare two signatures without short-circuiting on the first mismatch.
///
/// # Examples
///
/// ```
/// use hookgate_auth::constant_time_eq;
///
/// assert!(constant_time_eq("abc=", "abc="));
/// assert!(!constant_time_eq("abc=", "abd="));
/// assert!(!constant_time_eq("abc=", "abc"));
/// ```
#[must_use]
pub fn constant_time_eq(expected: &str, provided: &str) -> bool {
    compare_observed(expected.as_bytes(), provided.as_bytes(), |_| {})
}

/// Byte-wise comparison that reports each visited position to `visit`.
fn compare_observed(a: &[u8], b: &[u8], mut visit: impl FnMut(usize)) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut equal = Choice::from(1u8);
    for (position, (x, y)) in a.iter().zip(b).enumerate() {
        visit(position);
        equal &= x.ct_eq(y);
    }
    equal.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_identical_strings() {
        assert!(constant_time_eq("", ""));
        assert!(constant_time_eq(
            "RSOYDt4T1cUTdK1PDd93/VVr8B8=",
            "RSOYDt4T1cUTdK1PDd93/VVr8B8="
        ));
    }

    #[test]
    fn test_should_reject_different_lengths() {
        assert!(!constant_time_eq("abcd", "abc"));
        assert!(!constant_time_eq("", "a"));
    }

    #[test]
    fn test_should_reject_single_byte_difference() {
        assert!(!constant_time_eq("abcd", "abce"));
        assert!(!constant_time_eq("abcd", "xbcd"));
    }

    #[test]
    fn test_should_visit_every_position_when_last_byte_differs() {
        let mut visited = Vec::new();
        let equal = compare_observed(b"abcdef", b"abcdeg", |i| visited.push(i));
        assert!(!equal);
        assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_should_visit_every_position_when_first_byte_differs() {
        let mut visited = 0;
        let equal = compare_observed(b"xbcdef", b"abcdef", |_| visited += 1);
        assert!(!equal);
        assert_eq!(visited, 6);
    }

    #[test]
    fn test_should_not_visit_positions_on_length_mismatch() {
        let mut visited = 0;
        assert!(!compare_observed(b"abc", b"abcd", |_| visited += 1));
        assert_eq!(visited, 0);
    }
}
