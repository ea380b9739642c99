//! Composite key strings.
//!
//! Resolved keys are canonicalized and joined into one string that sorts and
//! compares like the key itself. Segments are percent-escaped so that the
//! separator can never appear inside a segment: `%` becomes `%25` and every
//! character of the separator is written as `%XX` of its UTF-8 bytes.

use std::borrow::Cow;
use std::fmt::Write;

use super::Keys;

/// Separator used between segments of a composite key.
pub const KEY_SEPARATOR: &str = "||";

/// Whether `separator` can delimit escaped segments.
///
/// Escapes are written as `%` followed by hex digits, so a separator using
/// either could reappear inside an escaped segment.
pub fn is_valid_separator(separator: &str) -> bool {
    !separator.is_empty()
        && !separator
            .chars()
            .any(|c| c == '%' || c.is_ascii_hexdigit())
}

/// Escapes one canonical segment so it cannot contain `separator`.
///
/// The guarantee only holds for separators accepted by
/// [`is_valid_separator`].
pub fn escape_segment<'a>(segment: &'a str, separator: &str) -> Cow<'a, str> {
    let needs_escape = |c: char| c == '%' || separator.contains(c);
    if !segment.contains(needs_escape) {
        return Cow::Borrowed(segment);
    }

    let mut escaped = String::with_capacity(segment.len() + 8);
    for c in segment.chars() {
        if needs_escape(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                // Writing to a String cannot fail.
                let _ = write!(escaped, "%{byte:02X}");
            }
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Joins the canonical, escaped segments of `keys` with `separator`.
pub fn join_keys(keys: &Keys, separator: &str) -> String {
    keys.iter()
        .map(|key| escape_segment(&key.value.canonical_string(), separator).into_owned())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Builds the composite key string of a fully resolved key.
pub fn composite_key(keys: &Keys) -> String {
    join_keys(keys, KEY_SEPARATOR)
}

/// A prefix of a composite key, used for ordered prefix scans.
///
/// Matching is segment-aware: the prefix `ab` matches `ab` and `ab||x` but
/// not `abc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix {
    joined: String,
    segments: usize,
}

impl KeyPrefix {
    /// Builds the prefix from the leading keys of an index.
    pub fn from_keys(keys: &Keys) -> Self {
        Self {
            joined: composite_key(keys),
            segments: keys.len(),
        }
    }

    /// The joined prefix string. Every match starts with it, so it is also
    /// the lower bound for a scan over sorted key strings.
    pub fn as_str(&self) -> &str {
        &self.joined
    }

    /// Number of key segments in the prefix.
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Whether a stored key string shares every segment of this prefix.
    pub fn matches(&self, key_string: &str) -> bool {
        if self.segments == 0 {
            return true;
        }
        match key_string.strip_prefix(self.joined.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(KEY_SEPARATOR),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;
    use chrono::{TimeZone, Utc};

    fn keys(pairs: &[(&str, &str)]) -> Keys {
        pairs.iter().map(|(k, v)| Key::new(*k, *v)).collect()
    }

    #[test]
    fn test_escape_segment_leaves_plain_text_borrowed() {
        assert!(matches!(
            escape_segment("measure1", KEY_SEPARATOR),
            Cow::Borrowed("measure1")
        ));
    }

    #[test]
    fn test_escape_segment_escapes_separator_and_percent() {
        assert_eq!(escape_segment("a||b", KEY_SEPARATOR), "a%7C%7Cb");
        assert_eq!(escape_segment("100%", KEY_SEPARATOR), "100%25");
        assert_eq!(escape_segment("a|b", KEY_SEPARATOR), "a%7Cb");
    }

    #[test]
    fn test_escape_segment_custom_separator() {
        assert_eq!(escape_segment("USER#1", "#"), "USER%231");
        assert_eq!(escape_segment("a|b", "#"), "a|b");
    }

    #[test]
    fn test_separator_validation() {
        assert!(is_valid_separator(KEY_SEPARATOR));
        assert!(is_valid_separator("#"));
        assert!(!is_valid_separator(""));
        assert!(!is_valid_separator("%"));
        assert!(!is_valid_separator("2"));
        assert!(!is_valid_separator("|a|"));
        // "2" would reappear in the escape of itself.
        assert_eq!(escape_segment("x2", "2"), "x%32");
    }

    #[test]
    fn test_composite_key_joins_canonical_values() {
        let keys: Keys = [
            Key::new("name", "measure1"),
            Key::new("ts", Utc.with_ymd_and_hms(2023, 2, 5, 1, 0, 0).unwrap()),
            Key::new("n", 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            composite_key(&keys),
            "measure1||2023-02-05T01:00:00.000Z||5"
        );
    }

    #[test]
    fn test_separator_inside_value_does_not_collide() {
        let one = composite_key(&keys(&[("a", "x||y"), ("b", "z")]));
        let two = composite_key(&keys(&[("a", "x"), ("b", "y||z")]));
        assert_ne!(one, two);
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        let prefix = KeyPrefix::from_keys(&keys(&[("a", "ab")]));
        assert!(prefix.matches("ab"));
        assert!(prefix.matches("ab||x"));
        assert!(!prefix.matches("abc"));
        assert!(!prefix.matches("abc||x"));
        assert!(!prefix.matches("a"));
    }

    #[test]
    fn test_prefix_with_escaped_value() {
        let prefix = KeyPrefix::from_keys(&keys(&[("a", "x|")]));
        let stored = composite_key(&keys(&[("a", "x|"), ("b", "1")]));
        assert!(prefix.matches(&stored));
        assert!(!prefix.matches(&composite_key(&keys(&[("a", "x"), ("b", "1")]))));
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let prefix = KeyPrefix::from_keys(&Keys::new());
        assert_eq!(prefix.segments(), 0);
        assert_eq!(prefix.as_str(), "");
        assert!(prefix.matches("anything||at all"));
    }

    #[test]
    fn test_empty_string_segment_is_not_an_empty_prefix() {
        let prefix = KeyPrefix::from_keys(&keys(&[("a", "")]));
        assert!(prefix.matches(""));
        assert!(prefix.matches("||x"));
        assert!(!prefix.matches("x"));
    }
}
