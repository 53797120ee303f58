//! Cache key derivation.
//!
//! A key is the URL's serialized form with every non-alphanumeric character
//! replaced by `_`, prefixed with `feed_`. The mapping is lossy: URLs that
//! differ only in punctuation share a key (`http://a.com/x/y` and
//! `http://a.com/x?y` both become `feed_http___a_com_x_y`). Changing this would
//! rename every file in existing cache directories, so it is kept as is.
//!
//! Characters are classified per UTF-16 code unit: anything outside the Basic
//! Multilingual Plane becomes two substitutes, one per surrogate. Within the
//! BMP the test is `char::is_alphanumeric`, which also keeps letter-like and
//! other numerics (`Ⅻ`, `½`) and combining marks of the `Alphabetic` property.
//! Keys derived from a [`Url`] are ASCII and unaffected.

use url::Url;

/// Prefix of every entry file name.
pub const KEY_PREFIX: &str = "feed_";

/// Replacement for characters that are not letters or digits.
pub const SUBSTITUTE: char = '_';

/// Derive the cache key for a URL.
pub fn cache_key(url: &Url) -> String {
    encode_key(url.as_str())
}

/// Derive the cache key for a raw URL string.
pub fn encode_key(raw: &str) -> String {
    let replaced = replace_non_alphanumeric(raw, SUBSTITUTE);
    format!("{KEY_PREFIX}{}", replaced.trim())
}

/// Replace every character that is not a letter or digit with `subst`.
pub fn replace_non_alphanumeric(input: &str, subst: char) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.len_utf16() == 2 {
            out.push(subst);
            out.push(subst);
        } else if c.is_alphanumeric() {
            out.push(c);
        } else {
            out.push(subst);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let url = Url::parse("http://nowhere.com/feed.xml").unwrap();
        assert_eq!(cache_key(&url), cache_key(&url));
    }

    #[test]
    fn test_key_format() {
        assert_eq!(encode_key("http://nowhere.com"), "feed_http___nowhere_com");
        assert_eq!(encode_key("https://example.com/a?b=1"), "feed_https___example_com_a_b_1");
    }

    #[test]
    fn test_key_uses_serialized_url() {
        // The url crate appends a root path to bare hosts.
        let url = Url::parse("http://nowhere.com").unwrap();
        assert_eq!(cache_key(&url), "feed_http___nowhere_com_");
    }

    #[test]
    fn test_key_is_filename_safe() {
        let key = encode_key("https://user:pw@example.com:8080/a/../b?q=x y#frag");
        assert!(key.starts_with(KEY_PREFIX));
        assert!(key.chars().all(|c| c.is_alphanumeric() || c == SUBSTITUTE));
    }

    #[test]
    fn test_punctuation_collision() {
        let path = Url::parse("http://a.com/x/y").unwrap();
        let query = Url::parse("http://a.com/x?y").unwrap();
        assert_ne!(path, query);
        assert_eq!(cache_key(&path), cache_key(&query));
        assert_eq!(encode_key("http://a.com/x"), encode_key("http://a.com?x"));
    }

    #[test]
    fn test_whitespace_is_substituted() {
        assert_eq!(encode_key(" a b "), "feed__a_b_");
    }

    #[test]
    fn test_supplementary_plane_becomes_two_substitutes() {
        assert_eq!(replace_non_alphanumeric("a\u{1D400}b", '_'), "a__b");
        assert_eq!(encode_key("x\u{1F600}"), "feed_x__");
    }

    #[test]
    fn test_non_ascii_letters_are_kept() {
        assert_eq!(replace_non_alphanumeric("café-1", '-'), "café-1");
        assert_eq!(replace_non_alphanumeric("a.b", '-'), "a-b");
    }
}
