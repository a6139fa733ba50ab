//! Query string parsing.
//!
//! The raw query is split on `&`, and each part on its first `=` at index 1 or
//! later, so a leading `=` belongs to the key. A part without `=` maps to an
//! empty value. Keys and values are form-decoded (`+` is a space, `%XX` a
//! byte, UTF-8 with lossy replacement). Duplicate keys overwrite.

use std::borrow::Cow;
use std::collections::HashMap;

use super::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = HashMap::new();
        let Some(raw) = raw else {
            return Self(params);
        };
        for part in raw.split('&').filter(|p| !p.is_empty()) {
            let split = part.bytes().skip(1).position(|b| b == b'=').map(|i| i + 1);
            match split {
                Some(i) => params.insert(decode_component(&part[..i]), decode_component(&part[i + 1..])),
                None => params.insert(decode_component(part), String::new()),
            };
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The value when present and not empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// A required parameter; absent or empty is a bad request.
    pub fn require(&self, key: &str) -> ApiResult<&str> {
        self.non_empty(key)
            .ok_or_else(|| ApiError::bad_request(format!("missing required parameter '{key}'")))
    }
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decoding() {
        let params = QueryParams::parse(Some("q=a%20b&f=videos,channels"));
        assert_eq!(params.get("q"), Some("a b"));
        assert_eq!(params.get("f"), Some("videos,channels"));
    }

    #[test]
    fn test_plus_is_space_and_escaped_plus_is_kept() {
        let params = QueryParams::parse(Some("q=lo+fi%2Bbeats"));
        assert_eq!(params.get("q"), Some("lo fi+beats"));
    }

    #[test]
    fn test_missing_equals_gives_empty_value() {
        let params = QueryParams::parse(Some("q&t=1"));
        assert_eq!(params.get("q"), Some(""));
        assert_eq!(params.get("t"), Some("1"));
        assert!(params.non_empty("q").is_none());
        assert!(params.require("q").is_err());
    }

    #[test]
    fn test_leading_equals_belongs_to_key() {
        let params = QueryParams::parse(Some("=x&a==b"));
        assert_eq!(params.get("=x"), Some(""));
        assert_eq!(params.get("a"), Some("=b"));
    }

    #[test]
    fn test_utf8_and_invalid_sequences() {
        let params = QueryParams::parse(Some("q=%E4%B8%96%E7%95%8C&bad=%FF"));
        assert_eq!(params.get("q"), Some("世界"));
        assert_eq!(params.get("bad"), Some("\u{fffd}"));
    }

    #[test]
    fn test_duplicates_overwrite_and_empty_query() {
        let params = QueryParams::parse(Some("t=1&t=2"));
        assert_eq!(params.get("t"), Some("2"));
        assert_eq!(QueryParams::parse(None), QueryParams::default());
        assert_eq!(QueryParams::parse(Some("")), QueryParams::default());
    }
}
