use regex::Regex;

use crate::extractor::error::ExtractorError;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[inline]
pub fn capture_group_1_or_invalid_url<'a>(
    re: &Regex,
    input: &'a str,
) -> Result<&'a str, ExtractorError> {
    capture_group_1(re, input).ok_or_else(|| ExtractorError::InvalidUrl(input.to_string()))
}

/// Joins an instance base url and an absolute api path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
