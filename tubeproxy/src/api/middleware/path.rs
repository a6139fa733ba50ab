//! Percent-decodes the request path before routing so routes match on the
//! decoded form (`/s%65arch` reaches `/search`).

use axum::{
    extract::Request,
    http::{Uri, uri::PathAndQuery},
    middleware::Next,
    response::Response,
};

pub async fn decode_path(mut request: Request, next: Next) -> Response {
    if let Some(uri) = decoded_uri(request.uri()) {
        *request.uri_mut() = uri;
    }
    next.run(request).await
}

/// The uri with its path decoded, or `None` when nothing changes or the
/// decoded path cannot be represented as a request target.
fn decoded_uri(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    if !path.contains('%') {
        return None;
    }
    let decoded = urlencoding::decode(path).ok()?;
    if decoded.contains(['?', '#']) {
        return None;
    }
    let target = match uri.query() {
        Some(query) => format!("{decoded}?{query}"),
        None => decoded.into_owned(),
    };
    let path_and_query = PathAndQuery::try_from(target).ok()?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_path_and_keeps_query() {
        let uri: Uri = "/s%65arch?q=a%20b".parse().unwrap();
        let decoded = decoded_uri(&uri).unwrap();
        assert_eq!(decoded.path(), "/search");
        assert_eq!(decoded.query(), Some("q=a%20b"));
    }

    #[test]
    fn test_leaves_plain_and_unrepresentable_paths() {
        assert!(decoded_uri(&"/search?q=x".parse().unwrap()).is_none());
        assert!(decoded_uri(&"/a%3Fb".parse().unwrap()).is_none());
        assert!(decoded_uri(&"/a%FF".parse().unwrap()).is_none());
    }
}
