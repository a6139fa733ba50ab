//! Opaque pagination token.
//!
//! A token is the URL-safe, unpadded base64 of a small versioned JSON record
//! holding the service id, the listing it continues and the provider's
//! [`Page`]. Anything that does not decode to a current-version record naming
//! a url or id is rejected with a [`PageTokenError`], never a panic.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tube_extractor::Page;

pub const TOKEN_VERSION: u8 = 1;

/// Longest token accepted by [`PageToken::decode`], in bytes.
pub const MAX_TOKEN_LEN: usize = 16 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageTokenError {
    #[error("page token exceeds {MAX_TOKEN_LEN} bytes")]
    TooLong,
    #[error("page token is not valid base64")]
    Base64,
    #[error("page token is not a valid record: {0}")]
    Json(String),
    #[error("unsupported page token version {0}")]
    UnsupportedVersion(u8),
    #[error("page token body is not valid base64")]
    Body,
    #[error("page token names neither a url nor an id")]
    Incomplete,
}

/// The listing a token continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Search,
    Playlist,
    Trending,
}

/// Serialized form. Short keys keep tokens compact in query strings.
#[derive(Debug, Serialize, Deserialize)]
struct WireToken {
    v: u8,
    svc: u32,
    k: PageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    u: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    i: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ids: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    c: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    b: Option<String>,
}

/// A continuation cursor bound to the service and listing that produced it.
///
/// `scope` narrows the listing further, e.g. the playlist url a playlist
/// cursor belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    pub service_id: u32,
    pub kind: PageKind,
    pub scope: Option<String>,
    pub page: Page,
}

impl PageToken {
    pub fn new(service_id: u32, kind: PageKind, page: Page) -> Self {
        Self {
            service_id,
            kind,
            scope: None,
            page,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Whether this token continues the given listing of the given service.
    pub fn issued_for(&self, service_id: u32, kind: PageKind, scope: Option<&str>) -> bool {
        self.service_id == service_id && self.kind == kind && self.scope.as_deref() == scope
    }

    pub fn encode(&self) -> String {
        let wire = WireToken {
            v: TOKEN_VERSION,
            svc: self.service_id,
            k: self.kind,
            s: self.scope.clone(),
            u: self.page.url.clone(),
            i: self.page.id.clone(),
            ids: self.page.ids.clone(),
            c: self.page.cookies.clone(),
            b: self.page.body.as_ref().map(|b| URL_SAFE_NO_PAD.encode(b)),
        };
        // Serializing a struct of strings and integers cannot fail.
        let json = serde_json::to_vec(&wire).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<Self, PageTokenError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(PageTokenError::TooLong);
        }
        let raw = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| PageTokenError::Base64)?;
        let wire: WireToken =
            serde_json::from_slice(&raw).map_err(|e| PageTokenError::Json(e.to_string()))?;
        if wire.v != TOKEN_VERSION {
            return Err(PageTokenError::UnsupportedVersion(wire.v));
        }
        let body = match wire.b {
            Some(b) => Some(URL_SAFE_NO_PAD.decode(b).map_err(|_| PageTokenError::Body)?),
            None => None,
        };
        let page = Page {
            url: wire.u,
            id: wire.i,
            ids: wire.ids,
            cookies: wire.c,
            body,
        };
        if !page.is_valid() {
            return Err(PageTokenError::Incomplete);
        }
        Ok(Self {
            service_id: wire.svc,
            kind: wire.k,
            scope: wire.s,
            page,
        })
    }
}
