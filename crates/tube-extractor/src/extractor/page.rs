use std::collections::BTreeMap;

/// Continuation cursor produced by a provider for the next batch of a listing.
///
/// The gateway never looks inside a `Page`; it only hands it back to the
/// provider that created it. Providers use whichever fields they need.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub url: Option<String>,
    pub id: Option<String>,
    pub ids: Vec<String>,
    pub cookies: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Page {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// A page with neither a url nor an id cannot be continued.
    pub fn is_valid(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
            || self.id.as_deref().is_some_and(|i| !i.is_empty())
    }
}
