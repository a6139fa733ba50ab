use std::sync::Arc;

use super::downloader::Downloader;
use super::platforms::peertube::PeerTube;
use super::provider::MetadataProvider;

/// The fixed, ordered set of providers. A provider's index is its service id.
///
/// The registry is built once at startup and never changes afterwards, so it
/// can be shared between requests without locking.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<Arc<dyn MetadataProvider>>,
}

impl ServiceRegistry {
    pub fn new(services: Vec<Arc<dyn MetadataProvider>>) -> Self {
        Self { services }
    }

    /// Builds one PeerTube provider per instance url, in order.
    pub fn from_peertube_instances<I, S>(instances: I, downloader: Arc<dyn Downloader>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let services = instances
            .into_iter()
            .enumerate()
            .map(|(id, base_url)| {
                Arc::new(PeerTube::new(id as u32, base_url, downloader.clone()))
                    as Arc<dyn MetadataProvider>
            })
            .collect();
        Self { services }
    }

    pub fn get(&self, id: usize) -> Option<&Arc<dyn MetadataProvider>> {
        self.services.get(id)
    }

    /// Resolves the raw `t` request parameter.
    ///
    /// Absent or empty selects the default provider (id 0). Anything else must
    /// be an unsigned decimal id present in the registry.
    pub fn resolve(&self, raw: Option<&str>) -> Option<Arc<dyn MetadataProvider>> {
        let id = match raw {
            None | Some("") => 0,
            Some(raw) => raw.parse::<u32>().ok()? as usize,
        };
        self.services.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MetadataProvider>> {
        self.services.iter()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.services.iter().map(|s| s.name()))
            .finish()
    }
}
