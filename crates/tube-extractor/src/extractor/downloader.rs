//! Outbound HTTP used by providers to reach the platforms.
//!
//! Every call is a single request/response cycle with fixed connect and read
//! timeouts, redirects followed, and the whole body buffered in memory.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use tracing::{debug, warn};
use url::Url;

use super::error::ExtractorError;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

/// Multi-value header map; a name may carry several values.
pub type Headers = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Appends a value; earlier values for the same name are kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
    /// `None` when the server sent an empty body.
    pub body: Option<String>,
    /// Url after following redirects.
    pub final_url: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.first())
            .map(String::as_str)
    }

    pub fn body_or_empty(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Performs HTTP requests on behalf of a provider.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, ExtractorError>;

    async fn get(&self, url: &str) -> Result<Response, ExtractorError> {
        self.execute(Request::get(url)).await
    }

    async fn head(&self, url: &str) -> Result<Response, ExtractorError> {
        self.execute(Request::new(Method::HEAD, url)).await
    }

    async fn post(
        &self,
        url: &str,
        headers: Headers,
        body: Vec<u8>,
    ) -> Result<Response, ExtractorError> {
        let mut request = Request::new(Method::POST, url).body(body);
        request.headers = headers;
        self.execute(request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Socks,
    Http,
}

/// A proxy accepted at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySetting {
    pub kind: ProxyKind,
    pub url: String,
}

impl ProxySetting {
    /// Parses a proxy url, logging and ignoring anything unusable.
    ///
    /// `socks4`/`socks5` select a SOCKS proxy, `http`/`https` an HTTP proxy.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let parsed = match Url::parse(raw) {
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => url,
            _ => {
                warn!(proxy_url = %raw, "Failed to parse the specified proxy URL, ignoring");
                return None;
            }
        };

        let kind = match parsed.scheme() {
            "socks4" | "socks5" => ProxyKind::Socks,
            "http" | "https" => ProxyKind::Http,
            scheme => {
                warn!(proxy_url = %raw, scheme, "Unsupported proxy protocol ignored");
                return None;
            }
        };

        Some(Self {
            kind,
            url: raw.to_string(),
        })
    }
}

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Another crate installed one first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// [`Downloader`] backed by a shared `reqwest::Client`.
///
/// The proxy is resolved once at construction and never changes.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    proxy: Option<ProxySetting>,
}

impl HttpDownloader {
    pub fn new(proxy: Option<&str>) -> Self {
        let proxy = proxy.and_then(ProxySetting::parse);
        let client = build_client(proxy.as_ref());
        Self { client, proxy }
    }

    pub fn proxy(&self) -> Option<&ProxySetting> {
        self.proxy.as_ref()
    }
}

fn build_client(proxy: Option<&ProxySetting>) -> Client {
    install_rustls_provider();

    let mut builder = Client::builder()
        .user_agent(DEFAULT_UA)
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(READ_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS));

    builder = match proxy {
        Some(setting) => match reqwest::Proxy::all(&setting.url) {
            Ok(proxy) => builder.proxy(proxy),
            Err(error) => {
                warn!(
                    proxy_url = %setting.url,
                    error = %error,
                    "Proxy rejected by the HTTP client; continuing without proxy"
                );
                builder.no_proxy()
            }
        },
        // Environment proxies are ignored as well.
        None => builder.no_proxy(),
    };

    builder.build().unwrap_or_else(|error| {
        warn!(error = %error, "Failed to create HTTP client; falling back to reqwest defaults");
        Client::builder()
            .no_proxy()
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn execute(&self, request: Request) -> Result<Response, ExtractorError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, values) in &request.headers {
            for value in values {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let mut response = builder.send().await?;

        let status = response.status();
        let final_url = response.url().to_string();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        // Error responses carry their error document in the same body.
        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            data.extend_from_slice(&chunk);
        }

        debug!(
            url = %request.url,
            status = status.as_u16(),
            bytes = data.len(),
            "Outbound request completed"
        );

        Ok(Response {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: (!data.is_empty()).then(|| String::from_utf8_lossy(&data).into_owned()),
            final_url,
        })
    }
}
