//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::api::server::ApiServerConfig;
use crate::logging::DEFAULT_LOG_FILTER;

/// Instance used as service 0 when no `--service` is given.
pub const DEFAULT_SERVICE: &str = "https://framatube.org";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tubeproxy",
    version,
    about = "JSON gateway for video platform metadata",
    long_about = None
)]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "TUBEPROXY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TUBEPROXY_PORT", default_value_t = 80)]
    pub port: u16,

    /// Outbound proxy (socks4://, socks5://, http:// or https://)
    #[arg(long, env = "TUBEPROXY_PROXY")]
    pub proxy: Option<String>,

    /// Number of worker threads serving requests
    #[arg(
        long,
        env = "TUBEPROXY_WORKERS",
        default_value_t = 6,
        value_parser = clap::value_parser!(u16).range(1..=512)
    )]
    pub workers: u16,

    /// Maximum length of the pending connection queue
    #[arg(long, env = "TUBEPROXY_BACKLOG", default_value_t = 255)]
    pub backlog: u32,

    /// Instance base url; repeat to register more services (index = service id)
    #[arg(
        long = "service",
        env = "TUBEPROXY_SERVICES",
        value_delimiter = ',',
        default_value = DEFAULT_SERVICE
    )]
    pub services: Vec<String>,

    /// Log filter directive (overridden by RUST_LOG)
    #[arg(long, env = "TUBEPROXY_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Write daily-rotated log files to this directory
    #[arg(long, env = "TUBEPROXY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    pub fn server_config(&self) -> ApiServerConfig {
        ApiServerConfig {
            bind_address: self.host.clone(),
            port: self.port,
            backlog: self.backlog,
        }
    }

    /// Registered instances in service id order, blanks dropped.
    pub fn service_urls(&self) -> Vec<String> {
        self.services
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The proxy option, with an empty value treated as unset.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("tubeproxy").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        let config = args.server_config();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 80);
        assert_eq!(config.backlog, 255);
        assert_eq!(args.workers, 6);
        assert_eq!(args.service_urls(), vec![DEFAULT_SERVICE.to_string()]);
        assert!(args.proxy().is_none());
    }

    #[test]
    fn test_explicit_options() {
        let args = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--proxy",
            "socks5://127.0.0.1:1080",
            "--service",
            "https://a.example",
            "--service",
            "https://b.example,https://c.example",
        ])
        .unwrap();
        assert_eq!(args.server_config().port, 8080);
        assert_eq!(args.proxy(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(
            args.service_urls(),
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&["--port", "70000"]).is_err());
        assert!(parse(&["--workers", "0"]).is_err());
        assert!(parse(&["--workers", "513"]).is_err());
        assert!(parse(&["--unknown"]).is_err());
    }
}
