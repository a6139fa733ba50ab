//! HTTP surface of the gateway.
//!
//! Five data routes (`/search`, `/stream`, `/channel`, `/playlist`,
//! `/trending`), two static assets, and a plain-text 404 for everything else.
//! Only `GET`, `HEAD` and `OPTIONS` are served.

pub mod error;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{ApiServer, ApiServerConfig, AppState};
