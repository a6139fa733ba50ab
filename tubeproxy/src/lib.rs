//! tubeproxy: a JSON gateway in front of video platform metadata providers.
//!
//! The HTTP surface lives in [`api`], the response and cursor encodings in
//! [`codec`], and process setup in [`config`] and [`logging`].

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
