//! Wire encodings owned by the gateway: the JSON response bodies and the
//! opaque pagination token.

pub mod json;
pub mod page_token;

pub use page_token::{PageKind, PageToken, PageTokenError};
