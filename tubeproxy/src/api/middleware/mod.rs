//! Request middleware applied ahead of routing.

pub mod method_gate;
pub mod path;

pub use method_gate::method_gate;
pub use path::decode_path;
