//! Console output
//!
//! - `text`: human-readable plan summary and usage messages
//! - `json`: machine-readable plan report

pub mod json;
pub mod text;
