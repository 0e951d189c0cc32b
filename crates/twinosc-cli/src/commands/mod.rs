//! CLI command implementations.

pub mod quantize;
pub mod render;
pub mod settings;
