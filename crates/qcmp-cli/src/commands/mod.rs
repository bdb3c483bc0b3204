//! CLI command implementations.

pub mod build;
pub mod common;
pub mod compare;
pub mod devices;
pub mod sweep;
pub mod version;
