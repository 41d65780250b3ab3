//! CLI command implementations.

pub mod build;
pub mod convert;
pub mod plan;
