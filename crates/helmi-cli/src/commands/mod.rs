//! CLI command implementations.

pub mod backends;
pub mod batch;
pub mod bell;
pub mod bv;
pub mod common;
pub mod flip;
pub mod ghz;
pub mod sweep;
