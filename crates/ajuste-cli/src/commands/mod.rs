//! CLI command implementations.

pub mod common;
pub mod explore;
pub mod filters;
pub mod identify;
pub mod signal;
