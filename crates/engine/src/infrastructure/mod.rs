//! Infrastructure implementations.
//!
//! Contains configuration loading and importers for external data sources.

pub mod config;
pub mod importers;
