//! Play Together engine library.
//!
//! Ingests 5etools bestiary data into the domain model.
//!
//! ## Structure
//!
//! - `infrastructure/` - Configuration and the 5etools importers, including
//!   the content normalizer
//! - `use_cases/` - Encounter candidate selection over an imported bestiary

pub mod infrastructure;
pub mod use_cases;
