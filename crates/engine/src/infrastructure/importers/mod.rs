//! Content importers for various data sources.
//!
//! This module provides importers for loading bestiary content from 5etools
//! data, normalizing its free-form content into domain types.

mod bestiary;
mod fivetools;
mod fivetools_types;
mod formatting;
mod legendary_groups;
pub mod normalizer;

pub use bestiary::{challenge_rating_from_value, convert_monster, AssembleOptions};
pub use fivetools::{BestiaryImport, FiveToolsImporter, ImportError, ImportSummary};
pub use formatting::clean_formatting;
pub use legendary_groups::{apply_modification, resolve_legendary_groups};
