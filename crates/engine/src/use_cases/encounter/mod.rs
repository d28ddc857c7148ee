//! Encounter use cases.
//!
//! Selects creatures from an imported bestiary as encounter candidates.

mod encounter_service;

pub use encounter_service::{select_candidates, EncounterFilter, EncounterService, EnvironmentFilter};
