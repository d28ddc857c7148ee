//! Play Together domain types.
//!
//! Pure data types for ingested bestiary content: the normalized `Item` tree,
//! content `Block`s, stat-block value objects, and the `Monster` and
//! `LegendaryGroup` entities. No I/O lives here.

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{HitPoints, LegendaryGroup, LegendaryGroupTable, Monster};
pub use error::DomainError;
pub use value_objects::{
    ability_modifier, parse_fraction, Ability, AbilityScores, ArmorClass, Block, BlockKind,
    ChallengeRating, ChallengeRatingError, Item, ScoreValues,
};
