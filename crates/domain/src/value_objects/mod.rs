//! Value objects - Immutable objects defined by their attributes

mod ability_scores;
mod armor_class;
mod block;
mod challenge_rating;
mod item_tree;

pub use ability_scores::{ability_modifier, Ability, AbilityScores, ScoreValues};
pub use armor_class::ArmorClass;
pub use block::{Block, BlockKind};
pub use challenge_rating::{parse_fraction, ChallengeRating, ChallengeRatingError};
pub use item_tree::Item;
