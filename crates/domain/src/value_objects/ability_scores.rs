//! Ability scores and their derived modifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six abilities of a 5e stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter key used by 5etools (`str`, `dex`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Modifier for an ability score.
///
/// D&D uses floor division, Rust's `/` rounds toward zero, so a score of 9
/// has to give -1 rather than 0. Scores near `i32::MIN` saturate instead of
/// overflowing.
pub fn ability_modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// Raw scores as they appear in source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScoreValues {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

/// Six ability scores with modifiers computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScoreValues")]
pub struct AbilityScores {
    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,
    strength_modifier: i32,
    dexterity_modifier: i32,
    constitution_modifier: i32,
    intelligence_modifier: i32,
    wisdom_modifier: i32,
    charisma_modifier: i32,
}

impl AbilityScores {
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
            strength_modifier: ability_modifier(strength),
            dexterity_modifier: ability_modifier(dexterity),
            constitution_modifier: ability_modifier(constitution),
            intelligence_modifier: ability_modifier(intelligence),
            wisdom_modifier: ability_modifier(wisdom),
            charisma_modifier: ability_modifier(charisma),
        }
    }

    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength_modifier,
            Ability::Dexterity => self.dexterity_modifier,
            Ability::Constitution => self.constitution_modifier,
            Ability::Intelligence => self.intelligence_modifier,
            Ability::Wisdom => self.wisdom_modifier,
            Ability::Charisma => self.charisma_modifier,
        }
    }
}

impl From<ScoreValues> for AbilityScores {
    fn from(v: ScoreValues) -> Self {
        Self::new(
            v.strength,
            v.dexterity,
            v.constitution,
            v.intelligence,
            v.wisdom,
            v.charisma,
        )
    }
}
