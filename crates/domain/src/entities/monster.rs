//! Monster entity assembled from bestiary records.
//!
//! Holds the literal stat-block fields plus the normalized content blocks
//! (traits, actions, ...). Lair actions, regional effects and mythic
//! encounters are filled in later from the creature's legendary group.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::value_objects::{AbilityScores, ArmorClass, Block, ChallengeRating};

/// Hit points as given in the source: an average with its dice formula, or a
/// special note for creatures whose hit points depend on something else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    pub average: Option<u32>,
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

/// A creature from the bestiary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub name: String,
    /// Source book abbreviation (e.g., "MM")
    pub source: String,
    pub page: Option<u32>,
    /// Size codes ("M", "L", ...); a few creatures list more than one
    pub size: Vec<String>,
    pub creature_type: String,
    pub alignment: String,
    /// Every armor class entry; the first one is the primary value
    pub armor_class: Vec<ArmorClass>,
    pub hit_points: HitPoints,
    /// Movement mode to speed in feet
    pub speeds: BTreeMap<String, u32>,
    pub ability_scores: AbilityScores,
    pub saves: BTreeMap<String, i32>,
    pub skills: BTreeMap<String, i32>,
    pub senses: Vec<String>,
    pub passive_perception: Option<i32>,
    pub languages: Vec<String>,
    pub damage_resistances: Vec<String>,
    pub damage_immunities: Vec<String>,
    pub damage_vulnerabilities: Vec<String>,
    pub condition_immunities: Vec<String>,
    pub environments: Vec<String>,
    pub challenge_rating: ChallengeRating,
    pub traits: Option<Block>,
    pub actions: Option<Block>,
    pub bonus_actions: Option<Block>,
    pub reactions: Option<Block>,
    pub legendary_actions: Option<Block>,
    pub variant: Option<Block>,
    /// Name of the legendary group this creature shares lair content with
    pub legendary_group: Option<String>,
    pub lair_actions: Option<Block>,
    pub regional_effects: Option<Block>,
    pub mythic_encounter: Option<Block>,
}

impl Monster {
    /// Create a monster with its required fields; everything else starts empty.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        ability_scores: AbilityScores,
        challenge_rating: ChallengeRating,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("Monster name cannot be empty"));
        }
        Ok(Self {
            name,
            source: source.into(),
            page: None,
            size: Vec::new(),
            creature_type: String::new(),
            alignment: String::new(),
            armor_class: Vec::new(),
            hit_points: HitPoints::default(),
            speeds: BTreeMap::new(),
            ability_scores,
            saves: BTreeMap::new(),
            skills: BTreeMap::new(),
            senses: Vec::new(),
            passive_perception: None,
            languages: Vec::new(),
            damage_resistances: Vec::new(),
            damage_immunities: Vec::new(),
            damage_vulnerabilities: Vec::new(),
            condition_immunities: Vec::new(),
            environments: Vec::new(),
            challenge_rating,
            traits: None,
            actions: None,
            bonus_actions: None,
            reactions: None,
            legendary_actions: None,
            variant: None,
            legendary_group: None,
            lair_actions: None,
            regional_effects: None,
            mythic_encounter: None,
        })
    }

    /// Primary armor class value.
    pub fn ac(&self) -> Option<i32> {
        self.armor_class.first().map(|ac| ac.value)
    }

    pub fn has_natural_armor(&self) -> bool {
        self.armor_class
            .first()
            .map(ArmorClass::is_natural_armor)
            .unwrap_or(false)
    }

    /// Check whether the creature appears in an environment (case-insensitive).
    pub fn lives_in(&self, environment: &str) -> bool {
        self.environments
            .iter()
            .any(|e| e.eq_ignore_ascii_case(environment))
    }

    /// All content blocks carried by this creature, in stat-block order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        [
            &self.traits,
            &self.actions,
            &self.bonus_actions,
            &self.reactions,
            &self.legendary_actions,
            &self.lair_actions,
            &self.regional_effects,
            &self.mythic_encounter,
            &self.variant,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
    }
}
