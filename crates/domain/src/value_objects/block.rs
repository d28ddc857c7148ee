//! Block - accumulated description text plus an ordered list of items
//!
//! One block exists per game concept on a creature (its actions, its traits,
//! the lair actions of its legendary group, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Item;

/// Which game concept a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Traits,
    Actions,
    BonusActions,
    Reactions,
    LegendaryActions,
    LairActions,
    RegionalEffects,
    MythicEncounter,
    Variant,
}

impl BlockKind {
    /// The key this block is stored under in 5etools records.
    pub fn source_key(&self) -> &'static str {
        match self {
            BlockKind::Traits => "trait",
            BlockKind::Actions => "action",
            BlockKind::BonusActions => "bonus",
            BlockKind::Reactions => "reaction",
            BlockKind::LegendaryActions => "legendary",
            BlockKind::LairActions => "lairActions",
            BlockKind::RegionalEffects => "regionalEffects",
            BlockKind::MythicEncounter => "mythicEncounter",
            BlockKind::Variant => "variant",
        }
    }

    /// Blocks that live on a legendary group rather than on the creature.
    pub fn is_group_level(&self) -> bool {
        matches!(
            self,
            BlockKind::LairActions | BlockKind::RegionalEffects | BlockKind::MythicEncounter
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockKind::Traits => "traits",
            BlockKind::Actions => "actions",
            BlockKind::BonusActions => "bonus actions",
            BlockKind::Reactions => "reactions",
            BlockKind::LegendaryActions => "legendary actions",
            BlockKind::LairActions => "lair actions",
            BlockKind::RegionalEffects => "regional effects",
            BlockKind::MythicEncounter => "mythic encounter",
            BlockKind::Variant => "variant",
        };
        f.write_str(label)
    }
}

/// An immutable aggregate of description text and normalized items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    items: Vec<Item>,
}

impl Block {
    pub fn new(
        kind: BlockKind,
        source: Option<String>,
        description: impl Into<String>,
        items: Vec<Item>,
    ) -> Self {
        Self {
            kind,
            source,
            description: description.into(),
            items,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Source book the block came from, when it was built from a legendary group.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.items.is_empty()
    }

    /// Find a top-level item by name.
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Rewrite the description and every item in the block.
    pub fn map_text<F>(self, f: &F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            kind: self.kind,
            source: self.source,
            description: f(&self.description),
            items: self.items.into_iter().map(|i| i.map_text(f)).collect(),
        }
    }
}
