//! Legendary groups - lair content shared by several creatures
//!
//! Lair actions, regional effects and mythic encounters are defined once per
//! named group and copied onto every monster that names that group. Building
//! the table and joining it into monsters are separate steps, the join is a
//! pure function of its inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Monster;
use crate::error::DomainError;
use crate::value_objects::Block;

/// Group-level content shared by every creature that names this group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendaryGroup {
    pub name: String,
    pub source: String,
    pub lair_actions: Option<Block>,
    pub regional_effects: Option<Block>,
    pub mythic_encounter: Option<Block>,
}

impl LegendaryGroup {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("Legendary group name cannot be empty"));
        }
        Ok(Self {
            name,
            source: source.into(),
            lair_actions: None,
            regional_effects: None,
            mythic_encounter: None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lair_actions.is_none()
            && self.regional_effects.is_none()
            && self.mythic_encounter.is_none()
    }
}

/// Name-keyed lookup of legendary groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendaryGroupTable {
    groups: BTreeMap<String, LegendaryGroup>,
}

impl LegendaryGroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group. The first group registered under a name is kept; a
    /// later one with the same name is handed back to the caller.
    pub fn insert(&mut self, group: LegendaryGroup) -> Result<(), LegendaryGroup> {
        if self.groups.contains_key(&group.name) {
            return Err(group);
        }
        self.groups.insert(group.name.clone(), group);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LegendaryGroup> {
        self.groups.get(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Copy group content onto one monster.
    ///
    /// Monsters without a group name, or naming a group that is not in the
    /// table, are returned unchanged.
    pub fn apply_to(&self, mut monster: Monster) -> Monster {
        let Some(group) = monster
            .legendary_group
            .as_deref()
            .and_then(|name| self.groups.get(name))
        else {
            return monster;
        };
        monster.lair_actions = group.lair_actions.clone();
        monster.regional_effects = group.regional_effects.clone();
        monster.mythic_encounter = group.mythic_encounter.clone();
        monster
    }

    /// Join the table into a list of monsters.
    pub fn apply(&self, monsters: Vec<Monster>) -> Vec<Monster> {
        monsters.into_iter().map(|m| self.apply_to(m)).collect()
    }

    /// Group names referenced by monsters but missing from the table.
    pub fn unresolved<'a>(&self, monsters: &'a [Monster]) -> Vec<&'a str> {
        let mut names: Vec<&str> = monsters
            .iter()
            .filter_map(|m| m.legendary_group.as_deref())
            .filter(|name| !self.groups.contains_key(*name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{AbilityScores, BlockKind, ChallengeRating, Item};

    fn monster(name: &str, group: Option<&str>) -> Monster {
        let mut m = Monster::new(
            name,
            "MM",
            AbilityScores::new(10, 10, 10, 10, 10, 10),
            ChallengeRating::new(10.0),
        )
        .expect("valid monster");
        m.legendary_group = group.map(str::to_string);
        m
    }

    fn group(name: &str) -> LegendaryGroup {
        let mut g = LegendaryGroup::new(name, "MM").expect("valid group");
        g.regional_effects = Some(Block::new(
            BlockKind::RegionalEffects,
            Some("MM".into()),
            "The region is changed.",
            vec![Item::unnamed("Water turns to slime.")],
        ));
        g
    }

    #[test]
    fn first_group_with_a_name_wins() {
        let mut table = LegendaryGroupTable::new();
        assert!(table.insert(group("Aboleth")).is_ok());
        let duplicate = LegendaryGroup::new("Aboleth", "VGM").expect("valid group");
        let rejected = table.insert(duplicate).expect_err("duplicate must be rejected");
        assert_eq!(rejected.source, "VGM");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Aboleth").map(|g| g.source.as_str()), Some("MM"));
    }

    #[test]
    fn join_fans_out_to_every_member() {
        let mut table = LegendaryGroupTable::new();
        table.insert(group("Aboleth")).expect("insert");

        let joined = table.apply(vec![
            monster("Aboleth", Some("Aboleth")),
            monster("Aboleth Elder", Some("Aboleth")),
            monster("Goblin", None),
        ]);

        assert!(joined[0].regional_effects.is_some());
        assert_eq!(joined[0].regional_effects, joined[1].regional_effects);
        assert!(joined[2].regional_effects.is_none());
        assert!(joined[0].lair_actions.is_none());
    }

    #[test]
    fn unknown_group_leaves_monster_unchanged() {
        let table = LegendaryGroupTable::new();
        let original = monster("Tarrasque", Some("Tarrasque"));
        assert_eq!(table.apply_to(original.clone()), original);
    }

    #[test]
    fn unresolved_lists_missing_names_once() {
        let mut table = LegendaryGroupTable::new();
        table.insert(group("Aboleth")).expect("insert");
        let monsters = vec![
            monster("A", Some("Zariel")),
            monster("B", Some("Zariel")),
            monster("C", Some("Aboleth")),
        ];
        assert_eq!(table.unresolved(&monsters), ["Zariel"]);
    }
}
