//! Type definitions for 5etools JSON data format.
//!
//! These types mirror the 5etools schema for bestiary and legendary group
//! files. Fields whose shape varies between records are kept as raw
//! `serde_json::Value` and interpreted during conversion.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Root structure for a `bestiary-*.json` file.
///
/// Records stay raw so one malformed creature cannot fail the whole file.
#[derive(Debug, Deserialize)]
pub struct FiveToolsBestiaryFile {
    #[serde(default)]
    pub monster: Option<Vec<Value>>,
}

/// Root structure for `legendarygroups.json`.
#[derive(Debug, Deserialize)]
pub struct FiveToolsLegendaryGroupFile {
    #[serde(rename = "legendaryGroup", default)]
    pub legendary_group: Option<Vec<Value>>,
}

/// A creature in 5etools format.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiveToolsMonster {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Vec<String>,
    /// A type string, or `{"type": ..., "tags": [...]}`
    #[serde(rename = "type", default)]
    pub creature_type: Option<Value>,
    #[serde(default)]
    pub alignment: Vec<Value>,
    #[serde(default)]
    pub ac: Vec<FiveToolsArmorClass>,
    #[serde(default)]
    pub hp: Option<FiveToolsHitPoints>,
    #[serde(default)]
    pub speed: FiveToolsSpeed,
    #[serde(rename = "str", default)]
    pub strength: Option<i32>,
    #[serde(rename = "dex", default)]
    pub dexterity: Option<i32>,
    #[serde(rename = "con", default)]
    pub constitution: Option<i32>,
    #[serde(rename = "int", default)]
    pub intelligence: Option<i32>,
    #[serde(rename = "wis", default)]
    pub wisdom: Option<i32>,
    #[serde(rename = "cha", default)]
    pub charisma: Option<i32>,
    #[serde(default)]
    pub save: BTreeMap<String, Value>,
    #[serde(default)]
    pub skill: BTreeMap<String, Value>,
    #[serde(default)]
    pub senses: Option<Vec<String>>,
    #[serde(default)]
    pub passive: Option<Value>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub resist: Option<Vec<Value>>,
    #[serde(default)]
    pub immune: Option<Vec<Value>>,
    #[serde(default)]
    pub vulnerable: Option<Vec<Value>>,
    #[serde(default)]
    pub condition_immune: Option<Vec<Value>>,
    #[serde(default)]
    pub environment: Option<Vec<String>>,
    /// A rating string, or `{"cr": ..., "lair"?: ..., "coven"?: ...}`
    #[serde(default)]
    pub cr: Option<Value>,
    #[serde(rename = "trait", default)]
    pub traits: Option<Value>,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub bonus: Option<Value>,
    #[serde(default)]
    pub reaction: Option<Value>,
    #[serde(default)]
    pub legendary: Option<Value>,
    #[serde(default)]
    pub legendary_header: Option<Vec<Value>>,
    #[serde(default)]
    pub variant: Option<Value>,
    #[serde(default)]
    pub legendary_group: Option<FiveToolsGroupRef>,
    #[serde(rename = "_copy", default)]
    pub copy: Option<FiveToolsCopy>,
}

/// Armor class entry: a bare number, a number with its source, or a note.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FiveToolsArmorClass {
    Simple(i32),
    Detailed {
        ac: i32,
        #[serde(default)]
        from: Option<Vec<String>>,
        #[serde(default)]
        condition: Option<String>,
    },
    Special {
        special: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiveToolsHitPoints {
    #[serde(default)]
    pub average: Option<u32>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub special: Option<String>,
}

/// Speed can be a simple number or an object with multiple movement types.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(untagged)]
pub enum FiveToolsSpeed {
    Simple(u32),
    Complex(BTreeMap<String, FiveToolsSpeedValue>),
    #[default]
    None,
}

/// Speed value can be a number, a flag (`canHover`), or a conditional speed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FiveToolsSpeedValue {
    Number(u32),
    Bool(bool),
    Conditional(FiveToolsConditionalSpeed),
    Other(Value),
}

/// Conditional speed (e.g., fly with condition).
#[derive(Debug, Clone, Deserialize)]
pub struct FiveToolsConditionalSpeed {
    pub number: u32,
    #[serde(default)]
    pub condition: Option<String>,
}

/// Reference from a creature to its legendary group.
#[derive(Debug, Clone, Deserialize)]
pub struct FiveToolsGroupRef {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// A legendary group in 5etools format.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiveToolsLegendaryGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub lair_actions: Option<Value>,
    #[serde(default)]
    pub regional_effects: Option<Value>,
    #[serde(default)]
    pub mythic_encounter: Option<Value>,
    #[serde(rename = "_copy", default)]
    pub copy: Option<FiveToolsCopy>,
}

/// Copy directive for inherited records.
#[derive(Debug, Clone, Deserialize)]
pub struct FiveToolsCopy {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "_mod", default)]
    pub modifications: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn monster_reads_irregular_fields() {
        let raw = json!({
            "name": "Aboleth",
            "source": "MM",
            "size": ["L"],
            "type": "aberration",
            "ac": [17, {"ac": 20, "condition": "while submerged"}, {"special": "varies"}],
            "hp": {"average": 135, "formula": "18d10 + 36"},
            "speed": {"walk": 10, "swim": 40, "canHover": true},
            "str": 21, "dex": 9, "con": 15, "int": 18, "wis": 15, "cha": 18,
            "cr": "10",
            "legendaryGroup": {"name": "Aboleth", "source": "MM"}
        });
        let monster = FiveToolsMonster::deserialize(&raw).expect("deserialize");
        assert_eq!(monster.name.as_deref(), Some("Aboleth"));
        assert_eq!(monster.strength, Some(21));
        assert_eq!(monster.ac.len(), 3);
        assert!(matches!(monster.ac[2], FiveToolsArmorClass::Special { .. }));
        let FiveToolsSpeed::Complex(speed) = monster.speed else {
            panic!("expected complex speed");
        };
        assert!(matches!(speed.get("swim"), Some(FiveToolsSpeedValue::Number(40))));
        assert!(matches!(speed.get("canHover"), Some(FiveToolsSpeedValue::Bool(true))));
        assert_eq!(
            monster.legendary_group.map(|g| g.name),
            Some("Aboleth".to_string())
        );
    }

    #[test]
    fn copy_directive_keeps_mod_payload_raw() {
        let raw = json!({
            "name": "Aboleth (Variant)",
            "_copy": {
                "name": "Aboleth",
                "source": "MM",
                "_mod": {"regionalEffects": {"mode": "appendArr", "items": "x"}}
            }
        });
        let group = FiveToolsLegendaryGroup::deserialize(&raw).expect("deserialize");
        let copy = group.copy.expect("copy");
        assert_eq!(copy.name, "Aboleth");
        assert!(copy.modifications.is_some());
    }

    #[test]
    fn missing_top_level_array_is_none() {
        let file: FiveToolsBestiaryFile = serde_json::from_str("{}").expect("parse");
        assert!(file.monster.is_none());
    }
}
