//! Conversion of raw bestiary records into `Monster` entities.
//!
//! A record missing a required field (name, challenge rating, any ability
//! score) is skipped with a diagnostic. Everything else degrades gracefully:
//! absent optional fields stay empty and malformed content fragments are
//! dropped individually by the normalizer.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use playtogether_domain::{
    parse_fraction, AbilityScores, ArmorClass, Block, BlockKind, ChallengeRating, DomainError,
    HitPoints, Monster,
};

use super::fivetools_types::{
    FiveToolsArmorClass, FiveToolsMonster, FiveToolsSpeed, FiveToolsSpeedValue,
};
use super::formatting::clean_formatting;
use super::normalizer::{build_block, BlockBuilder, DiagnosticKind, Diagnostics};

/// Options applied while assembling monsters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    /// Replace `{@tag ...}` markup in block text with its display text
    pub strip_formatting: bool,
}

/// Convert one raw bestiary record.
///
/// Returns `None` when the record is skipped; the reason is in `diagnostics`.
pub fn convert_monster(
    raw: &Value,
    options: AssembleOptions,
    diagnostics: &mut Diagnostics,
) -> Option<Monster> {
    let label = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();
    diagnostics.scoped(label, |diagnostics| {
        let record = match FiveToolsMonster::deserialize(raw) {
            Ok(record) => record,
            Err(e) => {
                diagnostics.record(DiagnosticKind::InvalidRecord, e.to_string());
                return None;
            }
        };
        assemble(record, options, diagnostics)
    })
}

fn assemble(
    raw: FiveToolsMonster,
    options: AssembleOptions,
    diagnostics: &mut Diagnostics,
) -> Option<Monster> {
    if let Some(copy) = &raw.copy {
        diagnostics.record(
            DiagnosticKind::UnsupportedCopy,
            format!("inherits from `{}`; copied creatures are not imported", copy.name),
        );
        return None;
    }

    let (name, scores, challenge_rating) = match required_fields(&raw) {
        Ok(fields) => fields,
        Err(e) => {
            let kind = match e {
                DomainError::MissingField { .. } => DiagnosticKind::MissingField,
                _ => DiagnosticKind::InvalidField,
            };
            diagnostics.record(kind, e.to_string());
            return None;
        }
    };

    let mut monster = match Monster::new(name, raw.source.unwrap_or_default(), scores, challenge_rating) {
        Ok(monster) => monster,
        Err(e) => {
            diagnostics.record(DiagnosticKind::InvalidRecord, e.to_string());
            return None;
        }
    };

    monster.page = raw.page;
    monster.size = raw.size;
    monster.creature_type = raw.creature_type.as_ref().map(creature_type).unwrap_or_default();
    monster.alignment = alignment(&raw.alignment);
    monster.armor_class = raw.ac.iter().filter_map(armor_class).collect();
    monster.hit_points = raw
        .hp
        .map(|hp| HitPoints {
            average: hp.average,
            formula: hp.formula,
            special: hp.special,
        })
        .unwrap_or_default();
    monster.speeds = speeds(&raw.speed);
    monster.saves = bonuses("save", &raw.save, diagnostics);
    monster.skills = bonuses("skill", &raw.skill, diagnostics);
    monster.senses = raw.senses.unwrap_or_default();
    monster.passive_perception = raw.passive.as_ref().and_then(integer);
    monster.languages = raw.languages.unwrap_or_default();
    monster.damage_resistances = damage_list(raw.resist.as_deref(), "resist");
    monster.damage_immunities = damage_list(raw.immune.as_deref(), "immune");
    monster.damage_vulnerabilities = damage_list(raw.vulnerable.as_deref(), "vulnerable");
    monster.condition_immunities = damage_list(raw.condition_immune.as_deref(), "conditionImmune");
    monster.environments = raw.environment.unwrap_or_default();
    monster.legendary_group = raw.legendary_group.map(|g| g.name);

    let block = |kind: BlockKind, value: Option<&Value>, diagnostics: &mut Diagnostics| {
        value.map(|v| finish(build_block(kind, None, v, diagnostics), options))
    };
    monster.traits = block(BlockKind::Traits, raw.traits.as_ref(), diagnostics);
    monster.actions = block(BlockKind::Actions, raw.action.as_ref(), diagnostics);
    monster.bonus_actions = block(BlockKind::BonusActions, raw.bonus.as_ref(), diagnostics);
    monster.reactions = block(BlockKind::Reactions, raw.reaction.as_ref(), diagnostics);
    monster.variant = block(BlockKind::Variant, raw.variant.as_ref(), diagnostics);
    monster.legendary_actions = legendary_actions(
        raw.legendary_header.as_deref(),
        raw.legendary.as_ref(),
        diagnostics,
    )
    .map(|b| finish(b, options));

    Some(monster)
}

fn required_fields(
    raw: &FiveToolsMonster,
) -> Result<(String, AbilityScores, ChallengeRating), DomainError> {
    let name = raw
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| DomainError::missing_field("monster", "name"))?;
    let cr = raw
        .cr
        .as_ref()
        .ok_or_else(|| DomainError::missing_field("monster", "cr"))?;
    let challenge_rating = challenge_rating_from_value(cr)?;

    let score = |value: Option<i32>, key: &str| {
        value.ok_or_else(|| DomainError::missing_field("monster", key))
    };
    let scores = AbilityScores::new(
        score(raw.strength, "str")?,
        score(raw.dexterity, "dex")?,
        score(raw.constitution, "con")?,
        score(raw.intelligence, "int")?,
        score(raw.wisdom, "wis")?,
        score(raw.charisma, "cha")?,
    );
    Ok((name, scores, challenge_rating))
}

/// Read a challenge rating from its source value.
///
/// Accepts a rating string (`"1/4"`, `"10"`) or an object
/// `{"cr": ..., "lair"?: ..., "coven"?: ...}`.
pub fn challenge_rating_from_value(value: &Value) -> Result<ChallengeRating, DomainError> {
    match value {
        Value::String(s) => Ok(ChallengeRating::parse(s)?),
        Value::Object(obj) => {
            let monster = obj
                .get("cr")
                .and_then(Value::as_str)
                .ok_or_else(|| DomainError::missing_field("challenge rating", "cr"))?;
            let mut rating = ChallengeRating::parse(monster)?;
            if let Some(lair) = obj.get("lair").and_then(Value::as_str) {
                rating = rating.with_lair(parse_fraction(lair)?);
            }
            if let Some(coven) = obj.get("coven").and_then(Value::as_str) {
                rating = rating.with_coven(parse_fraction(coven)?);
            }
            Ok(rating)
        }
        other => Err(DomainError::parse(format!(
            "challenge rating must be a string or object, got {}",
            other
        ))),
    }
}

/// Legendary actions: the header prose becomes the block description.
fn legendary_actions(
    header: Option<&[Value]>,
    actions: Option<&Value>,
    diagnostics: &mut Diagnostics,
) -> Option<Block> {
    let actions = actions?;
    let Some(header) = header else {
        return Some(build_block(BlockKind::LegendaryActions, None, actions, diagnostics));
    };
    let mut builder = BlockBuilder::new(BlockKind::LegendaryActions);
    diagnostics.scoped(BlockKind::LegendaryActions.source_key(), |diagnostics| {
        builder.extend(header, diagnostics);
        builder.extend(super::normalizer::block_fragments(actions), diagnostics);
    });
    Some(builder.finish())
}

fn finish(block: Block, options: AssembleOptions) -> Block {
    if options.strip_formatting {
        block.map_text(&clean_formatting)
    } else {
        block
    }
}

fn creature_type(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => {
            let base = match obj.get("type") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Object(choice)) => choice
                    .get("choose")
                    .and_then(Value::as_array)
                    .map(|options| {
                        options
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(" or ")
                    })
                    .unwrap_or_default(),
                _ => String::new(),
            };
            let tags: Vec<&str> = obj
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(|t| t.as_str().or_else(|| t.get("tag")?.as_str()))
                        .collect()
                })
                .unwrap_or_default();
            if tags.is_empty() {
                base
            } else {
                format!("{} ({})", base, tags.join(", "))
            }
        }
        _ => String::new(),
    }
}

/// Alignment codes are concatenated (`["C", "E"]` reads `CE`); alternatives
/// given as objects are joined with `or`.
fn alignment(values: &[Value]) -> String {
    let codes: String = values.iter().filter_map(Value::as_str).collect();
    let alternatives: Vec<String> = values
        .iter()
        .filter_map(|v| {
            if let Some(special) = v.get("special").and_then(Value::as_str) {
                return Some(special.to_string());
            }
            let inner = v.get("alignment")?.as_array()?;
            Some(alignment(inner))
        })
        .collect();
    match (codes.is_empty(), alternatives.is_empty()) {
        (_, true) => codes,
        (true, false) => alternatives.join(" or "),
        (false, false) => format!("{} or {}", codes, alternatives.join(" or ")),
    }
}

fn armor_class(entry: &FiveToolsArmorClass) -> Option<ArmorClass> {
    match entry {
        FiveToolsArmorClass::Simple(value) => Some(ArmorClass::new(*value)),
        FiveToolsArmorClass::Detailed {
            ac,
            from,
            condition,
        } => {
            let mut out = ArmorClass::new(*ac).with_from(from.clone().unwrap_or_default());
            if let Some(condition) = condition {
                out = out.with_condition(condition.clone());
            }
            Some(out)
        }
        FiveToolsArmorClass::Special { .. } => None,
    }
}

fn speeds(speed: &FiveToolsSpeed) -> BTreeMap<String, u32> {
    match speed {
        FiveToolsSpeed::Simple(walk) => BTreeMap::from([("walk".to_string(), *walk)]),
        FiveToolsSpeed::Complex(modes) => modes
            .iter()
            .filter_map(|(mode, value)| match value {
                FiveToolsSpeedValue::Number(n) => Some((mode.clone(), *n)),
                FiveToolsSpeedValue::Conditional(c) => Some((mode.clone(), c.number)),
                FiveToolsSpeedValue::Bool(_) | FiveToolsSpeedValue::Other(_) => None,
            })
            .collect(),
        FiveToolsSpeed::None => BTreeMap::new(),
    }
}

/// Saving throw and skill bonuses (`"+5"` → 5).
fn bonuses(
    field: &str,
    raw: &BTreeMap<String, Value>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, i32> {
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        // Non-string entries ("other" choice groups) carry no fixed bonus.
        let Some(text) = value.as_str() else {
            continue;
        };
        match text.trim().trim_start_matches('+').parse::<i32>() {
            Ok(bonus) => {
                out.insert(key.clone(), bonus);
            }
            Err(_) => diagnostics.record(
                DiagnosticKind::InvalidField,
                format!("{} `{}` has unreadable bonus `{}`", field, key, text),
            ),
        }
    }
    out
}

fn integer(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Damage and condition lists: plain entries, or grouped entries carrying a
/// note (`{"resist": ["fire", "cold"], "note": "from nonmagical attacks"}`).
fn damage_list(values: Option<&[Value]>, key: &str) -> Vec<String> {
    let Some(values) = values else {
        return Vec::new();
    };
    values
        .iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => {
                if let Some(special) = obj.get("special").and_then(Value::as_str) {
                    return Some(special.to_string());
                }
                let inner = obj.get(key)?.as_array()?;
                let mut text = damage_list(Some(inner), key).join(", ");
                for part in ["preNote", "note"] {
                    if let Some(note) = obj.get(part).and_then(Value::as_str) {
                        text = if part == "preNote" {
                            format!("{} {}", note, text)
                        } else {
                            format!("{} {}", text, note)
                        };
                    }
                }
                Some(text)
            }
            _ => None,
        })
        .collect()
}
