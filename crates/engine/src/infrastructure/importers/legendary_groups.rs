//! Legendary group resolution.
//!
//! Groups are indexed by name first, then each group's lair actions,
//! regional effects and mythic encounter are built. A group may inherit
//! content from another through `_copy`, with `_mod` describing how the
//! inherited fragment arrays are changed. A field the group defines itself
//! always wins over the inherited one.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use playtogether_domain::{BlockKind, LegendaryGroup, LegendaryGroupTable};

use super::fivetools_types::FiveToolsLegendaryGroup;
use super::formatting::clean_formatting;
use super::normalizer::{block_fragments, build_block, DiagnosticKind, Diagnostics};

/// `_copy` chains longer than this are treated as cycles.
const MAX_COPY_DEPTH: usize = 8;

const GROUP_BLOCKS: [BlockKind; 3] = [
    BlockKind::LairActions,
    BlockKind::RegionalEffects,
    BlockKind::MythicEncounter,
];

/// Build the legendary group table from the raw `legendaryGroup` array.
pub fn resolve_legendary_groups(
    records: &[Value],
    strip_formatting: bool,
    diagnostics: &mut Diagnostics,
) -> LegendaryGroupTable {
    let groups = index_groups(records, diagnostics);
    let by_name: HashMap<&str, &FiveToolsLegendaryGroup> = groups
        .iter()
        .filter_map(|g| Some((g.name.as_deref()?, g)))
        .collect();

    let mut table = LegendaryGroupTable::new();
    for raw in &groups {
        let Some(name) = raw.name.as_deref() else {
            continue;
        };
        let source = raw.source.clone().unwrap_or_default();
        let group = diagnostics.scoped(format!("legendary group `{}`", name), |diagnostics| {
            let mut group = LegendaryGroup::new(name, source.as_str()).ok()?;
            if let Some(copy) = &raw.copy {
                if !by_name.contains_key(copy.name.as_str()) {
                    diagnostics.record(
                        DiagnosticKind::UnresolvedCopy,
                        format!("copies `{}`, which does not exist", copy.name),
                    );
                }
            }
            for kind in GROUP_BLOCKS {
                let Some(fragments) = effective_fragments(raw, kind, &by_name, 0, diagnostics)
                else {
                    continue;
                };
                let payload = Value::Array(fragments);
                let mut block = build_block(kind, Some(source.as_str()), &payload, diagnostics);
                if strip_formatting {
                    block = block.map_text(&clean_formatting);
                }
                match kind {
                    BlockKind::LairActions => group.lair_actions = Some(block),
                    BlockKind::RegionalEffects => group.regional_effects = Some(block),
                    _ => group.mythic_encounter = Some(block),
                }
            }
            Some(group)
        });
        if let Some(group) = group {
            // Names were deduplicated while indexing.
            let _ = table.insert(group);
        }
    }
    table
}

/// Deserialize every record and keep the first group per name.
fn index_groups(records: &[Value], diagnostics: &mut Diagnostics) -> Vec<FiveToolsLegendaryGroup> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut groups = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let group = match FiveToolsLegendaryGroup::deserialize(record) {
            Ok(group) => group,
            Err(e) => {
                diagnostics.record(
                    DiagnosticKind::InvalidRecord,
                    format!("legendary group #{}: {}", index, e),
                );
                continue;
            }
        };
        let Some(name) = group.name.clone().filter(|n| !n.trim().is_empty()) else {
            diagnostics.record(
                DiagnosticKind::MissingField,
                format!("legendary group #{} has no name", index),
            );
            continue;
        };
        let source = group.source.clone().unwrap_or_default();
        if let Some(first_source) = seen.get(&name) {
            diagnostics.record(
                DiagnosticKind::DuplicateGroup,
                format!(
                    "`{}` from {} ignored; already defined by {}",
                    name, source, first_source
                ),
            );
            continue;
        }
        seen.insert(name, source);
        groups.push(group);
    }
    groups
}

fn own_field(group: &FiveToolsLegendaryGroup, kind: BlockKind) -> Option<&Value> {
    match kind {
        BlockKind::LairActions => group.lair_actions.as_ref(),
        BlockKind::RegionalEffects => group.regional_effects.as_ref(),
        BlockKind::MythicEncounter => group.mythic_encounter.as_ref(),
        _ => None,
    }
}

/// Fragments for one block of a group, following `_copy` if the group does
/// not define the field itself. `None` means the group has no such block.
fn effective_fragments(
    group: &FiveToolsLegendaryGroup,
    kind: BlockKind,
    by_name: &HashMap<&str, &FiveToolsLegendaryGroup>,
    depth: usize,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<Value>> {
    if let Some(own) = own_field(group, kind) {
        return Some(block_fragments(own).into_iter().cloned().collect());
    }
    let copy = group.copy.as_ref()?;

    let inherited = if depth >= MAX_COPY_DEPTH {
        diagnostics.record(
            DiagnosticKind::UnresolvedCopy,
            format!("`_copy` chain through `{}` is too deep", copy.name),
        );
        None
    } else {
        match by_name.get(copy.name.as_str()) {
            Some(base) => effective_fragments(base, kind, by_name, depth + 1, diagnostics),
            // Reported once per group by the caller.
            None => None,
        }
    };

    let modification = copy
        .modifications
        .as_ref()
        .and_then(|m| m.get(kind.source_key()));
    match modification {
        Some(modification) => Some(apply_modification(
            inherited.unwrap_or_default(),
            modification,
            diagnostics,
        )),
        None => inherited,
    }
}

/// Apply one `_mod` entry to inherited fragments.
///
/// A plain array replaces the inherited fragments. An object (or an array of
/// objects) with a `mode` is an operation: `appendArr`, `prependArr`,
/// `replaceArr`, `removeArr`. An object with only `items` replaces.
pub fn apply_modification(
    base: Vec<Value>,
    modification: &Value,
    diagnostics: &mut Diagnostics,
) -> Vec<Value> {
    match modification {
        Value::Array(ops) if !ops.is_empty() && ops.iter().all(is_operation) => ops
            .iter()
            .fold(base, |acc, op| apply_operation(acc, op, diagnostics)),
        Value::Array(fragments) => fragments.clone(),
        Value::Object(_) if is_operation(modification) => {
            apply_operation(base, modification, diagnostics)
        }
        Value::Object(obj) => match obj.get("items") {
            Some(items) => items_of(items),
            None => {
                diagnostics.record(
                    DiagnosticKind::UnsupportedModification,
                    "modification has neither `mode` nor `items`",
                );
                base
            }
        },
        other => vec![other.clone()],
    }
}

fn is_operation(value: &Value) -> bool {
    value.get("mode").and_then(Value::as_str).is_some()
}

fn items_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn apply_operation(mut base: Vec<Value>, op: &Value, diagnostics: &mut Diagnostics) -> Vec<Value> {
    let mode = op.get("mode").and_then(Value::as_str).unwrap_or_default();
    let items = op.get("items").map(items_of).unwrap_or_default();
    match mode {
        "appendArr" => {
            base.extend(items);
            base
        }
        "prependArr" => {
            let mut out = items;
            out.extend(base);
            out
        }
        "replaceArr" => {
            let Some(target) = op.get("replace") else {
                diagnostics.record(
                    DiagnosticKind::UnsupportedModification,
                    "`replaceArr` without `replace`",
                );
                return base;
            };
            match base.iter().position(|f| fragment_matches(f, target)) {
                Some(index) => {
                    let tail = base.split_off(index + 1);
                    base.pop();
                    base.extend(items);
                    base.extend(tail);
                }
                None => diagnostics.record(
                    DiagnosticKind::UnsupportedModification,
                    format!("`replaceArr` target {} not found", target),
                ),
            }
            base
        }
        "removeArr" => {
            let targets: Vec<Value> = op
                .get("names")
                .or_else(|| op.get("items"))
                .map(items_of)
                .unwrap_or_default();
            base.retain(|f| !targets.iter().any(|t| fragment_matches(f, t)));
            base
        }
        other => {
            diagnostics.record(
                DiagnosticKind::UnsupportedModification,
                format!("unknown `_mod` mode `{}`; treating items as a replacement", other),
            );
            items
        }
    }
}

/// A target matches a fragment by name, or by equality for strings.
fn fragment_matches(fragment: &Value, target: &Value) -> bool {
    match target {
        Value::String(name) => {
            fragment.get("name").and_then(Value::as_str) == Some(name.as_str())
                || fragment.as_str() == Some(name.as_str())
        }
        Value::Object(_) => fragment == target,
        _ => false,
    }
}
