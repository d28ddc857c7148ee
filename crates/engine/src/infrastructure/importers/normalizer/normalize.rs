//! Fragment normalization into `Item` trees.
//!
//! Every recognized shape is mapped to one of four results. Unrecognized
//! shapes are recorded as diagnostics and contribute nothing.

use serde_json::Value;
use playtogether_domain::Item;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::fragment::{describe, Fragment, ItemBody};

/// Result of normalizing one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The fragment contributed nothing
    Empty,
    /// Prose with no structure
    Text(String),
    /// One named node
    Node(Item),
    /// Several sibling nodes (unnamed lists)
    Nodes(Vec<Item>),
}

impl Normalized {
    /// Structural content as items; prose becomes one unnamed leaf.
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Normalized::Empty => Vec::new(),
            Normalized::Text(text) => vec![Item::unnamed(text)],
            Normalized::Node(item) => vec![item],
            Normalized::Nodes(items) => items,
        }
    }

    /// Everything in this result rendered as a line of prose.
    pub fn into_text(self) -> String {
        match self {
            Normalized::Empty => String::new(),
            Normalized::Text(text) => text,
            Normalized::Node(item) => item.flatten_text(),
            Normalized::Nodes(items) => {
                let mut out = String::new();
                for item in &items {
                    push_text(&mut out, &item.flatten_text());
                }
                out
            }
        }
    }
}

/// Normalize one fragment.
pub fn normalize(value: &Value, diagnostics: &mut Diagnostics) -> Normalized {
    match Fragment::classify(value) {
        Fragment::Text(text) => Normalized::Text(text.to_string()),
        Fragment::List { name, items } => normalize_list(name, items, diagnostics),
        Fragment::Entries { name, entries } => normalize_entries(name, entries, diagnostics),
        Fragment::Table {
            caption,
            col_labels,
            rows,
        } => normalize_table(caption, col_labels, rows, diagnostics),
        Fragment::NamedItem { name, body } => {
            Normalized::Node(normalize_named_item(name, body, diagnostics))
        }
        Fragment::Unrecognized(value) => {
            diagnostics.record(DiagnosticKind::UnrecognizedFragment, describe(value));
            Normalized::Empty
        }
    }
}

/// Append `text` to `buf`, separated by a single space.
pub(crate) fn push_text(buf: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(text);
}

/// Split a sequence of entries into joined prose and structural children.
fn collect_body(entries: &[Value], diagnostics: &mut Diagnostics) -> (String, Vec<Item>) {
    let mut description = String::new();
    let mut children = Vec::new();
    for entry in entries {
        match normalize(entry, diagnostics) {
            Normalized::Empty => {}
            Normalized::Text(text) => push_text(&mut description, &text),
            Normalized::Node(item) => children.push(item),
            Normalized::Nodes(items) => children.extend(items),
        }
    }
    (description, children)
}

fn normalize_list(name: Option<&str>, items: &[Value], diagnostics: &mut Diagnostics) -> Normalized {
    match name {
        Some(name) => {
            let (description, children) = collect_body(items, diagnostics);
            Normalized::Node(Item::new(name, description).with_children(children))
        }
        None => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                match normalize(element, diagnostics) {
                    Normalized::Empty => {}
                    Normalized::Text(text) => out.push(Item::unnamed(text)),
                    Normalized::Node(item) => out.push(item),
                    Normalized::Nodes(items) => out.extend(items),
                }
            }
            Normalized::Nodes(out)
        }
    }
}

fn normalize_entries(
    name: Option<&str>,
    entries: &[Value],
    diagnostics: &mut Diagnostics,
) -> Normalized {
    let (description, children) = collect_body(entries, diagnostics);
    match name {
        Some(name) => Normalized::Node(Item::new(name, description).with_children(children)),
        None => {
            // Unnamed entries have nowhere to hang children; fold them into the prose.
            let mut text = description;
            for child in &children {
                push_text(&mut text, &child.flatten_text());
            }
            if text.is_empty() {
                Normalized::Empty
            } else {
                Normalized::Text(text)
            }
        }
    }
}

fn normalize_named_item(name: &str, body: ItemBody<'_>, diagnostics: &mut Diagnostics) -> Item {
    match body {
        ItemBody::Entry(Value::String(text)) => Item::new(name, text.as_str()),
        ItemBody::Entry(entry) => match normalize(entry, diagnostics) {
            Normalized::Empty => Item::new(name, ""),
            Normalized::Text(text) => Item::new(name, text),
            Normalized::Node(child) => Item::new(name, "").with_children(vec![child]),
            Normalized::Nodes(children) => Item::new(name, "").with_children(children),
        },
        ItemBody::Entries(entries) => {
            let (description, children) = collect_body(entries, diagnostics);
            Item::new(name, description).with_children(children)
        }
    }
}

fn normalize_table(
    caption: Option<&str>,
    col_labels: &[Value],
    rows: &[Value],
    diagnostics: &mut Diagnostics,
) -> Normalized {
    let caption = caption.unwrap_or_default();
    diagnostics.scoped(format!("table `{}`", caption), |diagnostics| {
        let description = match col_labels {
            [Value::String(roll), Value::String(effect)] => format!("{} ({})", effect, roll),
            [] => String::new(),
            labels => {
                diagnostics.record(
                    DiagnosticKind::MalformedTable,
                    format!("expected two column labels, found {}", labels.len()),
                );
                labels
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" / ")
            }
        };

        let mut children = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match table_row(row) {
                Ok((roll, effect)) => children.push(Item::new(roll, effect)),
                Err(reason) => diagnostics.record(
                    DiagnosticKind::MalformedRow,
                    format!("row {} skipped: {}", index, reason),
                ),
            }
        }

        Normalized::Node(Item::new(caption, description).with_children(children))
    })
}

/// Extract `(roll, effect)` from a two-cell row, or say why it is unusable.
fn table_row(row: &Value) -> Result<(String, String), String> {
    let cells = match row {
        Value::Array(cells) => cells.as_slice(),
        // `{"type": "row", "row": [...]}` wraps the same cell array.
        Value::Object(obj) => obj
            .get("row")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| "row object without a `row` array".to_string())?,
        other => return Err(describe(other)),
    };
    let [roll, effect] = cells else {
        return Err(format!("{} cells", cells.len()));
    };
    let roll = render_cell(roll)
        .ok_or_else(|| format!("roll cell is {}", describe_cell(roll)))?
        .replace("\\u2013", "-")
        .replace('\u{2013}', "-");
    let effect = render_cell(effect)
        .ok_or_else(|| format!("effect cell is {}", describe_cell(effect)))?
        .replace('"', "");
    Ok((roll, effect))
}

fn render_cell(cell: &Value) -> Option<String> {
    match cell {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => {
            let roll = obj.get("roll")?;
            if let Some(exact) = roll.get("exact").and_then(Value::as_i64) {
                return Some(exact.to_string());
            }
            let min = roll.get("min").and_then(Value::as_i64)?;
            let max = roll.get("max").and_then(Value::as_i64)?;
            Some(format!("{}-{}", min, max))
        }
        _ => None,
    }
}

fn describe_cell(cell: &Value) -> String {
    match cell {
        Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
            Some(tag) => format!("an `{}` object", tag),
            None => "an object without `roll`".to_string(),
        },
        other => describe(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> (Normalized, Diagnostics) {
        let mut diags = Diagnostics::new();
        let out = normalize(&value, &mut diags);
        (out, diags)
    }

    /// Re-express an item in the fragment vocabulary it would have come from.
    fn to_fragment(item: &Item) -> Value {
        if item.children.is_empty() {
            json!({"type": "item", "name": item.name, "entry": item.description})
        } else {
            let mut entries = vec![Value::String(item.description.clone())];
            entries.extend(item.children.iter().map(to_fragment));
            json!({"type": "entries", "name": item.name, "entries": entries})
        }
    }

    #[test]
    fn strings_are_identity() {
        let (out, diags) = run(json!("The air turns cold."));
        assert_eq!(out, Normalized::Text("The air turns cold.".into()));
        assert!(diags.is_empty());
    }

    #[test]
    fn unnamed_list_yields_one_leaf_per_string() {
        let (out, _) = run(json!({"type": "list", "items": ["a", "b"]}));
        assert_eq!(
            out,
            Normalized::Nodes(vec![Item::unnamed("a"), Item::unnamed("b")])
        );
    }

    #[test]
    fn unnamed_list_of_named_entries() {
        let (out, _) = run(json!({
            "type": "list",
            "items": [
                {"type": "item", "name": "Grasp", "entry": "It grabs."},
                {"name": "Crush", "entries": ["It crushes.", "Hard."]}
            ]
        }));
        assert_eq!(
            out,
            Normalized::Nodes(vec![
                Item::new("Grasp", "It grabs."),
                Item::new("Crush", "It crushes. Hard."),
            ])
        );
    }

    #[test]
    fn named_list_joins_strings_and_nests_objects() {
        let (out, _) = run(json!({
            "type": "list",
            "name": "Options",
            "items": ["first", {"type": "item", "name": "Second", "entry": "two"}, "third"]
        }));
        assert_eq!(
            out,
            Normalized::Node(
                Item::new("Options", "first third")
                    .with_children(vec![Item::new("Second", "two")])
            )
        );
    }

    #[test]
    fn named_entries_become_a_node() {
        let (out, _) = run(json!({
            "type": "entries",
            "name": "Lair Actions",
            "entries": [
                "On initiative count 20:",
                {"type": "list", "items": ["Tremor.", "Fog."]}
            ]
        }));
        let Normalized::Node(item) = out else {
            panic!("expected a node");
        };
        assert_eq!(item.name, "Lair Actions");
        assert_eq!(item.description, "On initiative count 20:");
        assert_eq!(
            item.children,
            vec![Item::unnamed("Tremor."), Item::unnamed("Fog.")]
        );
    }

    #[test]
    fn unnamed_entries_never_produce_items() {
        let (out, _) = run(json!({
            "type": "entries",
            "entries": ["A.", {"type": "item", "name": "B", "entry": "b."}, "C."]
        }));
        assert_eq!(out, Normalized::Text("A. C. B. b.".into()));

        let (out, _) = run(json!({"type": "entries", "entries": []}));
        assert_eq!(out, Normalized::Empty);
    }

    #[test]
    fn table_rows_keep_order_and_are_cleaned() {
        let (out, diags) = run(json!({
            "type": "table",
            "caption": "Wild Magic",
            "colLabels": ["d6", "Effect"],
            "rows": [
                ["1\u{2013}2", "A \"loud\" bang"],
                ["3\\u20134", "Smoke"],
                [{"type": "cell", "roll": {"exact": 5}}, "Sparks"],
                [{"type": "cell", "roll": {"min": 6, "max": 7}}, "Nothing"]
            ]
        }));
        assert!(diags.is_empty());
        let Normalized::Node(table) = out else {
            panic!("expected a node");
        };
        assert_eq!(table.name, "Wild Magic");
        assert_eq!(table.description, "Effect (d6)");
        let rows: Vec<(&str, &str)> = table
            .children
            .iter()
            .map(|c| (c.name.as_str(), c.description.as_str()))
            .collect();
        assert_eq!(
            rows,
            [
                ("1-2", "A loud bang"),
                ("3-4", "Smoke"),
                ("5", "Sparks"),
                ("6-7", "Nothing")
            ]
        );
    }

    #[test]
    fn three_cell_row_is_skipped_with_one_diagnostic() {
        let (out, diags) = run(json!({
            "type": "table",
            "caption": "Odd",
            "colLabels": ["d4", "Effect"],
            "rows": [["1", "ok"], ["2", "too", "many"], ["3", "fine"]]
        }));
        let Normalized::Node(table) = out else {
            panic!("expected a node");
        };
        assert_eq!(table.children.len(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::MalformedRow), 1);
        let context = diags.iter().next().map(|d| d.context.clone());
        assert_eq!(context.as_deref(), Some("table `Odd`"));
    }

    #[test]
    fn unrenderable_cell_is_named_in_the_diagnostic() {
        let (out, diags) = run(json!({
            "type": "table",
            "colLabels": ["d4", "Effect"],
            "rows": [["1", {"type": "entries", "entries": ["nested"]}], ["2", "fine"]]
        }));
        let Normalized::Node(table) = out else {
            panic!("expected a node");
        };
        assert_eq!(table.children, [Item::new("2", "fine")]);
        let message = diags.iter().next().map(|d| d.message.clone());
        assert_eq!(
            message.as_deref(),
            Some("row 0 skipped: effect cell is an `entries` object")
        );
    }

    #[test]
    fn unrecognized_fragment_is_reported_not_fatal() {
        let (out, diags) = run(json!({"type": "spellcasting", "name": "Innate"}));
        assert_eq!(out, Normalized::Empty);
        assert_eq!(diags.count(DiagnosticKind::UnrecognizedFragment), 1);
    }

    #[test]
    fn unrecognized_child_does_not_drop_siblings() {
        let (out, diags) = run(json!({
            "type": "entries",
            "name": "Mixed",
            "entries": ["kept", {"type": "image"}, {"type": "item", "name": "Also", "entry": "kept"}]
        }));
        assert_eq!(
            out,
            Normalized::Node(Item::new("Mixed", "kept").with_children(vec![Item::new("Also", "kept")]))
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn named_item_with_structured_entry() {
        let (out, _) = run(json!({
            "type": "item",
            "name": "Options",
            "entry": {"type": "list", "items": ["x", "y"]}
        }));
        assert_eq!(
            out,
            Normalized::Node(
                Item::new("Options", "")
                    .with_children(vec![Item::unnamed("x"), Item::unnamed("y")])
            )
        );
    }

    #[test]
    fn renormalizing_an_item_is_idempotent() {
        let source = json!({
            "type": "entries",
            "name": "Regional Effects",
            "entries": [
                "The region is warped.",
                {"type": "list", "items": ["Water fouls.", {"type": "item", "name": "Fog", "entry": "Thick."}]},
                {"type": "table", "caption": "Omens", "colLabels": ["d2", "Omen"], "rows": [["1", "Crows"], ["2", "Rain"]]}
            ]
        });
        let Normalized::Node(first) = run(source).0 else {
            panic!("expected a node");
        };
        let Normalized::Node(second) = run(to_fragment(&first)).0 else {
            panic!("expected a node");
        };
        assert_eq!(first, second);
    }

    #[test]
    fn into_text_flattens_everything() {
        let nodes = Normalized::Nodes(vec![Item::new("A", "a."), Item::unnamed("b.")]);
        assert_eq!(nodes.into_text(), "A. a. b.");
        assert!(Normalized::Empty.into_items().is_empty());
    }
}
