//! Shape classification for content fragments.
//!
//! A fragment is any JSON value found where prose is expected. Classification
//! looks only at the `"type"` tag and at which keys are present, never at
//! element order.

use serde_json::{Map, Value};

/// Body of a named item: a single entry, or a list of entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemBody<'a> {
    Entry(&'a Value),
    Entries(&'a [Value]),
}

/// The shapes the normalizer understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fragment<'a> {
    /// Bare prose
    Text(&'a str),
    /// `{"type": "list", "items": [...]}`
    List {
        name: Option<&'a str>,
        items: &'a [Value],
    },
    /// `{"type": "entries", "name"?, "entries": [...]}` and the block types
    /// that carry the same payload (sections, insets, quotes, variants)
    Entries {
        name: Option<&'a str>,
        entries: &'a [Value],
    },
    /// `{"type": "table", "caption", "colLabels", "rows"}`
    Table {
        caption: Option<&'a str>,
        col_labels: &'a [Value],
        rows: &'a [Value],
    },
    /// `{"type": "item", ...}` or a tag-less `{name, entry}` / `{name, entries}`
    NamedItem { name: &'a str, body: ItemBody<'a> },
    /// Anything else
    Unrecognized(&'a Value),
}

const ENTRIES_TYPES: &[&str] = &[
    "entries",
    "section",
    "inset",
    "insetReadaloud",
    "quote",
    "variant",
    "variantInner",
    "variantSub",
];

impl<'a> Fragment<'a> {
    /// Classify one JSON value.
    pub fn classify(value: &'a Value) -> Self {
        let obj = match value {
            Value::String(s) => return Fragment::Text(s),
            Value::Object(obj) => obj,
            other => return Fragment::Unrecognized(other),
        };

        let name = obj.get("name").and_then(Value::as_str);
        match obj.get("type").and_then(Value::as_str) {
            Some("list") => match array(obj, "items") {
                Some(items) => Fragment::List { name, items },
                None => Fragment::Unrecognized(value),
            },
            Some(tag) if ENTRIES_TYPES.contains(&tag) => match array(obj, "entries") {
                Some(entries) => Fragment::Entries { name, entries },
                None => Fragment::Unrecognized(value),
            },
            Some("table") => match array(obj, "rows") {
                Some(rows) => Fragment::Table {
                    caption: obj.get("caption").and_then(Value::as_str),
                    col_labels: array(obj, "colLabels").unwrap_or(&[]),
                    rows,
                },
                None => Fragment::Unrecognized(value),
            },
            Some("item") | Some("itemSub") => Self::named_item(value, obj, name),
            // Some sub-records omit the tag entirely and are recognized by keys.
            None => Self::named_item(value, obj, name),
            Some(_) => Fragment::Unrecognized(value),
        }
    }

    fn named_item(value: &'a Value, obj: &'a Map<String, Value>, name: Option<&'a str>) -> Self {
        let Some(name) = name else {
            return Fragment::Unrecognized(value);
        };
        if let Some(entry) = obj.get("entry") {
            return Fragment::NamedItem {
                name,
                body: ItemBody::Entry(entry),
            };
        }
        match array(obj, "entries") {
            Some(entries) => Fragment::NamedItem {
                name,
                body: ItemBody::Entries(entries),
            },
            None => Fragment::Unrecognized(value),
        }
    }

    /// Short label of the shape, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Fragment::Text(_) => "text",
            Fragment::List { .. } => "list",
            Fragment::Entries { .. } => "entries",
            Fragment::Table { .. } => "table",
            Fragment::NamedItem { .. } => "item",
            Fragment::Unrecognized(_) => "unrecognized",
        }
    }
}

fn array<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    obj.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

/// Describe a value that matched no shape.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
            Some(tag) => format!("object with unsupported type `{}`", tag),
            None => {
                let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
                format!("untagged object with keys [{}]", keys.join(", "))
            }
        },
        Value::Array(items) => format!("nested array of {} elements", items.len()),
        Value::String(_) => "string".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_text() {
        let v = json!("The dragon exhales.");
        assert_eq!(Fragment::classify(&v), Fragment::Text("The dragon exhales."));
    }

    #[test]
    fn list_by_tag() {
        let v = json!({"type": "list", "items": ["a", "b"]});
        assert!(matches!(
            Fragment::classify(&v),
            Fragment::List { name: None, items } if items.len() == 2
        ));
    }

    #[test]
    fn entries_and_aliases_by_tag() {
        for tag in ["entries", "section", "inset", "variantSub"] {
            let v = json!({"type": tag, "name": "Lair", "entries": ["x"]});
            assert!(
                matches!(Fragment::classify(&v), Fragment::Entries { name: Some("Lair"), .. }),
                "tag {tag}"
            );
        }
    }

    #[test]
    fn table_without_labels_still_classifies() {
        let v = json!({"type": "table", "rows": [["1", "a"]]});
        assert!(matches!(
            Fragment::classify(&v),
            Fragment::Table { caption: None, col_labels, rows } if col_labels.is_empty() && rows.len() == 1
        ));
    }

    #[test]
    fn tagged_item_with_entry() {
        let v = json!({"type": "item", "name": "Grasp", "entry": "It grabs."});
        assert!(matches!(
            Fragment::classify(&v),
            Fragment::NamedItem { name: "Grasp", body: ItemBody::Entry(_) }
        ));
    }

    #[test]
    fn untagged_name_and_entry_is_item_by_key_presence() {
        let v = json!({"name": "Tentacle", "entry": "Slam."});
        assert!(matches!(
            Fragment::classify(&v),
            Fragment::NamedItem { name: "Tentacle", body: ItemBody::Entry(_) }
        ));
        let v = json!({"name": "Bite", "entries": ["Melee."]});
        assert!(matches!(
            Fragment::classify(&v),
            Fragment::NamedItem { name: "Bite", body: ItemBody::Entries(e) } if e.len() == 1
        ));
    }

    #[test]
    fn unknown_shapes_are_unrecognized() {
        for v in [
            json!({"type": "spellcasting", "name": "Spellcasting"}),
            json!({"type": "list"}),
            json!({"entry": "no name"}),
            json!(42),
            json!(null),
        ] {
            assert!(matches!(Fragment::classify(&v), Fragment::Unrecognized(_)), "{v}");
        }
    }

    #[test]
    fn describe_names_the_tag_or_keys() {
        assert_eq!(
            describe(&json!({"type": "image"})),
            "object with unsupported type `image`"
        );
        assert_eq!(
            describe(&json!({"foo": 1})),
            "untagged object with keys [foo]"
        );
        assert_eq!(describe(&json!(3)), "number 3");
    }
}
