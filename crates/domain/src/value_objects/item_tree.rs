//! Item - the uniform node of normalized content trees
//!
//! Every action, trait, lair effect and table row ends up as an `Item`
//! regardless of the shape it had in the source data.

use serde::{Deserialize, Serialize};

/// A node in a normalized content tree.
///
/// `name` is empty for shapes that carry no label (bare list entries, prose).
/// Children are owned exclusively by their parent and keep source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
}

impl Item {
    /// Create a leaf item.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            children: Vec::new(),
        }
    }

    /// Create a leaf item with no name.
    pub fn unnamed(description: impl Into<String>) -> Self {
        Self::new(String::new(), description)
    }

    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }

    /// Render the subtree as a single line of prose.
    ///
    /// Named nodes render as `Name. description`, followed by their children
    /// in order.
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        match (self.name.is_empty(), self.description.is_empty()) {
            (false, false) => {
                out.push_str(&self.name);
                out.push_str(". ");
                out.push_str(&self.description);
            }
            (false, true) => {
                out.push_str(&self.name);
                out.push('.');
            }
            (true, _) => out.push_str(&self.description),
        }
        for child in &self.children {
            let text = child.flatten_text();
            if text.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&text);
        }
        out
    }

    /// Rewrite every name and description in the subtree.
    pub fn map_text<F>(self, f: &F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            name: f(&self.name),
            description: f(&self.description),
            children: self.children.into_iter().map(|c| c.map_text(f)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_text_of_nested_table() {
        let item = Item::new("Table", "Effect (d6)").with_children(vec![
            Item::new("1", "Nothing"),
            Item::new("2", "Something").with_children(vec![Item::unnamed("deeper")]),
        ]);
        assert_eq!(
            item.flatten_text(),
            "Table. Effect (d6) 1. Nothing 2. Something deeper"
        );
    }

    #[test]
    fn flatten_text_joins_name_description_and_children() {
        let item = Item::new("Frightful Presence", "Each creature must save.")
            .with_children(vec![Item::unnamed("On a failure it is frightened.")]);
        assert_eq!(
            item.flatten_text(),
            "Frightful Presence. Each creature must save. On a failure it is frightened."
        );
        assert_eq!(Item::unnamed("").flatten_text(), "");
    }

    #[test]
    fn map_text_rewrites_whole_tree() {
        let item = Item::new("a", "b").with_children(vec![Item::new("c", "d")]);
        let upper = item.map_text(&|s: &str| s.to_uppercase());
        assert_eq!(upper.name, "A");
        assert_eq!(upper.children[0].description, "D");
    }

    #[test]
    fn empty_children_are_not_serialized() {
        let json = serde_json::to_string(&Item::new("x", "y")).expect("serialize item");
        assert_eq!(json, r#"{"name":"x","description":"y"}"#);
    }
}
