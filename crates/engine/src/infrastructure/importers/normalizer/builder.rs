//! Block builder.
//!
//! Folds a sequence of fragments into a [`Block`]: bare strings accumulate
//! into the block description, objects are normalized into items.

use serde_json::Value;
use playtogether_domain::{Block, BlockKind, Item};

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::fragment::describe;
use super::normalize::{normalize, push_text, Normalized};

/// Incremental builder for one block.
#[derive(Debug)]
pub struct BlockBuilder {
    kind: BlockKind,
    source: Option<String>,
    description: String,
    items: Vec<Item>,
}

impl BlockBuilder {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            source: None,
            description: String::new(),
            items: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Fold one element into the block.
    pub fn push(&mut self, element: &Value, diagnostics: &mut Diagnostics) {
        match element {
            Value::String(text) => push_text(&mut self.description, text),
            Value::Object(_) => match normalize(element, diagnostics) {
                Normalized::Empty => {}
                Normalized::Text(text) => push_text(&mut self.description, &text),
                Normalized::Node(item) => self.items.push(item),
                Normalized::Nodes(items) => self.items.extend(items),
            },
            other => diagnostics.record(DiagnosticKind::UnsupportedElement, describe(other)),
        }
    }

    pub fn extend<'a>(
        &mut self,
        elements: impl IntoIterator<Item = &'a Value>,
        diagnostics: &mut Diagnostics,
    ) {
        for element in elements {
            self.push(element, diagnostics);
        }
    }

    pub fn finish(self) -> Block {
        Block::new(self.kind, self.source, self.description, self.items)
    }
}

/// The fragments a block field holds.
///
/// Arrays are used as they are, an object carrying an `items` array is
/// unwrapped, and any other value is treated as a one-element sequence.
pub fn block_fragments(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(elements) => elements.iter().collect(),
        Value::Object(obj) if obj.get("type").is_none() => match obj.get("items") {
            Some(Value::Array(elements)) => elements.iter().collect(),
            _ => vec![value],
        },
        other => vec![other],
    }
}

/// Build a block from the raw value of a block field.
pub fn build_block(
    kind: BlockKind,
    source: Option<&str>,
    value: &Value,
    diagnostics: &mut Diagnostics,
) -> Block {
    let mut builder = BlockBuilder::new(kind);
    if let Some(source) = source {
        builder = builder.with_source(source);
    }
    diagnostics.scoped(kind.source_key(), |diagnostics| {
        builder.extend(block_fragments(value), diagnostics);
    });
    builder.finish()
}
