//! Diagnostics collected while normalizing source data.
//!
//! Normalization never logs directly. Every recoverable problem is recorded
//! here, tagged with the scope it happened in, and the importer decides how to
//! report it.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An object fragment matched no known shape
    UnrecognizedFragment,
    /// A table row without exactly two renderable cells
    MalformedRow,
    /// A table whose column labels are not a pair of strings
    MalformedTable,
    /// A block element that is neither a string nor an object
    UnsupportedElement,
    /// A required field is absent; the record was skipped
    MissingField,
    /// A field is present but could not be interpreted
    InvalidField,
    /// A record could not be read as the expected record shape
    InvalidRecord,
    /// A record inherits through `_copy`, which is not resolved for it
    UnsupportedCopy,
    /// A `_copy` names a record that does not exist
    UnresolvedCopy,
    /// A `_mod` operation that is not supported
    UnsupportedModification,
    /// A second legendary group with an already registered name
    DuplicateGroup,
    /// A data file that is not valid JSON or lacks its top-level array
    InvalidFile,
}

impl DiagnosticKind {
    /// Kinds that mean a whole record was dropped.
    pub fn skips_record(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::MissingField
                | DiagnosticKind::InvalidRecord
                | DiagnosticKind::UnsupportedCopy
                | DiagnosticKind::DuplicateGroup
                | DiagnosticKind::InvalidFile
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::UnrecognizedFragment => "unrecognized fragment",
            DiagnosticKind::MalformedRow => "malformed table row",
            DiagnosticKind::MalformedTable => "malformed table",
            DiagnosticKind::UnsupportedElement => "unsupported element",
            DiagnosticKind::MissingField => "missing field",
            DiagnosticKind::InvalidField => "invalid field",
            DiagnosticKind::InvalidRecord => "invalid record",
            DiagnosticKind::UnsupportedCopy => "unsupported copy",
            DiagnosticKind::UnresolvedCopy => "unresolved copy",
            DiagnosticKind::UnsupportedModification => "unsupported modification",
            DiagnosticKind::DuplicateGroup => "duplicate group",
            DiagnosticKind::InvalidFile => "invalid file",
        };
        f.write_str(label)
    }
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Scope path at the time of recording, e.g. `Aboleth > action`
    pub context: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}: {}", self.kind, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.context, self.kind, self.message)
        }
    }
}

/// Collector passed by `&mut` through every normalization call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    scope: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem in the current scope.
    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            kind,
            context: self.scope.join(" > "),
            message: message.into(),
        });
    }

    /// Run `f` with `label` pushed onto the scope path.
    pub fn scoped<T>(&mut self, label: impl Into<String>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scope.push(label.into());
        let out = f(self);
        self.scope.pop();
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Counts per kind, in a stable order.
    pub fn summary(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut out = BTreeMap::new();
        for d in &self.entries {
            *out.entry(d.kind).or_insert(0) += 1;
        }
        out
    }

    /// Move all entries of `other` into this collector.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}
