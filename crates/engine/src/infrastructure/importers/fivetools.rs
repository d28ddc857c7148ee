//! 5etools data importer.
//!
//! Reads bestiary files and the legendary group file from a 5etools checkout
//! and converts them to domain `Monster`s with their lair content joined in.
//! Processing is sequential and deterministic: files are visited in sorted
//! path order and records in file order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use playtogether_domain::{LegendaryGroupTable, Monster};

use super::bestiary::{convert_monster, AssembleOptions};
use super::fivetools_types::{FiveToolsBestiaryFile, FiveToolsLegendaryGroupFile};
use super::legendary_groups::resolve_legendary_groups;
use super::normalizer::{DiagnosticKind, Diagnostics};
use crate::infrastructure::config::IngestConfig;

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Source path {0} does not exist or is not a directory")]
    SourceNotFound(PathBuf),
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),
}

/// Result of a bestiary import.
#[derive(Debug)]
pub struct BestiaryImport {
    /// Converted creatures, joined with their legendary groups
    pub monsters: Vec<Monster>,
    pub legendary_groups: LegendaryGroupTable,
    /// Every file read, in processing order
    pub files: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

impl BestiaryImport {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            files: self.files.len(),
            monsters: self.monsters.len(),
            legendary_groups: self.legendary_groups.len(),
            diagnostics: self.diagnostics.len(),
            by_kind: self.diagnostics.summary(),
        }
    }
}

/// Counts reported after an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub files: usize,
    pub monsters: usize,
    pub legendary_groups: usize,
    pub diagnostics: usize,
    pub by_kind: BTreeMap<DiagnosticKind, usize>,
}

/// Importer for 5etools data.
pub struct FiveToolsImporter {
    data_path: PathBuf,
    file_prefix: String,
    legendary_groups_file: String,
    options: AssembleOptions,
}

impl FiveToolsImporter {
    /// Create a new importer pointing to the 5etools data directory.
    ///
    /// The path should point to the root of the extracted 5etools folder,
    /// e.g., `/path/to/5etools-v2.22.0`, or directly at a folder of
    /// bestiary files.
    pub fn new(data_path: impl Into<PathBuf>, config: &IngestConfig) -> Self {
        Self {
            data_path: data_path.into(),
            file_prefix: config.bestiary_file_prefix.clone(),
            legendary_groups_file: config.legendary_groups_file.clone(),
            options: AssembleOptions {
                strip_formatting: config.strip_formatting_tags,
            },
        }
    }

    /// Check that the configured path is an existing directory.
    pub fn validate_path(&self) -> bool {
        self.data_path.is_dir()
    }

    /// Directory holding the bestiary files.
    fn bestiary_dir(&self) -> PathBuf {
        let nested = self.data_path.join("data").join("bestiary");
        if nested.is_dir() {
            nested
        } else {
            self.data_path.clone()
        }
    }

    /// Import every creature and legendary group.
    pub fn import_bestiary(&self) -> Result<BestiaryImport, ImportError> {
        if !self.validate_path() {
            return Err(ImportError::SourceNotFound(self.data_path.clone()));
        }
        let groups_file = self.legendary_groups_path()?;
        let dir = self.bestiary_dir();
        info!(path = %dir.display(), "Importing bestiary");

        let mut files = Vec::new();
        collect_files(&dir, &self.file_prefix, &mut files)?;
        if files.is_empty() {
            warn!(path = %dir.display(), prefix = %self.file_prefix, "No bestiary files found");
        }

        let mut diagnostics = Diagnostics::new();
        let mut monsters = Vec::new();
        for file in &files {
            let mut file_diagnostics = Diagnostics::new();
            let converted = self.import_file(file, &mut file_diagnostics)?;
            debug!(path = %file.display(), monsters = converted.len(), "Read bestiary file");
            monsters.extend(converted);
            report(&file_diagnostics);
            diagnostics.absorb(file_diagnostics);
        }

        let mut group_diagnostics = Diagnostics::new();
        let legendary_groups = match groups_file {
            Some(path) => {
                files.push(path.clone());
                self.import_legendary_groups(&path, &mut group_diagnostics)?
            }
            None => {
                warn!(
                    file = %self.legendary_groups_file,
                    "Legendary group file not found; lair actions and regional effects will be empty"
                );
                LegendaryGroupTable::new()
            }
        };
        report(&group_diagnostics);
        diagnostics.absorb(group_diagnostics);

        for name in legendary_groups.unresolved(&monsters) {
            warn!(group = name, "Monsters reference an unknown legendary group");
        }
        let monsters = legendary_groups.apply(monsters);

        info!(
            monsters = monsters.len(),
            legendary_groups = legendary_groups.len(),
            diagnostics = diagnostics.len(),
            "Bestiary import complete"
        );
        Ok(BestiaryImport {
            monsters,
            legendary_groups,
            files,
            diagnostics,
        })
    }

    /// Convert every record of one bestiary file.
    ///
    /// A file that is not valid JSON is skipped with a diagnostic; I/O
    /// failures abort the import.
    fn import_file(
        &self,
        path: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Monster>, ImportError> {
        let content = fs::read_to_string(path)?;
        let label = path.display().to_string();
        let file: FiveToolsBestiaryFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                diagnostics.scoped(label, |d| d.record(DiagnosticKind::InvalidFile, e.to_string()));
                return Ok(Vec::new());
            }
        };
        let Some(records) = file.monster else {
            diagnostics.scoped(label, |d| {
                d.record(DiagnosticKind::InvalidFile, "no `monster` array")
            });
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .filter_map(|raw| convert_monster(raw, self.options, diagnostics))
            .collect())
    }

    fn import_legendary_groups(
        &self,
        path: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<LegendaryGroupTable, ImportError> {
        let content = fs::read_to_string(path)?;
        let file: FiveToolsLegendaryGroupFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                diagnostics.record(
                    DiagnosticKind::InvalidFile,
                    format!("{}: {}", path.display(), e),
                );
                return Ok(LegendaryGroupTable::new());
            }
        };
        let records = file.legendary_group.unwrap_or_default();
        Ok(resolve_legendary_groups(
            &records,
            self.options.strip_formatting,
            diagnostics,
        ))
    }

    /// Locate the legendary group file: next to the bestiary files, then at
    /// the data root.
    fn legendary_groups_path(&self) -> Result<Option<PathBuf>, ImportError> {
        let name = &self.legendary_groups_file;
        // Prevent path traversal attacks
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(ImportError::InvalidFilename(name.clone()));
        }
        Ok([self.bestiary_dir(), self.data_path.clone()]
            .into_iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file()))
    }
}

/// Recursively collect `<prefix>*.json` files in sorted path order.
fn collect_files(dir: &Path, prefix: &str, out: &mut Vec<PathBuf>) -> Result<(), ImportError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_files(&path, prefix, out)?;
        } else if is_bestiary_file(&path, prefix) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_bestiary_file(path: &Path, prefix: &str) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(prefix));
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    has_prefix && is_json
}

/// Emit collected diagnostics as log lines.
fn report(diagnostics: &Diagnostics) {
    for d in diagnostics.iter() {
        if d.kind.skips_record() {
            info!(kind = %d.kind, entity = %d.context, "{}", d.message);
        } else {
            warn!(kind = %d.kind, entity = %d.context, "{}", d.message);
        }
    }
}
