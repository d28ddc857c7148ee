//! Ingestion configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Ingestion configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Root of a 5etools checkout; `--source` overrides it
    pub data_path: Option<PathBuf>,
    /// File name prefix of bestiary files
    pub bestiary_file_prefix: String,
    /// File name of the legendary group file, looked up next to the bestiary
    pub legendary_groups_file: String,
    /// Replace inline `{@tag ...}` markup with plain text
    pub strip_formatting_tags: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            bestiary_file_prefix: "bestiary-".to_string(),
            legendary_groups_file: "legendarygroups.json".to_string(),
            strip_formatting_tags: false,
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            data_path: lookup("FIVETOOLS_DATA_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            bestiary_file_prefix: lookup("BESTIARY_FILE_PREFIX")
                .unwrap_or(defaults.bestiary_file_prefix),
            legendary_groups_file: lookup("LEGENDARY_GROUPS_FILE")
                .unwrap_or(defaults.legendary_groups_file),
            strip_formatting_tags: lookup("STRIP_FORMATTING_TAGS")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("STRIP_FORMATTING_TAGS must be true or false")?
                .unwrap_or(defaults.strip_formatting_tags),
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized flag value `{}`", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<IngestConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IngestConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]).expect("config");
        assert_eq!(config, IngestConfig::default());
        assert_eq!(config.bestiary_file_prefix, "bestiary-");
        assert!(!config.strip_formatting_tags);
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("FIVETOOLS_DATA_PATH", "/data/5etools"),
            ("BESTIARY_FILE_PREFIX", "creatures-"),
            ("LEGENDARY_GROUPS_FILE", "groups.json"),
            ("STRIP_FORMATTING_TAGS", "Yes"),
        ])
        .expect("config");
        assert_eq!(config.data_path, Some(PathBuf::from("/data/5etools")));
        assert_eq!(config.bestiary_file_prefix, "creatures-");
        assert_eq!(config.legendary_groups_file, "groups.json");
        assert!(config.strip_formatting_tags);
    }

    #[test]
    fn blank_data_path_is_unset() {
        let config = load(&[("FIVETOOLS_DATA_PATH", "  ")]).expect("config");
        assert_eq!(config.data_path, None);
    }

    #[test]
    fn bad_flag_is_an_error() {
        let err = load(&[("STRIP_FORMATTING_TAGS", "maybe")]).expect_err("must fail");
        assert!(err.to_string().contains("STRIP_FORMATTING_TAGS"));
    }
}
