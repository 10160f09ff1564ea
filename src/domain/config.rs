use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a requirements store.
///
/// Loaded from a `config.toml` at the store root; every field is optional and
/// defaults apply when the file is absent or partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Whether to tolerate YAML files in the store directories that cannot be
    /// parsed as records.
    ///
    /// When `false` (the default), opening a store containing unrecognised
    /// files is an error. When `true`, such files are skipped.
    pub allow_unrecognised: bool,

    /// Site-specific additions to the subjective-term lexicon of the
    /// ambiguity rule.
    ///
    /// Terms are matched case-insensitively, after the stock lexicon.
    pub extra_subjective_terms: Vec<String>,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}
