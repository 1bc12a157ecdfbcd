use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemapMode {
    PrefixReplace,
    CharacterSubstitution,
    RegexReplace,
}

/// One configured rename rule bridging naming conventions between two rigs.
///
/// Rules are bidirectional: forward application rewrites `source_pattern`
/// shaped text into `destination_pattern` shaped text, reverse application
/// swaps the two pattern roles. Disabled rules are skipped in both
/// directions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathRemapRule {
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    pub mode: RemapMode,
    pub source_pattern: String,
    pub destination_pattern: String,
}

fn enabled_default() -> bool {
    true
}

impl PathRemapRule {
    pub fn new(
        mode: RemapMode,
        source_pattern: impl Into<String>,
        destination_pattern: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            mode,
            source_pattern: source_pattern.into(),
            destination_pattern: destination_pattern.into(),
        }
    }
}
