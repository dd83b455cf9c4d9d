//! Gate policy
//!
//! Controls how the gate treats breaking changes. Loaded from the `[gate]`
//! table of a TOML file (conventionally `modelgate.toml`):
//!
//! ```toml
//! [gate]
//! allow_breaking = false
//! type_changes_breaking = true
//! ```
//!
//! Missing keys (or a missing table) take the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind, ModelError, Result};

/// Default policy file name looked up by the CLI
pub const DEFAULT_POLICY_FILE: &str = "modelgate.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePolicy {
    /// Record breaking changes without failing the gate
    pub allow_breaking: bool,
    /// Classify any declared-type change as breaking
    pub type_changes_breaking: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            allow_breaking: false,
            type_changes_breaking: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    gate: Option<GatePolicy>,
}

impl GatePolicy {
    /// Policy that lets breaking changes through
    pub fn allowing_breaking() -> Self {
        Self {
            allow_breaking: true,
            ..Self::default()
        }
    }

    /// Parse a policy from TOML text
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the text is not valid TOML or a key has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: PolicyFile = toml::from_str(text).map_err(|e| ModelError::InvalidConfig {
            message: e.to_string(),
        })?;
        Ok(file.gate.unwrap_or_default())
    }

    /// Load a policy file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_gate_policy")
                .with_message(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text).map_err(|e| e.with_op("load_gate_policy"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_block_breaking_and_type_changes() {
        let policy = GatePolicy::default();
        assert!(!policy.allow_breaking);
        assert!(policy.type_changes_breaking);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let policy = GatePolicy::from_toml_str("[gate]\nallow_breaking = true\n").unwrap();
        assert!(policy.allow_breaking);
        assert!(policy.type_changes_breaking);
    }

    #[test]
    fn test_missing_table_is_default() {
        let policy = GatePolicy::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert_eq!(policy, GatePolicy::default());
    }

    #[test]
    fn test_invalid_toml_is_invalid_config() {
        let err = GatePolicy::from_toml_str("[gate\nallow_breaking = ").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);

        let err = GatePolicy::from_toml_str("[gate]\nallow_breaking = \"sometimes\"\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }
}
