use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{compiler::ConfigError, parser::ParserConfig};

pub const DEFAULT_HIDDEN_COLUMN_SUFFIX: &str = ".rowid";

/// Compiler configuration.
///
/// - `parser` is the base parser configuration; its `legacy_syntax` flag is
///   overridden by every `compile` call.
/// - `hidden_column_suffix` names the system columns a legacy `SELECT *` hides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub parser: ParserConfig,
    pub hidden_column_suffix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            hidden_column_suffix: DEFAULT_HIDDEN_COLUMN_SUFFIX.to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_hidden_column_suffix(mut self, suffix: &str) -> Self {
        self.hidden_column_suffix = suffix.to_string();
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parser configuration for one call.
    pub fn parser_config(&self, legacy: bool) -> ParserConfig {
        self.parser.clone().with_legacy_syntax(legacy)
    }
}
