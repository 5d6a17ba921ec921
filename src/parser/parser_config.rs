use serde::{Deserialize, Serialize};

/// How the parser stores identifiers that were written without quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Casing {
    #[default]
    Unchanged,
    ToUpper,
    ToLower,
}

impl Casing {
    pub fn apply(&self, name: &str) -> String {
        match self {
            Casing::Unchanged => name.to_string(),
            Casing::ToUpper => name.to_uppercase(),
            Casing::ToLower => name.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept the legacy dialect surface (`!=`) and request desugaring.
    pub legacy_syntax: bool,
    pub unquoted_casing: Casing,
    /// Whether catalog and column names are matched case-sensitively.
    pub case_sensitive: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            legacy_syntax: false,
            unquoted_casing: Casing::Unchanged,
            case_sensitive: false,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legacy() -> Self {
        Self { legacy_syntax: true, ..Self::default() }
    }

    pub fn strict() -> Self {
        Self::default()
    }

    pub fn with_legacy_syntax(mut self, legacy_syntax: bool) -> Self {
        self.legacy_syntax = legacy_syntax;
        self
    }

    pub fn with_unquoted_casing(mut self, casing: Casing) -> Self {
        self.unquoted_casing = casing;
        self
    }
}
