use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{catalog::FieldInfo, parser::ast::DataType};

/// Column dictionary of one table, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDict {
    /// Map of column name -> column metadata
    pub fields: IndexMap<String, FieldInfo>,
}

impl SchemaDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column declaration.
    pub fn with(mut self, name: &str, ty: DataType, nullable: bool) -> Self {
        self.fields.insert(name.to_string(), FieldInfo::new(ty, nullable));
        self
    }

    /// Return the `FieldInfo` for a column name if present.
    pub fn get(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    /// Looks a column up by exact name, or ignoring case when
    /// `case_sensitive` is false. Returns the declared name with its metadata.
    pub fn lookup(&self, name: &str, case_sensitive: bool) -> Option<(&str, &FieldInfo)> {
        if let Some((key, info)) = self.fields.get_key_value(name) {
            return Some((key.as_str(), info));
        }
        if case_sensitive {
            return None;
        }
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, info)| (key.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
