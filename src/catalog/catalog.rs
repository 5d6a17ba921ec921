use std::{
    fs,
    path::Path,
    sync::{Arc, RwLock},
};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    catalog::{SchemaDict, SchemaProvider},
    compiler::ConfigError,
};

pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// In-memory table metadata.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: IndexMap<String, SchemaDict>,
    case_sensitive: bool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    /// Loads `{ "table": { "column": { "ty": ..., "nullable": ... } } }`.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let tables: IndexMap<String, SchemaDict> = serde_json::from_str(text)?;
        let mut catalog = Catalog::new();
        for (name, schema) in tables {
            catalog.update_metadata(&name, schema);
        }
        Ok(catalog)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Creates or replaces the metadata of `table`, returning the previous schema.
    pub fn update_metadata(&mut self, table: &str, schema: SchemaDict) -> Option<SchemaDict> {
        debug!(table, columns = schema.len(), "catalog metadata updated");
        let key = self.key(table);
        self.tables.insert(key, schema)
    }

    pub fn drop_table(&mut self, table: &str) -> Option<SchemaDict> {
        let key = self.key(table);
        self.tables.shift_remove(&key)
    }

    pub fn table(&self, table: &str) -> Option<&SchemaDict> {
        self.tables.get(&self.key(table))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

impl SchemaProvider for Catalog {
    fn schema_of(&self, table: &str) -> Option<SchemaDict> {
        self.table(table).cloned()
    }
}

impl SchemaProvider for SharedCatalog {
    fn schema_of(&self, table: &str) -> Option<SchemaDict> {
        let guard = self.read().ok()?;
        guard.schema_of(table)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::parser::ast::DataType;

    fn emp() -> SchemaDict {
        SchemaDict::new()
            .with("empno", DataType::Integer, false)
            .with("ename", DataType::Varchar(Some(20)), true)
    }

    #[test]
    fn test_lookup_ignores_case_by_default() {
        let mut catalog = Catalog::new();
        catalog.update_metadata("EMP", emp());

        assert!(catalog.schema_of("emp").is_some());
        assert!(catalog.schema_of("Emp").is_some());
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let mut catalog = Catalog::new().with_case_sensitivity(true);
        catalog.update_metadata("EMP", emp());

        assert!(catalog.schema_of("emp").is_none());
        assert!(catalog.schema_of("EMP").is_some());
    }

    #[test]
    fn test_update_and_drop() {
        let mut catalog = Catalog::new();
        assert!(catalog.update_metadata("emp", emp()).is_none());

        let replaced = catalog.update_metadata("emp", SchemaDict::new().with("x", DataType::Boolean, false));
        assert_eq!(replaced, Some(emp()));
        assert_eq!(catalog.schema_of("emp").map(|s| s.len()), Some(1));

        assert!(catalog.drop_table("EMP").is_some());
        assert!(catalog.schema_of("emp").is_none());
    }

    #[test]
    fn test_shared_catalog_provider() {
        let shared = Catalog::new().into_shared();
        shared.write().unwrap().update_metadata("emp", emp());

        let provider: &dyn SchemaProvider = &shared;
        assert_eq!(provider.schema_of("emp"), Some(emp()));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "dept": {{ "deptno": {{ "ty": "Integer" }}, "dname": {{ "ty": {{ "Varchar": 14 }}, "nullable": true }} }} }}"#
        )
        .unwrap();

        let catalog = Catalog::from_file(file.path()).expect("Failed to load catalog");

        assert_eq!(catalog.table_names(), vec!["dept"]);
        let dept = catalog.schema_of("DEPT").unwrap();
        assert_eq!(dept.get("deptno").map(|f| f.ty), Some(DataType::Integer));
    }

    #[test]
    fn test_load_missing_file() {
        match Catalog::from_file("/definitely/not/here.json") {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, "/definitely/not/here.json"),
            _ => panic!(),
        }
    }
}
