use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::{Catalog, SchemaDict, SharedCatalog},
    compiler::{Canonicalizer, CompileError, CompilerConfig, ProjectionFilter},
    desugar::Desugarer,
    parser::ast::SqlNode,
    validator::{FunctionRegistry, FunctionSignature, OutputColumn, ValidatedQuery, Validator},
};

/// Result of one compilation: the validated tree and its output columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    #[serde(skip)]
    pub node: SqlNode,
    pub columns: Vec<OutputColumn>,
    /// Canonical text handed to the strict reparse, for legacy requests.
    pub canonical_sql: Option<String>,
}

impl CompiledQuery {
    /// Canonical text of the validated tree.
    pub fn explain(&self) -> String {
        self.node.to_string()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Front end turning SQL text into a validated statement.
///
/// Safe to share between threads: every call works on its own trees and
/// scopes, and the catalog is only read while validating.
pub struct QueryCompiler {
    catalog: SharedCatalog,
    functions: RwLock<FunctionRegistry>,
    config: CompilerConfig,
    call_count: AtomicUsize,
}

impl QueryCompiler {
    pub fn new(catalog: SharedCatalog, config: CompilerConfig) -> Self {
        Self {
            catalog,
            functions: RwLock::new(FunctionRegistry::default_registry()),
            config,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::new(catalog.into_shared(), CompilerConfig::default())
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn catalog(&self) -> SharedCatalog {
        Arc::clone(&self.catalog)
    }

    /// Number of `compile` calls so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Replaces the schema of `table`, returning the previous one.
    pub fn update_metadata(&self, table: &str, schema: SchemaDict) -> Result<Option<SchemaDict>, CompileError> {
        let mut catalog = self.catalog.write().map_err(|_| CompileError::CatalogUnavailable)?;
        Ok(catalog.update_metadata(table, schema))
    }

    pub fn drop_table(&self, table: &str) -> Result<Option<SchemaDict>, CompileError> {
        let mut catalog = self.catalog.write().map_err(|_| CompileError::CatalogUnavailable)?;
        Ok(catalog.drop_table(table))
    }

    /// Makes an extension function visible to later compilations.
    pub fn register_function(&self, signature: FunctionSignature) -> Result<(), CompileError> {
        let mut functions = self.functions.write().map_err(|_| CompileError::CatalogUnavailable)?;
        debug!(name = %signature.name, "registered function");
        functions.register(signature);
        Ok(())
    }

    pub fn compile(&self, sql: &str, legacy: bool) -> Result<CompiledQuery, CompileError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        // 1) Parse
        let parser_config = self.config.parser_config(legacy);
        let parsed = SqlNode::parse_statement(sql, &parser_config)?;

        let hide_system_columns = legacy && ProjectionFilter::is_select_star(&parsed);

        // 2) Desugar and reparse under the strict dialect
        let (node, canonical_sql) = if legacy {
            let desugared = Desugarer::desugar(parsed, true);
            let canonical = Canonicalizer::new(&self.config.parser).canonicalize(&desugared)?;
            (canonical.node, Some(canonical.sql))
        } else {
            (parsed, None)
        };

        // 3) Validate
        let mut validated = self.validate(&node)?;

        // 4) Hide system columns of a legacy SELECT *
        if hide_system_columns {
            ProjectionFilter::hide_system_columns(&mut validated, &self.config.hidden_column_suffix);
        }

        Ok(CompiledQuery { node: validated.node, columns: validated.columns, canonical_sql })
    }

    fn validate(&self, node: &SqlNode) -> Result<ValidatedQuery, CompileError> {
        let catalog = self.catalog.read().map_err(|_| CompileError::CatalogUnavailable)?;
        let functions = self.functions.read().map_err(|_| CompileError::CatalogUnavailable)?;
        let case_sensitive = self.config.parser.case_sensitive || catalog.case_sensitive();

        let validator = Validator::new(&*catalog, &*functions).with_case_sensitivity(case_sensitive);
        Ok(validator.validate(node)?)
    }
}
