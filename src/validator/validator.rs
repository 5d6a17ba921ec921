use tracing::{debug, error};

use crate::{
    catalog::SchemaProvider,
    parser::ast::SqlNode,
    validator::{FunctionRegistry, QueryResolver, ValidatedQuery, ValidationContext, ValidationError},
};

/// Checks a parsed statement against a schema provider and function registry.
pub struct Validator<'a> {
    schemas: &'a dyn SchemaProvider,
    functions: &'a FunctionRegistry,
    case_sensitive: bool,
}

impl<'a> Validator<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, functions: &'a FunctionRegistry) -> Self {
        Self { schemas, functions, case_sensitive: false }
    }

    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn validate(&self, node: &SqlNode) -> Result<ValidatedQuery, ValidationError> {
        let root = ValidationContext::new(self.schemas, self.functions, self.case_sensitive);
        let result = QueryResolver::validate(node, &root);

        match &result {
            Ok(validated) => debug!(columns = ?validated.column_names(), "validated: {}", validated.node),
            Err(err) => error!("validation failed for {}: {}", node, err),
        }
        result
    }
}
