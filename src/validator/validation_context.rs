use indexmap::IndexMap;

use crate::{
    catalog::{FieldInfo, SchemaDict, SchemaProvider},
    validator::{FunctionRegistry, ValidationError},
};

/// A table, derived table or join input visible in one `FROM` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Name used to qualify its columns: the alias if present, otherwise the table name.
    pub name: String,
    pub columns: SchemaDict,
}

/// Name scope of one `SELECT`, linked to the enclosing query's scope so
/// correlated references resolve outward.
pub struct ValidationContext<'a> {
    /// map visible name -> relation
    pub relations: IndexMap<String, Relation>,
    pub parent: Option<&'a ValidationContext<'a>>,
    pub schemas: &'a dyn SchemaProvider,
    pub functions: &'a FunctionRegistry,
    pub case_sensitive: bool,
}

impl<'a> ValidationContext<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, functions: &'a FunctionRegistry, case_sensitive: bool) -> Self {
        Self {
            relations: IndexMap::new(),
            parent: None,
            schemas,
            functions,
            case_sensitive,
        }
    }

    pub fn child(&self) -> ValidationContext<'_> {
        ValidationContext {
            relations: IndexMap::new(),
            parent: Some(self),
            schemas: self.schemas,
            functions: self.functions,
            case_sensitive: self.case_sensitive,
        }
    }

    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive { a == b } else { a.eq_ignore_ascii_case(b) }
    }

    pub fn add_relation(&mut self, name: &str, columns: SchemaDict) -> Result<(), ValidationError> {
        if self.local_relation(name).is_some() {
            return Err(ValidationError::Other(format!("Duplicate relation name '{}' in FROM clause", name)));
        }
        self.relations.insert(name.to_string(), Relation { name: name.to_string(), columns });
        Ok(())
    }

    pub fn local_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.values().find(|relation| self.names_match(&relation.name, name))
    }

    /// Finds a relation by visible name here or in an enclosing scope.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.local_relation(name).or_else(|| self.parent.and_then(|parent| parent.relation(name)))
    }

    /// Every relation of this scope holding `column`, with the declared column name.
    pub fn local_matches(&self, column: &str) -> Vec<(&Relation, &str, FieldInfo)> {
        self.relations
            .values()
            .filter_map(|relation| {
                relation
                    .columns
                    .lookup(column, self.case_sensitive)
                    .map(|(name, info)| (relation, name, *info))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Catalog, parser::ast::DataType};

    #[test]
    fn test_parent_lookup() {
        let catalog = Catalog::new();
        let functions = FunctionRegistry::default_registry();
        let mut outer = ValidationContext::new(&catalog, &functions, false);
        outer
            .add_relation("emp", SchemaDict::new().with("deptno", DataType::Integer, false))
            .unwrap();

        let inner = outer.child();

        assert!(inner.local_relation("emp").is_none());
        assert_eq!(inner.relation("EMP").map(|r| r.name.as_str()), Some("emp"));
    }

    #[test]
    fn test_duplicate_relation_rejected() {
        let catalog = Catalog::new();
        let functions = FunctionRegistry::default_registry();
        let mut ctx = ValidationContext::new(&catalog, &functions, false);
        ctx.add_relation("t", SchemaDict::new()).unwrap();

        assert!(ctx.add_relation("T", SchemaDict::new()).is_err());
    }

    #[test]
    fn test_local_matches_across_relations() {
        let catalog = Catalog::new();
        let functions = FunctionRegistry::default_registry();
        let mut ctx = ValidationContext::new(&catalog, &functions, false);
        ctx.add_relation("a", SchemaDict::new().with("id", DataType::Integer, false)).unwrap();
        ctx.add_relation("b", SchemaDict::new().with("ID", DataType::BigInt, true)).unwrap();

        let matches = ctx.local_matches("id");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].1, "ID");
        assert!(matches[1].2.nullable);
    }
}
