use crate::{
    catalog::FieldInfo,
    parser::ast::Identifier,
    validator::{ValidationContext, ValidationError},
};

pub struct ColumnResolver;

impl ColumnResolver {
    /// Qualifies a column reference to `relation.column`, searching the
    /// current scope first and enclosing scopes after.
    pub fn qualify_column(identifier: &Identifier, ctx: &ValidationContext) -> Result<(Identifier, FieldInfo), ValidationError> {
        if identifier.is_star() {
            return Err(ValidationError::Other("'*' is only allowed in the select list or COUNT(*)".into()));
        }

        match identifier.names.as_slice() {
            [name] => Self::qualify_name(name, ctx),
            [qualifier @ .., name] => {
                let relation_name = qualifier.join(".");
                let relation = ctx
                    .relation(&relation_name)
                    .ok_or_else(|| ValidationError::UnknownTable(relation_name.clone()))?;
                let (column, info) = relation.columns.lookup(name, ctx.case_sensitive).ok_or_else(|| {
                    ValidationError::UnknownColumn {
                        name: identifier.qualified_name(),
                        candidates: relation.columns.fields.keys().cloned().collect(),
                    }
                })?;
                Ok((Identifier::qualified(&relation.name, column), *info))
            },
            [] => Err(ValidationError::Other("empty identifier".into())),
        }
    }

    fn qualify_name(name: &str, ctx: &ValidationContext) -> Result<(Identifier, FieldInfo), ValidationError> {
        let mut scope = Some(ctx);
        while let Some(current) = scope {
            let matches = current.local_matches(name);
            match matches.as_slice() {
                [] => scope = current.parent,
                [(relation, column, info)] => return Ok((Identifier::qualified(&relation.name, column), *info)),
                _ => {
                    return Err(ValidationError::AmbiguousColumn {
                        name: name.to_string(),
                        matches: matches
                            .iter()
                            .map(|(relation, column, _)| (relation.name.clone(), column.to_string()))
                            .collect(),
                    });
                },
            }
        }

        Err(ValidationError::UnknownColumn {
            name: name.to_string(),
            candidates: ctx
                .relations
                .values()
                .flat_map(|relation| relation.columns.fields.keys().cloned())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        catalog::{Catalog, SchemaDict},
        parser::ast::{DataType, Identifier},
        validator::{ColumnResolver, FunctionRegistry, ValidationContext, ValidationError},
    };

    fn with_ctx(test: impl FnOnce(&ValidationContext)) {
        let catalog = Catalog::new();
        let functions = FunctionRegistry::default_registry();
        let mut ctx = ValidationContext::new(&catalog, &functions, false);
        ctx.add_relation(
            "e",
            SchemaDict::new()
                .with("empno", DataType::Integer, false)
                .with("deptno", DataType::Integer, true),
        )
        .unwrap();
        ctx.add_relation("d", SchemaDict::new().with("deptno", DataType::Integer, false)).unwrap();
        test(&ctx);
    }

    #[test]
    pub fn test_qualify_unique_column() {
        with_ctx(|ctx| {
            let (qualified, info) = ColumnResolver::qualify_column(&Identifier::simple("EMPNO"), ctx).unwrap();
            assert_eq!(qualified, Identifier::qualified("e", "empno"));
            assert_eq!(info.ty, DataType::Integer);
        });
    }

    #[test]
    pub fn test_ambiguous_column() {
        with_ctx(|ctx| {
            match ColumnResolver::qualify_column(&Identifier::simple("deptno"), ctx) {
                Err(ValidationError::AmbiguousColumn { matches, .. }) => assert_eq!(matches.len(), 2),
                _ => panic!(),
            }
        });
    }

    #[test]
    pub fn test_qualified_column() {
        with_ctx(|ctx| {
            let (_, info) = ColumnResolver::qualify_column(&Identifier::qualified("d", "deptno"), ctx).unwrap();
            assert!(!info.nullable);
        });
    }

    #[test]
    pub fn test_unknown_table_and_column() {
        with_ctx(|ctx| {
            assert_eq!(
                ColumnResolver::qualify_column(&Identifier::qualified("x", "deptno"), ctx),
                Err(ValidationError::UnknownTable("x".into()))
            );
            match ColumnResolver::qualify_column(&Identifier::simple("salary"), ctx) {
                Err(ValidationError::UnknownColumn { name, candidates }) => {
                    assert_eq!(name, "salary");
                    assert_eq!(candidates, vec!["empno", "deptno", "deptno"]);
                },
                _ => panic!(),
            }
        });
    }

    #[test]
    pub fn test_outer_scope_reference() {
        with_ctx(|ctx| {
            let inner = ctx.child();
            let (qualified, _) = ColumnResolver::qualify_column(&Identifier::simple("empno"), &inner).unwrap();
            assert_eq!(qualified, Identifier::qualified("e", "empno"));
        });
    }
}
