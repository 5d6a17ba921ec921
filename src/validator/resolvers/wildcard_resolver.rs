use crate::{
    catalog::FieldInfo,
    parser::ast::Identifier,
    validator::{Relation, ValidationContext, ValidationError},
};

pub struct WildcardResolver;

impl WildcardResolver {
    /// Expands `*` or `t.*` into qualified column identifiers, in relation
    /// then declaration order.
    pub fn expand(identifier: &Identifier, ctx: &ValidationContext) -> Result<Vec<(Identifier, FieldInfo)>, ValidationError> {
        if identifier.is_simple() {
            if ctx.is_empty() {
                return Err(ValidationError::Other("SELECT * requires a FROM clause".into()));
            }
            return Ok(ctx.relations.values().flat_map(Self::columns_of).collect());
        }

        let qualifier = identifier.names[..identifier.names.len() - 1].join(".");
        let relation = ctx
            .local_relation(&qualifier)
            .ok_or(ValidationError::UnknownTable(qualifier))?;
        Ok(Self::columns_of(relation))
    }

    fn columns_of(relation: &Relation) -> Vec<(Identifier, FieldInfo)> {
        relation
            .columns
            .fields
            .iter()
            .map(|(name, info)| (Identifier::qualified(&relation.name, name), *info))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        catalog::{Catalog, SchemaDict},
        parser::ast::{DataType, Identifier},
        validator::{FunctionRegistry, ValidationContext, ValidationError, WildcardResolver},
    };

    #[test]
    pub fn test_expand_star_over_all_relations() {
        let catalog = Catalog::new();
        let functions = FunctionRegistry::default_registry();
        let mut ctx = ValidationContext::new(&catalog, &functions, false);
        ctx.add_relation("a", SchemaDict::new().with("x", DataType::Integer, false)).unwrap();
        ctx.add_relation(
            "b",
            SchemaDict::new()
                .with("y", DataType::Integer, false)
                .with("z", DataType::Double, true),
        )
        .unwrap();

        let all = WildcardResolver::expand(&Identifier::star(), &ctx).expect("Failed to expand");
        let names: Vec<String> = all.iter().map(|(id, _)| id.qualified_name()).collect();
        assert_eq!(names, vec!["a.x", "b.y", "b.z"]);

        let only_b = WildcardResolver::expand(&Identifier::new(vec!["B".into(), "*".into()]), &ctx)
            .expect("Failed to expand");
        assert_eq!(only_b.len(), 2);
        assert!(only_b[1].1.nullable);
    }

    #[test]
    pub fn test_expand_without_from() {
        let catalog = Catalog::new();
        let functions = FunctionRegistry::default_registry();
        let ctx = ValidationContext::new(&catalog, &functions, false);

        assert!(WildcardResolver::expand(&Identifier::star(), &ctx).is_err());
        assert_eq!(
            WildcardResolver::expand(&Identifier::new(vec!["t".into(), "*".into()]), &ctx),
            Err(ValidationError::UnknownTable("t".into()))
        );
    }
}
