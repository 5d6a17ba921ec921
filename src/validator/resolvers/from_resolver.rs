use tracing::trace;

use crate::{
    catalog::{SchemaDict, SchemaProvider},
    parser::ast::{Call, DataType, Identifier, JoinKind, Operator, SqlNode},
    validator::{QueryResolver, ScalarResolver, ValidationContext, ValidationError},
};

pub struct FromResolver;

impl FromResolver {
    /// Registers every relation of a `FROM` clause in `ctx` and returns the
    /// clause with its join conditions and derived tables resolved.
    pub fn resolve(from: &SqlNode, ctx: &mut ValidationContext) -> Result<SqlNode, ValidationError> {
        match from {
            SqlNode::Identifier(table) => {
                let schema = Self::table_schema(table, ctx.schemas)?;
                ctx.add_relation(table.last(), schema)?;
                Ok(from.clone())
            },
            SqlNode::Call(call) => match call.operator {
                Operator::As => {
                    let (inner, alias) = from
                        .as_alias()
                        .ok_or_else(|| ValidationError::Other(format!("Malformed alias: {}", from)))?;
                    let inner = Self::resolve_aliased(inner, alias.last(), ctx)?;
                    Ok(SqlNode::call(Operator::As, vec![inner, SqlNode::Identifier(alias.clone())]))
                },
                Operator::Join(kind) => Self::resolve_join(kind, call, ctx),
                _ if from.is_query() => {
                    let name = format!("EXPR${}", ctx.relations.len());
                    Self::resolve_aliased(from, &name, ctx)
                },
                _ => Err(ValidationError::Other(format!("Unsupported FROM item: {}", from))),
            },
            SqlNode::Select(_) | SqlNode::OrderBy(_) => {
                let name = format!("EXPR${}", ctx.relations.len());
                Self::resolve_aliased(from, &name, ctx)
            },
            _ => Err(ValidationError::Other(format!("Unsupported FROM item: {}", from))),
        }
    }

    fn table_schema(table: &Identifier, schemas: &dyn SchemaProvider) -> Result<SchemaDict, ValidationError> {
        let name = table.qualified_name();
        schemas.schema_of(&name).ok_or(ValidationError::UnknownTable(name))
    }

    fn resolve_aliased(inner: &SqlNode, alias: &str, ctx: &mut ValidationContext) -> Result<SqlNode, ValidationError> {
        match inner {
            SqlNode::Identifier(table) => {
                let schema = Self::table_schema(table, ctx.schemas)?;
                ctx.add_relation(alias, schema)?;
                Ok(inner.clone())
            },
            query if query.is_query() => {
                // derived tables see the enclosing query's scope, never their siblings
                let validated = match ctx.parent {
                    Some(outer) => QueryResolver::validate(query, outer)?,
                    None => {
                        let root = ValidationContext::new(ctx.schemas, ctx.functions, ctx.case_sensitive);
                        QueryResolver::validate(query, &root)?
                    },
                };

                let mut columns = SchemaDict::new();
                for column in &validated.columns {
                    if columns.lookup(&column.name, ctx.case_sensitive).is_some() {
                        return Err(ValidationError::Other(format!(
                            "Duplicate column name '{}' in derived table '{}'",
                            column.name, alias
                        )));
                    }
                    columns.fields.insert(column.name.clone(), column.field_info());
                }
                trace!(alias, columns = columns.len(), "registered derived table");
                ctx.add_relation(alias, columns)?;
                Ok(validated.node)
            },
            _ => Err(ValidationError::Other(format!("Unsupported FROM item: {}", inner))),
        }
    }

    fn resolve_join(kind: JoinKind, call: &Call, ctx: &mut ValidationContext) -> Result<SqlNode, ValidationError> {
        let (Some(left), Some(right)) = (call.operand(0), call.operand(1)) else {
            return Err(ValidationError::Other(format!("Malformed join: {}", call)));
        };

        let start = ctx.relations.len();
        let left = Self::resolve(left, ctx)?;
        let middle = ctx.relations.len();
        let right = Self::resolve(right, ctx)?;

        let mut operands = vec![left, right];
        if let Some(condition) = call.operand(2) {
            let (condition, info) = ScalarResolver::resolve(condition, ctx)?;
            if !matches!(info.ty, DataType::Boolean | DataType::Null) {
                return Err(ValidationError::TypeMismatch { operator: "ON".into(), types: vec![info.ty] });
            }
            operands.push(condition);
        }

        // outer joins make the non-preserved side nullable
        let nullable_range = match kind {
            JoinKind::Left => middle..ctx.relations.len(),
            JoinKind::Right => start..middle,
            JoinKind::Full => start..ctx.relations.len(),
            _ => start..start,
        };
        for index in nullable_range {
            if let Some((_, relation)) = ctx.relations.get_index_mut(index) {
                for info in relation.columns.fields.values_mut() {
                    info.nullable = true;
                }
            }
        }

        Ok(SqlNode::Call(Call::new(Operator::Join(kind), operands)))
    }
}
