use crate::{
    parser::ast::{Call, Literal, SqlNode},
    validator::{AggregateResolver, OutputColumn, ScalarResolver, ValidationContext, ValidationError},
};

/// Scope an `ORDER BY` over a plain `SELECT` can see besides its output
/// columns.
pub struct SortScope<'s, 'a> {
    pub ctx: &'s ValidationContext<'a>,
    /// Aliases written in the select list.
    pub aliases: Vec<String>,
    /// `GROUP BY` expressions when the select is aggregated.
    pub group_exprs: Option<&'s [SqlNode]>,
}

pub struct OrderByResolver;

impl OrderByResolver {
    /// Resolves one sort key: ordinals are range-checked, output aliases are
    /// kept as written and anything else is resolved against the select's scope.
    pub fn resolve_key(
        key: &SqlNode,
        columns: &[OutputColumn],
        scope: Option<&SortScope>,
    ) -> Result<SqlNode, ValidationError> {
        if let SqlNode::Call(call) = key {
            if call.operator.is_sort_postfix() {
                let inner = call
                    .operand(0)
                    .ok_or_else(|| ValidationError::Other(format!("Malformed sort key: {}", key)))?;
                let inner = Self::resolve_key(inner, columns, scope)?;
                return Ok(SqlNode::Call(Call::new(call.operator.clone(), vec![inner])));
            }
        }

        if let SqlNode::Literal(literal @ Literal::Exact(_)) = key {
            let ordinal = literal
                .as_integer()
                .ok_or_else(|| ValidationError::Other(format!("Invalid sort ordinal: {}", literal)))?;
            if ordinal < 1 || ordinal as usize > columns.len() {
                return Err(ValidationError::InvalidOrdinal { ordinal, columns: columns.len() });
            }
            return Ok(key.clone());
        }

        let Some(scope) = scope else {
            return Self::resolve_output_name(key, columns);
        };

        if let Some(identifier) = key.as_identifier().filter(|id| id.is_simple()) {
            let is_alias = scope.aliases.iter().any(|alias| scope.ctx.names_match(alias, identifier.last()));
            if is_alias {
                return Ok(key.clone());
            }
        }

        let (resolved, _) = ScalarResolver::resolve(key, scope.ctx)?;
        if let Some(group_exprs) = scope.group_exprs {
            AggregateResolver::check_grouped(&resolved, group_exprs, scope.ctx.functions)?;
        }
        Ok(resolved)
    }

    /// Keys over a set operation may only name its output columns.
    fn resolve_output_name(key: &SqlNode, columns: &[OutputColumn]) -> Result<SqlNode, ValidationError> {
        let Some(identifier) = key.as_identifier().filter(|id| id.is_simple()) else {
            return Err(ValidationError::Other(format!(
                "ORDER BY over a set operation must use output column names or ordinals: {}",
                key
            )));
        };

        if columns.iter().any(|column| column.name.eq_ignore_ascii_case(identifier.last())) {
            return Ok(key.clone());
        }
        Err(ValidationError::UnknownColumn {
            name: identifier.qualified_name(),
            candidates: columns.iter().map(|column| column.name.clone()).collect(),
        })
    }

    /// `OFFSET` and `FETCH` counts must be non-negative integer literals.
    pub fn check_count(count: &SqlNode) -> Result<(), ValidationError> {
        match count {
            SqlNode::Literal(literal) if literal.as_integer().is_some_and(|n| n >= 0) => Ok(()),
            _ => Err(ValidationError::InvalidFetch(count.to_string())),
        }
    }
}
