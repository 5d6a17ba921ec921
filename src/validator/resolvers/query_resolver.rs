use tracing::trace;

use crate::{
    parser::ast::{Call, DataType, Operator, OrderBy, Select, SetOpKind, SqlNode},
    validator::{
        AggregateResolver, FromResolver, OrderByResolver, OutputColumn, ScalarResolver, SortScope, ValidatedQuery,
        ValidationContext, ValidationError, WildcardResolver,
    },
};

pub struct QueryResolver;

impl QueryResolver {
    /// Validates a query in a fresh scope nested inside `outer`.
    pub fn validate(node: &SqlNode, outer: &ValidationContext) -> Result<ValidatedQuery, ValidationError> {
        match node {
            SqlNode::Select(select) => {
                let (select, columns, _) = Self::validate_select(select, outer)?;
                Ok(ValidatedQuery { node: SqlNode::Select(Box::new(select)), columns })
            },
            SqlNode::OrderBy(order_by) => Self::validate_order_by(order_by, outer),
            SqlNode::Call(Call { operator: Operator::SetOp(kind), operands, .. }) => {
                Self::validate_set_op(*kind, operands, outer)
            },
            _ => Err(ValidationError::Other(format!("Not a query: {}", node))),
        }
    }

    fn validate_select<'o>(
        select: &Select,
        outer: &'o ValidationContext<'o>,
    ) -> Result<(Select, Vec<OutputColumn>, ValidationContext<'o>), ValidationError> {
        let mut ctx = outer.child();

        let from = match &select.from {
            Some(from) => Some(FromResolver::resolve(from, &mut ctx)?),
            None => None,
        };

        let mut select_list = vec![];
        let mut columns = vec![];
        for item in &select.select_list {
            let (expr, alias) = match item.as_alias() {
                Some((expr, alias)) => (expr, Some(alias)),
                None => (item, None),
            };

            if let (SqlNode::Identifier(identifier), None) = (expr, alias) {
                if identifier.is_star() {
                    for (qualified, info) in WildcardResolver::expand(identifier, &ctx)? {
                        columns.push(OutputColumn::new(qualified.last(), info));
                        select_list.push(SqlNode::Identifier(qualified));
                    }
                    continue;
                }
            }

            let (resolved, info) = ScalarResolver::resolve(expr, &ctx)?;
            let name = match (alias, &resolved) {
                (Some(alias), _) => alias.last().to_string(),
                (None, SqlNode::Identifier(identifier)) => identifier.last().to_string(),
                _ => format!("EXPR${}", columns.len()),
            };
            columns.push(OutputColumn::new(&name, info));
            select_list.push(match alias {
                Some(alias) => SqlNode::call(Operator::As, vec![resolved, SqlNode::Identifier(alias.clone())]),
                None => resolved,
            });
        }

        let functions = ctx.functions;
        let where_clause = match &select.where_clause {
            Some(condition) => {
                if AggregateResolver::contains_aggregate(condition, functions) {
                    return Err(ValidationError::Other("Aggregate expression is illegal in WHERE clause".into()));
                }
                Some(Self::resolve_condition(condition, "WHERE", &ctx)?)
            },
            None => None,
        };

        let group_by = match &select.group_by {
            Some(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    if AggregateResolver::contains_aggregate(item, functions) {
                        return Err(ValidationError::Other("Aggregate expression is illegal in GROUP BY clause".into()));
                    }
                    resolved.push(ScalarResolver::resolve(item, &ctx)?.0);
                }
                Some(resolved)
            },
            None => None,
        };

        let having = match &select.having {
            Some(condition) => Some(Self::resolve_condition(condition, "HAVING", &ctx)?),
            None => None,
        };

        let aggregated = group_by.is_some()
            || having.is_some()
            || select_list.iter().any(|item| AggregateResolver::contains_aggregate(item.unaliased(), functions));
        if aggregated {
            let group_exprs = group_by.as_deref().unwrap_or_default();
            for item in select_list.iter().chain(having.iter()) {
                AggregateResolver::check_grouped(item.unaliased(), group_exprs, functions)?;
            }
        }

        trace!(columns = columns.len(), aggregated, "validated select");
        let validated = Select { distinct: select.distinct, select_list, from, where_clause, group_by, having };
        Ok((validated, columns, ctx))
    }

    fn resolve_condition(condition: &SqlNode, clause: &str, ctx: &ValidationContext) -> Result<SqlNode, ValidationError> {
        let (resolved, info) = ScalarResolver::resolve(condition, ctx)?;
        if !matches!(info.ty, DataType::Boolean | DataType::Null) {
            return Err(ValidationError::TypeMismatch { operator: clause.to_string(), types: vec![info.ty] });
        }
        Ok(resolved)
    }

    fn validate_order_by(order_by: &OrderBy, outer: &ValidationContext) -> Result<ValidatedQuery, ValidationError> {
        let mut order_list = Vec::with_capacity(order_by.order_list.len());

        let (query, columns) = match &order_by.query {
            SqlNode::Select(select) => {
                let (validated, columns, ctx) = Self::validate_select(select, outer)?;
                let aggregated = validated.group_by.is_some()
                    || validated.having.is_some()
                    || validated
                        .select_list
                        .iter()
                        .any(|item| AggregateResolver::contains_aggregate(item.unaliased(), ctx.functions));
                let scope = SortScope {
                    ctx: &ctx,
                    aliases: validated
                        .select_list
                        .iter()
                        .filter_map(|item| item.as_alias().map(|(_, alias)| alias.last().to_string()))
                        .collect(),
                    group_exprs: aggregated.then(|| validated.group_by.as_deref().unwrap_or_default()),
                };
                for key in &order_by.order_list {
                    order_list.push(OrderByResolver::resolve_key(key, &columns, Some(&scope))?);
                }
                (SqlNode::Select(Box::new(validated)), columns)
            },
            query => {
                let validated = Self::validate(query, outer)?;
                for key in &order_by.order_list {
                    order_list.push(OrderByResolver::resolve_key(key, &validated.columns, None)?);
                }
                (validated.node, validated.columns)
            },
        };

        for count in order_by.offset.iter().chain(order_by.fetch.iter()) {
            OrderByResolver::check_count(count)?;
        }

        let node = OrderBy { query, order_list, offset: order_by.offset.clone(), fetch: order_by.fetch.clone() };
        Ok(ValidatedQuery { node: SqlNode::OrderBy(Box::new(node)), columns })
    }

    fn validate_set_op(
        kind: SetOpKind,
        operands: &[SqlNode],
        outer: &ValidationContext,
    ) -> Result<ValidatedQuery, ValidationError> {
        let [left, right] = operands else {
            return Err(ValidationError::Other(format!("{} requires two operands", kind)));
        };

        let left = Self::validate(left, outer)?;
        let right = Self::validate(right, outer)?;
        if left.columns.len() != right.columns.len() {
            return Err(ValidationError::SetOperationArity { left: left.columns.len(), right: right.columns.len() });
        }

        let mut columns = Vec::with_capacity(left.columns.len());
        for (l, r) in left.columns.iter().zip(&right.columns) {
            let merged = l.field_info().merge_field_info(&r.field_info()).ok_or_else(|| {
                ValidationError::TypeMismatch { operator: kind.to_string(), types: vec![l.ty, r.ty] }
            })?;
            columns.push(OutputColumn::new(&l.name, merged));
        }

        Ok(ValidatedQuery {
            node: SqlNode::call(Operator::SetOp(kind), vec![left.node, right.node]),
            columns,
        })
    }
}
